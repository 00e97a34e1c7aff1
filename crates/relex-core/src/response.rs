use serde::{Deserialize, Serialize};

/// The assembled result. Which top-level keys are present mirrors the
/// caller's inclusion toggles exactly: an excluded collection has no
/// key at all, not a null or an empty list.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ExtractResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entities: Option<Vec<Entity>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relationships: Option<Vec<Relationship>>,
}

/// An entity together with every mention of it, in the order the
/// entity first appeared in the response document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub entity_type: String,
    pub class: String,
    pub level: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtype: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    pub mentions: Vec<Mention>,
}

/// One textual occurrence of an entity. Each embedding is an
/// independent copy; a mention referenced by two entities never
/// shares storage between them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mention {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub mtype: String,
    pub role: String,
    pub class: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scores: Option<MentionScores>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MentionScores {
    pub score: f64,
    pub coref: f64,
}

/// Character offsets into the submitted text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub begin: i64,
    pub end: i64,
    #[serde(rename = "head-begin")]
    pub head_begin: i64,
    #[serde(rename = "head-end")]
    pub head_end: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    #[serde(rename = "type")]
    pub relation_type: String,
    /// Only the temporary `timeOf` relationships carry a subtype.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtype: Option<String>,
    pub entities: RelationshipEntities,
    pub mentions: Vec<RelationshipMention>,
}

/// The two positional entity arguments of a relationship. `one` and
/// `two` are never swapped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationshipEntities {
    pub one: RelationshipEntity,
    pub two: RelationshipEntity,
}

/// Type-level view of an entity argument: relationships describe
/// entity types, not specific occurrences, so neither the mention
/// list nor the confidence score appears here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationshipEntity {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub entity_type: String,
    pub class: String,
    pub level: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtype: Option<String>,
}

/// One place in the text where the relationship was found.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationshipMention {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    pub class: String,
    pub modality: String,
    pub tense: String,
    pub one: RelationshipMentionArg,
    pub two: RelationshipMentionArg,
}

/// Mention view used inside relationship occurrences. Unlike the
/// entity-embedded [`Mention`] this keeps `etype` (there is no
/// surrounding entity to carry the type) and never carries the
/// per-mention score record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationshipMentionArg {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub mtype: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub etype: Option<String>,
    pub role: String,
    pub class: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
}
