use serde::Deserialize;

/// A value the service serializes as a bare object when a container
/// has exactly one child, and as an array otherwise. Deserializing
/// through this makes callers cardinality-blind: they always see a
/// `Vec`, possibly empty.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    #[must_use]
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Self::Many(items) => items,
            Self::One(item) => vec![item],
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Many(items) => items.len(),
            Self::One(_) => 1,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T> Default for OneOrMany<T> {
    fn default() -> Self {
        Self::Many(Vec::new())
    }
}

/// Strips the single `-` sentinel the service prefixes onto opaque
/// identifiers. Applied only when the caller asked for raw ids.
#[must_use]
pub fn clean_id(id: &str) -> &str {
    id.strip_prefix('-').unwrap_or(id)
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawEntitySection {
    #[serde(default)]
    pub entity: OneOrMany<RawEntity>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawMentionSection {
    #[serde(default)]
    pub mention: OneOrMany<RawMention>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawRelationSection {
    #[serde(default)]
    pub relation: OneOrMany<RawRelation>,
}

/// An entity exactly as it appears on the wire: all attribute values
/// are strings, numeric or not, and reference lists may have been
/// collapsed to a single object.
#[derive(Debug, Clone, Deserialize)]
pub struct RawEntity {
    pub eid: String,
    #[serde(rename = "type", default)]
    pub entity_type: String,
    #[serde(default)]
    pub class: String,
    #[serde(default)]
    pub level: String,
    pub subtype: Option<String>,
    pub score: Option<String>,
    /// Placeholder flag, always discarded during projection.
    pub generic: Option<String>,
    #[serde(default)]
    pub mentref: OneOrMany<RawMentionRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawMentionRef {
    pub mid: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawMention {
    pub mid: String,
    #[serde(default)]
    pub mtype: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub class: String,
    pub eid: Option<String>,
    /// Type of the owning entity. Redundant once the mention is
    /// embedded under its entity, but kept for relationship argument
    /// views which have no surrounding entity.
    pub etype: Option<String>,
    /// Covered text, stored under `$t` by the XML-to-object mapping.
    #[serde(rename = "$t", default)]
    pub text: String,
    /// Placeholder, always discarded.
    pub metonymy: Option<String>,
    pub score: Option<String>,
    #[serde(rename = "corefScore")]
    pub coref_score: Option<String>,
    pub begin: Option<String>,
    pub end: Option<String>,
    #[serde(rename = "head-begin")]
    pub head_begin: Option<String>,
    #[serde(rename = "head-end")]
    pub head_end: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawRelation {
    #[serde(rename = "type", default)]
    pub relation_type: String,
    pub subtype: Option<String>,
    #[serde(default)]
    pub rel_entity_arg: OneOrMany<RawEntityArg>,
    pub relmentions: Option<RawRelationMentions>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawEntityArg {
    pub eid: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawRelationMentions {
    #[serde(default)]
    pub relmention: OneOrMany<RawRelationMention>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawRelationMention {
    pub rmid: Option<String>,
    pub score: Option<String>,
    #[serde(default)]
    pub class: String,
    #[serde(default)]
    pub modality: String,
    #[serde(default)]
    pub tense: String,
    #[serde(default)]
    pub rel_mention_arg: OneOrMany<RawMentionArg>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawMentionArg {
    pub mid: String,
}
