//! Projection of raw wire records into their in-flight form.
//!
//! Projection happens once per record, as its section is accumulated.
//! The joiners later derive per-use views from the projected records
//! instead of mutating shared state, so a mention embedded under two
//! entities can never leak changes from one embedding to the other.

use crate::options::ExtractOptions;
use crate::response::{Entity, Location, Mention, MentionScores, RelationshipEntity, RelationshipMentionArg};
use crate::wire::{clean_id, RawEntity, RawMention};

/// Scores arrive as strings despite being doubles in [0, 1]. A
/// missing or unparseable value becomes NaN, never an error.
pub(crate) fn parse_score(raw: Option<&str>) -> f64 {
    raw.and_then(|s| s.parse().ok()).unwrap_or(f64::NAN)
}

/// Offsets arrive as strings. Integers have no NaN, so a missing or
/// unparseable offset becomes -1.
pub(crate) fn parse_offset(raw: Option<&str>) -> i64 {
    raw.and_then(|s| s.parse().ok()).unwrap_or(-1)
}

/// An entity after projection, still carrying its unresolved mention
/// references.
#[derive(Debug, Clone)]
pub struct ProjectedEntity {
    pub id: Option<String>,
    pub entity_type: String,
    pub class: String,
    pub level: String,
    pub subtype: Option<String>,
    pub score: Option<f64>,
    pub mention_refs: Vec<String>,
}

impl ProjectedEntity {
    /// Full view, with the resolved mentions embedded.
    #[must_use]
    pub fn into_entity(self, mentions: Vec<Mention>) -> Entity {
        Entity {
            id: self.id,
            entity_type: self.entity_type,
            class: self.class,
            level: self.level,
            subtype: self.subtype,
            score: self.score,
            mentions,
        }
    }

    /// Type-level view used as a relationship argument: no mention
    /// list, no score.
    #[must_use]
    pub fn to_relationship_entity(&self) -> RelationshipEntity {
        RelationshipEntity {
            id: self.id.clone(),
            entity_type: self.entity_type.clone(),
            class: self.class.clone(),
            level: self.level.clone(),
            subtype: self.subtype.clone(),
        }
    }
}

/// A mention after projection, shared read-only between both joiners.
#[derive(Debug, Clone)]
pub struct ProjectedMention {
    pub id: Option<String>,
    pub mtype: String,
    pub etype: Option<String>,
    pub role: String,
    pub class: String,
    pub text: String,
    pub scores: Option<MentionScores>,
    pub location: Option<Location>,
}

impl ProjectedMention {
    /// Entity-embedded view. The owning entity already carries the
    /// type, so `etype` is dropped. Each call produces an independent
    /// copy.
    #[must_use]
    pub fn to_mention(&self) -> Mention {
        Mention {
            id: self.id.clone(),
            mtype: self.mtype.clone(),
            role: self.role.clone(),
            class: self.class.clone(),
            text: self.text.clone(),
            scores: self.scores.clone(),
            location: self.location.clone(),
        }
    }

    /// Relationship-argument view: keeps `etype`, never the score
    /// record.
    #[must_use]
    pub fn to_relationship_arg(&self) -> RelationshipMentionArg {
        RelationshipMentionArg {
            id: self.id.clone(),
            mtype: self.mtype.clone(),
            etype: self.etype.clone(),
            role: self.role.clone(),
            class: self.class.clone(),
            text: self.text.clone(),
            location: self.location.clone(),
        }
    }
}

/// Projects a raw entity, returning its wire id alongside. The
/// `generic` placeholder is discarded unconditionally, and a subtype
/// of `OTHER` means "no subtype", not a real category.
#[must_use]
pub fn project_entity(raw: RawEntity, options: &ExtractOptions) -> (String, ProjectedEntity) {
    let id = options
        .include_ids
        .then(|| clean_id(&raw.eid).to_string());
    let score = options
        .include_scores
        .then(|| parse_score(raw.score.as_deref()));
    let subtype = raw.subtype.filter(|s| s != "OTHER");
    let mention_refs = raw
        .mentref
        .into_vec()
        .into_iter()
        .map(|r| r.mid)
        .collect();

    let entity = ProjectedEntity {
        id,
        entity_type: raw.entity_type,
        class: raw.class,
        level: raw.level,
        subtype,
        score,
        mention_refs,
    };
    (raw.eid, entity)
}

/// Projects a raw mention, returning its wire id alongside. The
/// `metonymy` placeholder is discarded; the covered text becomes
/// `text`; score and offset fields are grouped into their sub-records
/// or dropped, per the toggles.
#[must_use]
pub fn project_mention(raw: RawMention, options: &ExtractOptions) -> (String, ProjectedMention) {
    let id = options
        .include_ids
        .then(|| clean_id(&raw.mid).to_string());
    let scores = options.include_scores.then(|| MentionScores {
        score: parse_score(raw.score.as_deref()),
        coref: parse_score(raw.coref_score.as_deref()),
    });
    let location = options.include_locations.then(|| Location {
        begin: parse_offset(raw.begin.as_deref()),
        end: parse_offset(raw.end.as_deref()),
        head_begin: parse_offset(raw.head_begin.as_deref()),
        head_end: parse_offset(raw.head_end.as_deref()),
    });

    let mention = ProjectedMention {
        id,
        mtype: raw.mtype,
        etype: raw.etype,
        role: raw.role,
        class: raw.class,
        text: raw.text,
        scores,
        location,
    };
    (raw.mid, mention)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw_entity(value: serde_json::Value) -> RawEntity {
        serde_json::from_value(value).unwrap()
    }

    fn raw_mention(value: serde_json::Value) -> RawMention {
        serde_json::from_value(value).unwrap()
    }

    fn sample_entity() -> RawEntity {
        raw_entity(json!({
            "eid": "-E1",
            "type": "PERSON",
            "class": "SPC",
            "level": "NAM",
            "subtype": "OTHER",
            "generic": "0",
            "score": "0.887372",
            "mentref": [{ "mid": "-M1" }, { "mid": "-M2" }]
        }))
    }

    fn sample_mention() -> RawMention {
        raw_mention(json!({
            "mid": "-M1",
            "mtype": "NAM",
            "role": "PERSON",
            "class": "SPC",
            "eid": "-E1",
            "etype": "PERSON",
            "metonymy": "0",
            "score": "0.995296",
            "corefScore": "1",
            "begin": "0",
            "end": "9",
            "head-begin": "0",
            "head-end": "9",
            "$t": "John Smith"
        }))
    }

    #[test]
    fn test_entity_projection_defaults() {
        let (eid, entity) = project_entity(sample_entity(), &ExtractOptions::default());

        assert_eq!(eid, "-E1");
        assert_eq!(entity.entity_type, "PERSON");
        assert_eq!(entity.class, "SPC");
        assert_eq!(entity.level, "NAM");
        assert_eq!(entity.score, Some(0.887_372));
        assert_eq!(entity.mention_refs, ["-M1", "-M2"]);
        // defaults exclude ids
        assert!(entity.id.is_none());
    }

    #[test]
    fn test_other_subtype_means_no_subtype() {
        let (_, entity) = project_entity(sample_entity(), &ExtractOptions::default());

        assert!(entity.subtype.is_none());
    }

    #[test]
    fn test_real_subtype_survives() {
        let mut raw = sample_entity();
        raw.subtype = Some("COMMERCIAL".to_string());

        let (_, entity) = project_entity(raw, &ExtractOptions::default());

        assert_eq!(entity.subtype.as_deref(), Some("COMMERCIAL"));
    }

    #[test]
    fn test_scores_off_drops_entity_score() {
        let options = ExtractOptions::new().with_scores(false);

        let (_, entity) = project_entity(sample_entity(), &options);

        assert!(entity.score.is_none());
    }

    #[test]
    fn test_missing_score_parses_to_nan() {
        let mut raw = sample_entity();
        raw.score = None;

        let (_, entity) = project_entity(raw, &ExtractOptions::default());

        assert!(entity.score.unwrap().is_nan());
    }

    #[test]
    fn test_garbage_score_parses_to_nan() {
        let mut raw = sample_entity();
        raw.score = Some("not-a-number".to_string());

        let (_, entity) = project_entity(raw, &ExtractOptions::default());

        assert!(entity.score.unwrap().is_nan());
    }

    #[test]
    fn test_ids_are_cleaned_when_requested() {
        let options = ExtractOptions::new().with_ids(true);

        let (_, entity) = project_entity(sample_entity(), &options);
        let (_, mention) = project_mention(sample_mention(), &options);

        assert_eq!(entity.id.as_deref(), Some("E1"));
        assert_eq!(mention.id.as_deref(), Some("M1"));
    }

    #[test]
    fn test_mention_projection_defaults() {
        let (mid, mention) = project_mention(sample_mention(), &ExtractOptions::default());

        assert_eq!(mid, "-M1");
        assert_eq!(mention.text, "John Smith");
        assert_eq!(mention.etype.as_deref(), Some("PERSON"));
        let scores = mention.scores.unwrap();
        assert_eq!(scores.score, 0.995_296);
        assert_eq!(scores.coref, 1.0);
        // defaults exclude locations
        assert!(mention.location.is_none());
    }

    #[test]
    fn test_mention_locations_when_requested() {
        let options = ExtractOptions::new().with_locations(true);

        let (_, mention) = project_mention(sample_mention(), &options);

        let location = mention.location.unwrap();
        assert_eq!(location.begin, 0);
        assert_eq!(location.end, 9);
        assert_eq!(location.head_begin, 0);
        assert_eq!(location.head_end, 9);
    }

    #[test]
    fn test_mention_scores_off_drops_record_entirely() {
        let options = ExtractOptions::new().with_scores(false);

        let (_, mention) = project_mention(sample_mention(), &options);

        assert!(mention.scores.is_none());
    }

    #[test]
    fn test_missing_offsets_fall_back() {
        let mut raw = sample_mention();
        raw.begin = None;
        raw.end = Some("junk".to_string());
        let options = ExtractOptions::new().with_locations(true);

        let (_, mention) = project_mention(raw, &options);

        let location = mention.location.unwrap();
        assert_eq!(location.begin, -1);
        assert_eq!(location.end, -1);
    }

    #[test]
    fn test_embedded_views_are_independent_copies() {
        let (_, projected) = project_mention(sample_mention(), &ExtractOptions::default());

        let mut first = projected.to_mention();
        let second = projected.to_mention();
        first.text = "mutated".to_string();

        assert_eq!(second.text, "John Smith");
        assert_eq!(projected.text, "John Smith");
    }

    #[test]
    fn test_relationship_arg_keeps_etype_and_drops_scores() {
        let (_, projected) = project_mention(sample_mention(), &ExtractOptions::default());

        let arg = projected.to_relationship_arg();
        let embedded = projected.to_mention();

        assert_eq!(arg.etype.as_deref(), Some("PERSON"));
        assert!(embedded.scores.is_some());
        let json = serde_json::to_value(&arg).unwrap();
        assert!(json.get("scores").is_none());
        assert!(json.get("etype").is_some());
    }

    #[test]
    fn test_relationship_arg_without_etype_omits_the_key() {
        let mut raw = sample_mention();
        raw.etype = None;

        let (_, projected) = project_mention(raw, &ExtractOptions::default());
        let json = serde_json::to_value(projected.to_relationship_arg()).unwrap();

        assert!(json.get("etype").is_none());
    }
}
