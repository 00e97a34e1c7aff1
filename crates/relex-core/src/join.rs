//! Joins the three independently-keyed collections of a response:
//! entities to their mentions, and relationships to both.
//!
//! Joining requires the fully accumulated collections, because a
//! relationship may reference an entity appearing anywhere in its
//! section. The assembler only calls in here at end of stream.

use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::options::ExtractOptions;
use crate::project::{parse_score, ProjectedEntity, ProjectedMention};
use crate::response::{Entity, Relationship, RelationshipEntities, RelationshipMention};
use crate::wire::RawRelation;

/// The temporary relationship category, the only one that carries a
/// subtype.
const TIME_OF: &str = "timeOf";

/// Resolves each entity's mention references into embedded mention
/// records, in the order entities first appeared in the document.
///
/// A reference that does not resolve is a violation of the document's
/// referential contract and surfaces as an error; it is never skipped.
pub fn collect_entity_mentions(
    order: &[String],
    entities: &HashMap<String, ProjectedEntity>,
    mentions: &HashMap<String, ProjectedMention>,
) -> Result<Vec<Entity>> {
    let mut collected = Vec::with_capacity(order.len());

    for eid in order {
        let entity = entities
            .get(eid)
            .ok_or_else(|| Error::UnresolvedEntity(eid.clone()))?;

        let mut embedded = Vec::with_capacity(entity.mention_refs.len());
        for mid in &entity.mention_refs {
            let mention = mentions
                .get(mid)
                .ok_or_else(|| Error::UnresolvedMention(mid.clone()))?;
            embedded.push(mention.to_mention());
        }

        collected.push(entity.clone().into_entity(embedded));
    }

    Ok(collected)
}

/// Resolves each relationship's two entity arguments and each of its
/// mention occurrences' two mention arguments into embedded records.
pub fn collect_relationship_mentions(
    relations: Vec<RawRelation>,
    entities: &HashMap<String, ProjectedEntity>,
    mentions: &HashMap<String, ProjectedMention>,
    options: &ExtractOptions,
) -> Result<Vec<Relationship>> {
    relations
        .into_iter()
        .map(|relation| join_relationship(relation, entities, mentions, options))
        .collect()
}

fn join_relationship(
    relation: RawRelation,
    entities: &HashMap<String, ProjectedEntity>,
    mentions: &HashMap<String, ProjectedMention>,
    options: &ExtractOptions,
) -> Result<Relationship> {
    let subtype = if relation.relation_type == TIME_OF {
        relation.subtype
    } else {
        None
    };

    let args = relation.rel_entity_arg.into_vec();
    let [one, two] = args.as_slice() else {
        return Err(Error::MalformedRelationship(relation.relation_type));
    };
    let one = entities
        .get(&one.eid)
        .ok_or_else(|| Error::UnresolvedEntity(one.eid.clone()))?;
    let two = entities
        .get(&two.eid)
        .ok_or_else(|| Error::UnresolvedEntity(two.eid.clone()))?;

    let occurrences = relation
        .relmentions
        .map(|m| m.relmention.into_vec())
        .unwrap_or_default();

    let mut joined = Vec::with_capacity(occurrences.len());
    for occurrence in occurrences {
        let margs = occurrence.rel_mention_arg.into_vec();
        let [first, second] = margs.as_slice() else {
            return Err(Error::MalformedRelationship(relation.relation_type));
        };
        let first = mentions
            .get(&first.mid)
            .ok_or_else(|| Error::UnresolvedMention(first.mid.clone()))?;
        let second = mentions
            .get(&second.mid)
            .ok_or_else(|| Error::UnresolvedMention(second.mid.clone()))?;

        let score = options
            .include_scores
            .then(|| parse_score(occurrence.score.as_deref()));

        joined.push(RelationshipMention {
            score,
            class: occurrence.class,
            modality: occurrence.modality,
            tense: occurrence.tense,
            one: first.to_relationship_arg(),
            two: second.to_relationship_arg(),
        });
    }

    Ok(Relationship {
        relation_type: relation.relation_type,
        subtype,
        entities: RelationshipEntities {
            one: one.to_relationship_entity(),
            two: two.to_relationship_entity(),
        },
        mentions: joined,
    })
}
