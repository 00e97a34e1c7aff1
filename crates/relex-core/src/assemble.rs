//! Accumulates parsed sections and assembles the final response.
//!
//! Two phases, strictly ordered: every section is accumulated first,
//! and only at end of stream are the joiners run, because references
//! may point at records from anywhere in their section.

use std::collections::HashMap;

use serde_json::Value;

use crate::error::Result;
use crate::join::{collect_entity_mentions, collect_relationship_mentions};
use crate::options::ExtractOptions;
use crate::project::{project_entity, project_mention, ProjectedEntity, ProjectedMention};
use crate::response::ExtractResponse;
use crate::wire::{RawEntitySection, RawMentionSection, RawRelation, RawRelationSection};

pub struct ResponseAssembler {
    options: ExtractOptions,
    entities: HashMap<String, ProjectedEntity>,
    /// First-appearance order of entity ids. The id-keyed map alone
    /// would not give a deterministic output order.
    entity_order: Vec<String>,
    mentions: HashMap<String, ProjectedMention>,
    relations: Vec<RawRelation>,
}

impl ResponseAssembler {
    #[must_use]
    pub fn new(options: ExtractOptions) -> Self {
        Self {
            options,
            entities: HashMap::new(),
            entity_order: Vec::new(),
            mentions: HashMap::new(),
            relations: Vec::new(),
        }
    }

    /// Accumulates one completed section. No cross-reference is
    /// resolved here.
    pub fn ingest(&mut self, section: &str, payload: Value) -> Result<()> {
        match section {
            "entities" => {
                let section: RawEntitySection = serde_json::from_value(payload)?;
                for raw in section.entity.into_vec() {
                    let (eid, entity) = project_entity(raw, &self.options);
                    // ids are unique upstream; a collision overwrites,
                    // it is never merged or deduplicated
                    if self.entities.insert(eid.clone(), entity).is_none() {
                        self.entity_order.push(eid);
                    }
                }
                tracing::debug!(entities = self.entities.len(), "accumulated entities section");
            }
            "mentions" => {
                let section: RawMentionSection = serde_json::from_value(payload)?;
                for raw in section.mention.into_vec() {
                    let (mid, mention) = project_mention(raw, &self.options);
                    self.mentions.insert(mid, mention);
                }
                tracing::debug!(mentions = self.mentions.len(), "accumulated mentions section");
            }
            "relations" => {
                let section: RawRelationSection = serde_json::from_value(payload)?;
                self.relations = section.relation.into_vec();
                tracing::debug!(relations = self.relations.len(), "accumulated relations section");
            }
            other => {
                tracing::debug!(section = other, "ignoring unsubscribed section");
            }
        }
        Ok(())
    }

    /// Runs the joiners over the complete collections and produces
    /// the response. Consumes the assembler; a response is produced
    /// at most once.
    pub fn finish(self) -> Result<ExtractResponse> {
        let mut response = ExtractResponse::default();

        if self.options.include_mentions {
            response.entities = Some(collect_entity_mentions(
                &self.entity_order,
                &self.entities,
                &self.mentions,
            )?);
        }
        if self.options.include_relationships {
            response.relationships = Some(collect_relationship_mentions(
                self.relations,
                &self.entities,
                &self.mentions,
                &self.options,
            )?);
        }

        Ok(response)
    }
}
