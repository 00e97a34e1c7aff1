//! Client library for Watson-style relationship extraction services.
//!
//! Submits text to the remote service, then reconstructs the flat,
//! id-referenced XML response into a denormalized, nested object
//! graph: entities carry their mentions, relationships carry their
//! entity and mention arguments, and which fields appear is driven
//! entirely by [`ExtractOptions`].

pub mod assemble;
pub mod client;
pub mod error;
pub mod join;
pub mod options;
pub mod parse;
pub mod project;
pub mod response;
pub mod transport;
pub mod wire;

pub use client::{extract, RelationshipExtractor};
pub use error::{Error, Result};
pub use options::{
    resolve_credentials, ApiCredentials, ExtractOptions, ServiceCredentials, DEFAULT_DATASET,
};
pub use parse::{ParseError, SectionParser, SECTION_NAMES};
pub use response::{
    Entity, ExtractResponse, Location, Mention, MentionScores, Relationship,
    RelationshipEntities, RelationshipEntity, RelationshipMention, RelationshipMentionArg,
};
pub use transport::{HttpTransport, ServiceRequest, Transport, TransportError};
pub use wire::{clean_id, OneOrMany};
