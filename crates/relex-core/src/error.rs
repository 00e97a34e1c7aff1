use thiserror::Error;

use crate::parse::ParseError;
use crate::transport::TransportError;

#[derive(Debug, Error)]
pub enum Error {
    /// Usage error, raised before any I/O.
    #[error("Text to analyse is required")]
    EmptyText,

    /// No usable credentials from either the hosting environment or
    /// the explicit configuration. No request is issued.
    #[error("No authentication credentials provided for the relationship extraction service")]
    MissingCredentials,

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    /// A section decoded from the document does not have the expected
    /// shape.
    #[error("Malformed section payload: {0}")]
    Decode(#[from] serde_json::Error),

    /// A mention reference did not resolve within the response's own
    /// mentions collection. The document violates its referential
    /// contract, so this is the same class of failure as a parse
    /// error.
    #[error("Mention reference not found: {0}")]
    UnresolvedMention(String),

    /// An entity argument did not resolve within the response's own
    /// entities collection.
    #[error("Entity reference not found: {0}")]
    UnresolvedEntity(String),

    /// A relationship or relationship mention without exactly two
    /// arguments.
    #[error("Relationship {0} does not carry exactly two arguments")]
    MalformedRelationship(String),
}

pub type Result<T> = std::result::Result<T, Error>;
