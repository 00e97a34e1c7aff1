use std::sync::Arc;

use crate::assemble::ResponseAssembler;
use crate::error::{Error, Result};
use crate::options::{resolve_credentials, ExtractOptions};
use crate::parse::{SectionParser, SECTION_NAMES};
use crate::response::ExtractResponse;
use crate::transport::{HttpTransport, ServiceRequest, Transport};

/// Client for a relationship extraction service. Each call owns its
/// own accumulation state, so concurrent calls on one client are safe
/// and need no locking.
pub struct RelationshipExtractor {
    transport: Arc<dyn Transport>,
}

impl RelationshipExtractor {
    #[must_use]
    pub fn new() -> Self {
        Self {
            transport: Arc::new(HttpTransport::new()),
        }
    }

    /// Mostly for tests: run against a canned or instrumented
    /// transport.
    #[must_use]
    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Submits `text` to the extraction service and reconstructs the
    /// flat, id-referenced response document into a nested object
    /// graph shaped by `options`.
    ///
    /// Every failure surfaces as exactly one `Err`: empty text before
    /// any I/O, missing credentials before any request is issued, and
    /// transport, protocol, parse, and referential-integrity failures
    /// afterwards. No partial results are ever returned.
    pub async fn extract(
        &self,
        text: &str,
        options: &ExtractOptions,
    ) -> Result<ExtractResponse> {
        if text.trim().is_empty() {
            return Err(Error::EmptyText);
        }

        let credentials = resolve_credentials(options)?;
        let request = ServiceRequest {
            credentials,
            dataset: options.dataset.clone(),
            text: text.to_string(),
        };

        tracing::debug!(
            dataset = %request.dataset,
            chars = text.len(),
            "submitting extraction request"
        );
        let document = self.transport.submit(&request).await?;

        let mut assembler = ResponseAssembler::new(options.clone());
        let mut parser = SectionParser::new(&document, &SECTION_NAMES);
        while let Some((name, payload)) = parser.next_section()? {
            assembler.ingest(&name, payload)?;
        }
        assembler.finish()
    }
}

impl Default for RelationshipExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// One-shot convenience over a fresh [`RelationshipExtractor`].
pub async fn extract(text: &str, options: &ExtractOptions) -> Result<ExtractResponse> {
    RelationshipExtractor::new().extract(text, options).await
}
