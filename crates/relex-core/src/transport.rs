use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use url::Url;

use crate::options::ServiceCredentials;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Invalid service URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    /// Non-success status from the remote service, usually
    /// not-authorised when the wrong user/pass was provided.
    #[error("Received {reason} from server")]
    Status { status: u16, reason: String },
}

pub type TransportResult<T> = Result<T, TransportError>;

/// One prepared submission to the extraction service.
#[derive(Debug, Clone)]
pub struct ServiceRequest {
    pub credentials: ServiceCredentials,
    /// Dataset, sent as the `sid` form field.
    pub dataset: String,
    /// Text to analyse, sent as the `txt` form field.
    pub text: String,
}

/// Black-box fetch collaborator: yields the response document or a
/// transport-level failure. Swappable so tests can run against canned
/// documents.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn submit(&self, request: &ServiceRequest) -> TransportResult<String>;
}

pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    #[must_use]
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    pub fn with_timeout(timeout: Duration) -> TransportResult<Self> {
        Ok(Self {
            client: reqwest::Client::builder().timeout(timeout).build()?,
        })
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn submit(&self, request: &ServiceRequest) -> TransportResult<String> {
        let endpoint = Url::parse(&request.credentials.url)?;

        let response = self
            .client
            .post(endpoint)
            .basic_auth(
                &request.credentials.username,
                Some(&request.credentials.password),
            )
            .form(&[
                ("sid", request.dataset.as_str()),
                ("txt", request.text.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
                reason: status
                    .canonical_reason()
                    .unwrap_or("unrecognised status")
                    .to_string(),
            });
        }

        Ok(response.text().await?)
    }
}
