use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Dataset submitted as the `sid` form field when the caller does not
/// pick one.
pub const DEFAULT_DATASET: &str = "ie-en-news";

/// Environment variable a hosting platform uses to hand bound service
/// credentials to the application.
pub const VCAP_SERVICES: &str = "VCAP_SERVICES";

/// Controls which fields survive projection into the final response.
/// A disabled toggle removes the corresponding keys entirely rather
/// than leaving them null.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractOptions {
    /// Return entities together with the mentions of each entity.
    pub include_mentions: bool,
    /// Return relationships found between entities, with the mentions
    /// of each relationship.
    pub include_relationships: bool,
    /// Include character offsets into the input text.
    pub include_locations: bool,
    /// Include confidence scores, parsed to doubles in [0, 1].
    pub include_scores: bool,
    /// Include unique ids with entity and mention records.
    pub include_ids: bool,
    /// Extraction dataset.
    pub dataset: String,
    /// Explicit service credentials. Required when no bound service
    /// is available from the hosting environment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api: Option<ApiCredentials>,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            include_mentions: true,
            include_relationships: false,
            include_locations: false,
            include_scores: true,
            include_ids: false,
            dataset: DEFAULT_DATASET.to_string(),
            api: None,
        }
    }
}

impl ExtractOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_mentions(mut self, include: bool) -> Self {
        self.include_mentions = include;
        self
    }

    #[must_use]
    pub fn with_relationships(mut self, include: bool) -> Self {
        self.include_relationships = include;
        self
    }

    #[must_use]
    pub fn with_locations(mut self, include: bool) -> Self {
        self.include_locations = include;
        self
    }

    #[must_use]
    pub fn with_scores(mut self, include: bool) -> Self {
        self.include_scores = include;
        self
    }

    #[must_use]
    pub fn with_ids(mut self, include: bool) -> Self {
        self.include_ids = include;
        self
    }

    #[must_use]
    pub fn with_dataset(mut self, dataset: impl Into<String>) -> Self {
        self.dataset = dataset.into();
        self
    }

    #[must_use]
    pub fn with_api(mut self, api: ApiCredentials) -> Self {
        self.api = Some(api);
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiCredentials {
    pub url: String,
    pub user: String,
    pub pass: String,
}

/// Credentials actually used for a request, after resolution.
#[derive(Debug, Clone)]
pub struct ServiceCredentials {
    pub url: String,
    pub username: String,
    pub password: String,
}

/// Picks credentials for a request: a service bound by the hosting
/// environment wins, explicit options come second, and with neither
/// the call fails before any network activity.
pub fn resolve_credentials(options: &ExtractOptions) -> Result<ServiceCredentials> {
    let ambient = std::env::var(VCAP_SERVICES).ok();
    resolve_credentials_from(options, ambient.as_deref())
}

fn resolve_credentials_from(
    options: &ExtractOptions,
    ambient: Option<&str>,
) -> Result<ServiceCredentials> {
    if let Some(raw) = ambient {
        if let Some(credentials) = credentials_from_vcap(raw) {
            return Ok(credentials);
        }
        tracing::warn!(
            "hosting environment has no relationship extraction service bound; \
             falling back to explicit credentials"
        );
    }

    if let Some(api) = &options.api {
        return Ok(ServiceCredentials {
            url: api.url.clone(),
            username: api.user.clone(),
            password: api.pass.clone(),
        });
    }

    Err(Error::MissingCredentials)
}

fn credentials_from_vcap(raw: &str) -> Option<ServiceCredentials> {
    #[derive(Deserialize)]
    struct Services {
        relationship_extraction: Vec<Service>,
    }

    #[derive(Deserialize)]
    struct Service {
        credentials: Credentials,
    }

    #[derive(Deserialize)]
    struct Credentials {
        url: String,
        username: String,
        password: String,
    }

    let services: Services = serde_json::from_str(raw).ok()?;
    let service = services.relationship_extraction.into_iter().next()?;

    Some(ServiceCredentials {
        url: service.credentials.url,
        username: service.credentials.username,
        password: service.credentials.password,
    })
}
