//! Model Catalog Fetcher for JGChat.
//!
//! Queries the provider's model-listing endpoint and organizes the result
//! into the catalog shown in the admin model selector. The caller stores
//! the organized list in the settings store on success; a failed refresh
//! leaves the cached catalog untouched.

use std::time::Duration;

use serde_json::Value;

use crate::types::errors::CatalogError;
use crate::types::model::ModelDescriptor;

const DEFAULT_API_BASE: &str = "https://api.anthropic.com";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const REFRESH_TIMEOUT: Duration = Duration::from_secs(15);

/// Trait defining model catalog operations.
pub trait ModelCatalogTrait {
    fn refresh(&self, api_key: &str) -> Result<Vec<ModelDescriptor>, CatalogError>;
}

/// Model catalog fetcher owning a bounded-timeout HTTP client.
pub struct ModelCatalog {
    client: reqwest::blocking::Client,
    api_base: String,
}

impl ModelCatalog {
    pub fn new() -> Result<Self, CatalogError> {
        Self::with_api_base(DEFAULT_API_BASE)
    }

    /// Creates a catalog fetcher pointed at an alternate base URL.
    pub fn with_api_base(api_base: &str) -> Result<Self, CatalogError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(REFRESH_TIMEOUT)
            .build()
            .map_err(|e| CatalogError::NetworkError(e.to_string()))?;
        Ok(Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
        })
    }
}

impl ModelCatalogTrait for ModelCatalog {
    /// Fetches the provider's model list and returns the organized catalog.
    fn refresh(&self, api_key: &str) -> Result<Vec<ModelDescriptor>, CatalogError> {
        if api_key.is_empty() {
            return Err(CatalogError::NotConfigured);
        }

        let response = self
            .client
            .get(format!("{}/v1/models", self.api_base))
            .header("Content-Type", "application/json")
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .send()
            .map_err(|e| CatalogError::NetworkError(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .map_err(|e| CatalogError::NetworkError(e.to_string()))?;

        if status != 200 {
            return Err(CatalogError::ApiError { status, body });
        }

        let parsed: Value = serde_json::from_str(&body)
            .map_err(|e| CatalogError::ParseError(e.to_string()))?;

        log::debug!("model catalog refreshed, organizing response");
        Ok(organize_models(&parsed))
    }
}

/// Filters and sorts the provider's raw model listing.
///
/// Keeps entries whose id contains "claude" and whose `deprecated` flag is
/// not true, maps them to descriptors (the full id doubles as the display
/// name), and sorts by `created` descending.
pub fn organize_models(body: &Value) -> Vec<ModelDescriptor> {
    let mut models: Vec<ModelDescriptor> = body
        .get("data")
        .and_then(|d| d.as_array())
        .map(|entries| {
            entries
                .iter()
                .filter_map(|entry| {
                    let id = entry.get("id").and_then(|v| v.as_str())?;
                    if !id.contains("claude") {
                        return None;
                    }
                    if entry.get("deprecated").and_then(|v| v.as_bool()) == Some(true) {
                        return None;
                    }
                    Some(ModelDescriptor {
                        id: id.to_string(),
                        name: id.to_string(),
                        description: entry
                            .get("description")
                            .and_then(|v| v.as_str())
                            .unwrap_or("")
                            .to_string(),
                        created: entry.get("created").and_then(|v| v.as_i64()).unwrap_or(0),
                        latest: entry.get("latest").and_then(|v| v.as_bool()) == Some(true),
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    models.sort_by(|a, b| b.created.cmp(&a.created));
    models
}
