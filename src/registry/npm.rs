//! npm Registry adapter
//!
//! Fetches package metadata from an npm-compatible registry.
//! API endpoint: {registry}/{package}

use crate::error::RegistryError;
use crate::registry::{HttpClient, RegistryAdapter, RegistryEntry};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::HashMap;

/// Default npm registry URL
pub const DEFAULT_REGISTRY_URL: &str = "https://registry.npmjs.org/";

/// npm Registry adapter
pub struct NpmAdapter {
    client: HttpClient,
    base_url: String,
}

/// npm package metadata response
#[derive(Debug, Deserialize)]
struct NpmPackageResponse {
    /// Available versions
    #[serde(default)]
    versions: HashMap<String, serde_json::Value>,
    /// Distribution tags (`latest`, `next`, ...)
    #[serde(rename = "dist-tags", default)]
    dist_tags: HashMap<String, String>,
    /// Publish times keyed by version, plus `created`/`modified`
    #[serde(default)]
    time: HashMap<String, String>,
}

impl NpmAdapter {
    /// Create an adapter for the public npm registry
    pub fn new(client: HttpClient) -> Self {
        Self::with_registry(client, DEFAULT_REGISTRY_URL)
    }

    /// Create an adapter for a custom registry base URL
    pub fn with_registry(client: HttpClient, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Build the URL for a package
    fn build_url(&self, package: &str) -> String {
        // Scoped packages: @scope/name -> @scope%2Fname
        let encoded = if package.starts_with('@') {
            package.replace('/', "%2F")
        } else {
            package.to_string()
        };
        format!("{}/{}", self.base_url, encoded)
    }
}

#[async_trait]
impl RegistryAdapter for NpmAdapter {
    fn registry_name(&self) -> &str {
        &self.base_url
    }

    async fn fetch_entry(&self, package: &str) -> Result<RegistryEntry, RegistryError> {
        let url = self.build_url(package);
        let response: NpmPackageResponse = self
            .client
            .get_json(&url, package, self.registry_name())
            .await?;

        let published_at = response
            .time
            .iter()
            .filter(|(version, _)| response.versions.contains_key(*version))
            .filter_map(|(version, time)| {
                time.parse::<DateTime<Utc>>()
                    .ok()
                    .map(|t| (version.clone(), t))
            })
            .collect();

        let mut versions: Vec<String> = response.versions.into_keys().collect();
        versions.sort();

        Ok(RegistryEntry {
            name: package.to_string(),
            versions,
            latest_tag: response.dist_tags.get("latest").cloned(),
            published_at,
        })
    }
}
