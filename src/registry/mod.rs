//! Registry adapters for fetching package version information
//!
//! This module provides:
//! - HTTP client shared foundation
//! - npm Registry adapter with a configurable base URL

mod client;
mod npm;

pub use client::HttpClient;
pub use npm::{NpmAdapter, DEFAULT_REGISTRY_URL};

use crate::error::RegistryError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Published metadata for one package
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RegistryEntry {
    /// Package name
    pub name: String,
    /// Every published version string
    pub versions: Vec<String>,
    /// Version the `latest` dist-tag points at
    pub latest_tag: Option<String>,
    /// Publish time per version, where reported
    pub published_at: HashMap<String, DateTime<Utc>>,
}

impl RegistryEntry {
    /// Create an entry from a list of versions (no tags or times)
    pub fn new(name: impl Into<String>, versions: &[&str]) -> Self {
        Self {
            name: name.into(),
            versions: versions.iter().map(|v| v.to_string()).collect(),
            ..Self::default()
        }
    }

    /// Publish time of `version`
    pub fn published_at(&self, version: &str) -> Option<DateTime<Utc>> {
        self.published_at.get(version).copied()
    }
}

/// Trait for registry adapters
#[async_trait]
pub trait RegistryAdapter: Send + Sync {
    /// Get the registry name used in messages
    fn registry_name(&self) -> &str;

    /// Fetch the published metadata of a package
    async fn fetch_entry(&self, package: &str) -> Result<RegistryEntry, RegistryError>;
}
