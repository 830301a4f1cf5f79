//! Global package listing
//!
//! Builds a manifest from the output of `npm ls --global --depth=0 --json`,
//! using each installed version as the required range.

use crate::error::ManifestError;
use crate::manifest::{DependencyMap, Manifest};
use indexmap::IndexMap;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct GlobalListing {
    #[serde(default)]
    dependencies: IndexMap<String, GlobalPackage>,
}

#[derive(Debug, Deserialize)]
struct GlobalPackage {
    #[serde(default)]
    version: Option<String>,
}

/// Parse the JSON printed by `npm ls --global --depth=0 --json`
pub fn parse_global_listing(json: &str) -> Result<Manifest, ManifestError> {
    let listing: GlobalListing =
        serde_json::from_str(json).map_err(|e| ManifestError::GlobalListError {
            message: format!("unexpected npm ls output: {}", e),
        })?;

    let global: DependencyMap = listing
        .dependencies
        .into_iter()
        .filter_map(|(name, package)| package.version.map(|version| (name, version)))
        .collect();

    Ok(Manifest {
        global,
        ..Manifest::default()
    })
}
