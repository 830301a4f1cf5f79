//! package.json loader
//!
//! Handles:
//! - dependencies
//! - devDependencies
//! - optionalDependencies

use crate::error::ManifestError;
use crate::manifest::{DependencyMap, Manifest};
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;

/// Manifest filename looked up in the project directory
pub const PACKAGE_JSON: &str = "package.json";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PackageJson {
    #[serde(default)]
    dependencies: IndexMap<String, Value>,
    #[serde(default)]
    dev_dependencies: IndexMap<String, Value>,
    #[serde(default)]
    optional_dependencies: IndexMap<String, Value>,
}

/// Load `package.json` from a project directory
pub fn load_manifest(dir: &Path) -> Result<Manifest, ManifestError> {
    let path = dir.join(PACKAGE_JSON);
    if !path.is_file() {
        return Err(ManifestError::not_found(path));
    }

    let content =
        std::fs::read_to_string(&path).map_err(|e| ManifestError::read_error(&path, e))?;
    parse_package_json(&content, &path)
}

/// Parse package.json content; `path` is only used in error messages
pub fn parse_package_json(content: &str, path: &Path) -> Result<Manifest, ManifestError> {
    let package: PackageJson = serde_json::from_str(content)
        .map_err(|e| ManifestError::json_parse_error(path, e.to_string()))?;

    Ok(Manifest {
        dependencies: string_entries(package.dependencies),
        dev_dependencies: string_entries(package.dev_dependencies),
        optional_dependencies: string_entries(package.optional_dependencies),
        global: DependencyMap::new(),
    })
}

/// Keep entries whose value is a range string
fn string_entries(section: IndexMap<String, Value>) -> DependencyMap {
    section
        .into_iter()
        .filter_map(|(name, value)| match value {
            Value::String(required) => Some((name, required)),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn parse(content: &str) -> Result<Manifest, ManifestError> {
        parse_package_json(content, &PathBuf::from(PACKAGE_JSON))
    }

    #[test]
    fn test_parse_all_sections() {
        let content = r#"{
            "name": "demo",
            "dependencies": {"lodash": "^4.17.21", "express": "~4.18.2"},
            "devDependencies": {"typescript": "^5.0.0"},
            "optionalDependencies": {"fsevents": "^2.3.0"},
            "peerDependencies": {"react": "^18.0.0"}
        }"#;

        let manifest = parse(content).unwrap();
        assert_eq!(manifest.dependencies.len(), 2);
        assert_eq!(manifest.dependencies["lodash"], "^4.17.21");
        assert_eq!(manifest.dev_dependencies["typescript"], "^5.0.0");
        assert_eq!(manifest.optional_dependencies["fsevents"], "^2.3.0");
        assert!(manifest.global.is_empty());
    }

    #[test]
    fn test_parse_preserves_declaration_order() {
        let content = r#"{"dependencies": {"zeta": "1", "alpha": "2", "mid": "3"}}"#;
        let manifest = parse(content).unwrap();
        let names: Vec<&str> = manifest.dependencies.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_parse_skips_non_string_values() {
        let content = r#"{"dependencies": {"ok": "^1.0.0", "odd": {"version": "1.0.0"}}}"#;
        let manifest = parse(content).unwrap();
        assert_eq!(manifest.dependencies.len(), 1);
        assert!(manifest.dependencies.contains_key("ok"));
    }

    #[test]
    fn test_parse_empty_object() {
        let manifest = parse("{}").unwrap();
        assert!(manifest.is_empty());
    }

    #[test]
    fn test_parse_invalid_json() {
        let result = parse("not json");
        assert!(matches!(result, Err(ManifestError::JsonParseError { .. })));
    }

    #[test]
    fn test_load_manifest_missing() {
        let temp_dir = tempfile::tempdir().unwrap();
        let result = load_manifest(temp_dir.path());
        assert!(matches!(result, Err(ManifestError::NotFound { .. })));
    }

    #[test]
    fn test_load_manifest() {
        let temp_dir = tempfile::tempdir().unwrap();
        std::fs::write(
            temp_dir.path().join(PACKAGE_JSON),
            r#"{"dependencies": {"lodash": "^4.0.0"}}"#,
        )
        .unwrap();

        let manifest = load_manifest(temp_dir.path()).unwrap();
        assert_eq!(manifest.dependencies["lodash"], "^4.0.0");
    }
}
