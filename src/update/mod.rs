//! Update classification for declared dependencies
//!
//! This module provides:
//! - npm range parsing and matching
//! - Latest-version resolution over published versions
//! - Classification options
//! - The classifier that decides, per dependency, whether a newer version exists

mod comparator;
mod filter;
mod range;

pub use comparator::{is_prerelease, newest, parse_versions, resolve_latest};
pub use filter::ClassifyOptions;
pub use range::{is_dist_tag, RangeError, VersionRange};

use crate::domain::{Dependency, DependencyResult, UpdateTarget};
use crate::error::RegistryError;
use crate::progress::Progress;
use crate::registry::{RegistryAdapter, RegistryEntry};
use indexmap::IndexMap;
use tracing::debug;

/// Classification results of one manifest section, in manifest order
pub type SectionResults = IndexMap<String, DependencyResult>;

/// Classifier that compares declared ranges against registry metadata
pub struct Classifier<'a> {
    /// Registry to query
    adapter: &'a dyn RegistryAdapter,
    /// Run options
    options: ClassifyOptions,
}

impl<'a> Classifier<'a> {
    /// Create a new classifier over the given registry
    pub fn new(adapter: &'a dyn RegistryAdapter, options: ClassifyOptions) -> Self {
        Self { adapter, options }
    }

    /// Judge one dependency against its registry entry
    ///
    /// Returns `None` when the dependency is up to date: there is no update
    /// candidate, the requirement is a dist-tag, or the range already admits
    /// (or sits above) the newest eligible version.
    pub fn judge(
        &self,
        dependency: &Dependency,
        entry: &RegistryEntry,
    ) -> Option<DependencyResult> {
        let unstable = self.options.unstable;
        let available = parse_versions(entry.versions.iter().map(String::as_str));
        let candidate = newest(&available, unstable)?;
        debug!(
            package = %dependency.name,
            %candidate,
            latest_tag = ?entry.latest_tag,
            "update candidate"
        );

        let candidate_str = candidate.to_string();
        let target = UpdateTarget::new(candidate_str.as_str())
            .with_released_at(entry.published_at(&candidate_str));

        if is_dist_tag(&dependency.required) {
            debug!(
                package = %dependency.name,
                tag = %dependency.required,
                "dist-tag requirement, skipping"
            );
            return None;
        }

        let range = match VersionRange::parse(&dependency.required) {
            Ok(range) => range,
            Err(e) => {
                // Git URLs, file paths and the like cannot be compared
                debug!(package = %dependency.name, error = %e, "unparseable requirement");
                return Some(DependencyResult::resolved(dependency, None, None, target));
            }
        };

        if !range.is_exceeded_by(candidate) {
            return None;
        }

        let stable = resolve_latest(&range, &available, false).map(ToString::to_string);
        let latest = if unstable {
            resolve_latest(&range, &available, true).map(ToString::to_string)
        } else {
            None
        };

        Some(DependencyResult::resolved(dependency, stable, latest, target))
    }

    /// Classify a manifest section
    pub async fn classify(
        &self,
        dependencies: &[Dependency],
    ) -> Result<SectionResults, RegistryError> {
        self.classify_with_progress(dependencies, &Progress::disabled()).await
    }

    /// Classify a manifest section, reporting each lookup on `progress`
    ///
    /// Registry lookups run one at a time in manifest order. A "not found"
    /// lookup becomes a warning result when `warn404` is set; every other
    /// failure aborts the whole section.
    pub async fn classify_with_progress(
        &self,
        dependencies: &[Dependency],
        progress: &Progress,
    ) -> Result<SectionResults, RegistryError> {
        let mut results = SectionResults::new();

        for dependency in dependencies {
            progress.set_message(&dependency.name);
            let outcome = self.adapter.fetch_entry(&dependency.name).await;
            progress.inc();

            let result = match outcome {
                Ok(entry) => self.judge(dependency, &entry),
                Err(e) if e.is_not_found() && self.options.warn404 => {
                    debug!(
                        package = %dependency.name,
                        registry = self.adapter.registry_name(),
                        "package is not registered"
                    );
                    Some(DependencyResult::unregistered(dependency, e.to_string()))
                }
                Err(e) => return Err(e),
            };

            if let Some(result) = result {
                if self.options.should_report(&dependency.name) {
                    results.insert(dependency.name.clone(), result);
                }
            }
        }

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DependencyKind, DependencyStatus};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// In-memory registry recording every lookup
    #[derive(Default)]
    struct MockRegistry {
        entries: HashMap<String, RegistryEntry>,
        broken: Vec<String>,
        calls: Mutex<Vec<String>>,
    }

    impl MockRegistry {
        fn with(mut self, name: &str, versions: &[&str]) -> Self {
            self.entries
                .insert(name.to_string(), RegistryEntry::new(name, versions));
            self
        }

        fn with_broken(mut self, name: &str) -> Self {
            self.broken.push(name.to_string());
            self
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl RegistryAdapter for MockRegistry {
        fn registry_name(&self) -> &str {
            "mock"
        }

        async fn fetch_entry(&self, package: &str) -> Result<RegistryEntry, RegistryError> {
            self.calls.lock().unwrap().push(package.to_string());
            if self.broken.iter().any(|b| b == package) {
                return Err(RegistryError::network_error(package, "mock", "connection reset"));
            }
            self.entries
                .get(package)
                .cloned()
                .ok_or_else(|| RegistryError::package_not_found(package, "mock"))
        }
    }

    fn dep(name: &str, required: &str) -> Dependency {
        Dependency::new(name, required, DependencyKind::Normal)
    }

    fn resolved_parts(result: &DependencyResult) -> (Option<String>, Option<String>, String) {
        match &result.status {
            DependencyStatus::Resolved {
                stable,
                latest,
                target,
            } => (stable.clone(), latest.clone(), target.version.clone()),
            other => panic!("expected resolved, got {:?}", other),
        }
    }

    #[test]
    fn test_judge_outdated_major() {
        let registry = MockRegistry::default();
        let classifier = Classifier::new(&registry, ClassifyOptions::new());
        let entry = RegistryEntry::new("a", &["1.2.0", "1.3.0", "2.0.0-beta.1", "2.0.0"]);

        let result = classifier.judge(&dep("a", "^1.2.0"), &entry).unwrap();
        let (stable, latest, target) = resolved_parts(&result);
        assert_eq!(stable.as_deref(), Some("1.3.0"));
        assert_eq!(latest, None);
        assert_eq!(target, "2.0.0");
        assert_eq!(result.install_spec().as_deref(), Some("a@2.0.0"));
    }

    #[test]
    fn test_judge_unstable_mode_fills_latest() {
        let registry = MockRegistry::default();
        let options = ClassifyOptions::new().with_unstable(true);
        let classifier = Classifier::new(&registry, options);
        let entry = RegistryEntry::new("a", &["1.2.0", "1.3.0", "2.0.0-beta.1", "2.0.0"]);

        let result = classifier.judge(&dep("a", "^1.2.0"), &entry).unwrap();
        let (stable, latest, target) = resolved_parts(&result);
        assert_eq!(stable.as_deref(), Some("1.3.0"));
        assert_eq!(latest.as_deref(), Some("1.3.0"));
        assert_eq!(target, "2.0.0");
    }

    #[test]
    fn test_judge_unstable_targets_prerelease() {
        let registry = MockRegistry::default();
        let options = ClassifyOptions::new().with_unstable(true);
        let classifier = Classifier::new(&registry, options);
        let entry = RegistryEntry::new("a", &["1.0.0", "2.0.0-rc.1"]);

        let result = classifier.judge(&dep("a", "^1.0.0"), &entry).unwrap();
        let (stable, latest, target) = resolved_parts(&result);
        assert_eq!(stable.as_deref(), Some("1.0.0"));
        assert_eq!(latest.as_deref(), Some("1.0.0"));
        assert_eq!(target, "2.0.0-rc.1");
    }

    #[test]
    fn test_judge_up_to_date_within_range() {
        let registry = MockRegistry::default();
        let classifier = Classifier::new(&registry, ClassifyOptions::new());
        let entry = RegistryEntry::new("a", &["1.2.0", "1.3.0", "2.0.0-beta.1"]);

        assert!(classifier.judge(&dep("a", "^1.2.0"), &entry).is_none());
    }

    #[test]
    fn test_judge_ignores_prerelease_in_stable_mode() {
        let registry = MockRegistry::default();
        let classifier = Classifier::new(&registry, ClassifyOptions::new());
        let entry = RegistryEntry::new("a", &["1.0.0", "2.0.0-rc.1"]);

        assert!(classifier.judge(&dep("a", "^1.0.0"), &entry).is_none());
    }

    #[test]
    fn test_judge_star_and_tags_are_up_to_date() {
        let registry = MockRegistry::default();
        let classifier = Classifier::new(&registry, ClassifyOptions::new());
        let entry = RegistryEntry::new("a", &["1.0.0", "9.0.0"]);

        assert!(classifier.judge(&dep("a", "*"), &entry).is_none());
        assert!(classifier.judge(&dep("a", ""), &entry).is_none());
        assert!(classifier.judge(&dep("a", "latest"), &entry).is_none());
    }

    #[test]
    fn test_judge_range_above_newest_is_up_to_date() {
        let registry = MockRegistry::default();
        let classifier = Classifier::new(&registry, ClassifyOptions::new());
        let entry = RegistryEntry::new("a", &["2.0.0", "2.5.0"]);

        assert!(classifier.judge(&dep("a", ">=3.0.0"), &entry).is_none());
    }

    #[test]
    fn test_judge_unparseable_requirement_is_outdated() {
        let registry = MockRegistry::default();
        let classifier = Classifier::new(&registry, ClassifyOptions::new());
        let entry = RegistryEntry::new("a", &["1.0.0"]);

        let result = classifier
            .judge(&dep("a", "git+https://example.com/a.git"), &entry)
            .unwrap();
        let (stable, latest, target) = resolved_parts(&result);
        assert_eq!(stable, None);
        assert_eq!(latest, None);
        assert_eq!(target, "1.0.0");
    }

    #[test]
    fn test_judge_exact_pin_with_build_metadata_sibling() {
        let registry = MockRegistry::default();
        let classifier = Classifier::new(&registry, ClassifyOptions::new());
        let entry = RegistryEntry::new("a", &["1.0.0", "1.0.0+build.5"]);

        assert!(classifier.judge(&dep("a", "1.0.0"), &entry).is_none());
        assert!(classifier.judge(&dep("a", "=1.0.0"), &entry).is_none());
    }

    #[test]
    fn test_judge_no_versions_is_up_to_date() {
        let registry = MockRegistry::default();
        let classifier = Classifier::new(&registry, ClassifyOptions::new());
        let entry = RegistryEntry::new("a", &[]);

        assert!(classifier.judge(&dep("a", "^1.0.0"), &entry).is_none());
    }

    #[tokio::test]
    async fn test_classify_warn404_records_warning_and_continues() {
        let registry = MockRegistry::default().with("b", &["1.0.0", "2.0.0"]);
        let options = ClassifyOptions::new().with_warn404(true);
        let classifier = Classifier::new(&registry, options);

        let results = classifier
            .classify(&[dep("missing", "^1.0.0"), dep("b", "^1.0.0")])
            .await
            .unwrap();

        assert_eq!(registry.calls(), vec!["missing", "b"]);
        assert_eq!(results.len(), 2);
        assert!(results["missing"].is_warning());
        assert!(!results["b"].is_warning());
    }

    #[tokio::test]
    async fn test_classify_404_is_fatal_without_warn404() {
        let registry = MockRegistry::default().with("b", &["2.0.0"]);
        let classifier = Classifier::new(&registry, ClassifyOptions::new());

        let result = classifier
            .classify(&[dep("missing", "^1.0.0"), dep("b", "^1.0.0")])
            .await;

        assert!(matches!(result, Err(RegistryError::PackageNotFound { .. })));
        assert_eq!(registry.calls(), vec!["missing"]);
    }

    #[tokio::test]
    async fn test_classify_network_error_is_fatal_even_with_warn404() {
        let registry = MockRegistry::default()
            .with("b", &["2.0.0"])
            .with_broken("flaky");
        let options = ClassifyOptions::new().with_warn404(true);
        let classifier = Classifier::new(&registry, options);

        let result = classifier
            .classify(&[dep("flaky", "^1.0.0"), dep("b", "^1.0.0")])
            .await;

        assert!(matches!(result, Err(RegistryError::NetworkError { .. })));
        assert_eq!(registry.calls(), vec!["flaky"]);
    }

    #[tokio::test]
    async fn test_classify_omits_up_to_date_and_keeps_order() {
        let registry = MockRegistry::default()
            .with("zeta", &["1.0.0", "2.0.0"])
            .with("current", &["1.0.0", "1.1.0"])
            .with("alpha", &["0.1.0", "0.2.0"]);
        let classifier = Classifier::new(&registry, ClassifyOptions::new());

        let results = classifier
            .classify(&[
                dep("zeta", "^1.0.0"),
                dep("current", "^1.0.0"),
                dep("alpha", "^0.1.0"),
            ])
            .await
            .unwrap();

        let names: Vec<&str> = results.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["zeta", "alpha"]);
    }

    #[tokio::test]
    async fn test_classify_name_filter() {
        let registry = MockRegistry::default()
            .with("a", &["2.0.0"])
            .with("b", &["2.0.0"]);
        let options = ClassifyOptions::new().with_names(vec!["b".to_string()]);
        let classifier = Classifier::new(&registry, options);

        let results = classifier
            .classify(&[dep("a", "^1.0.0"), dep("b", "^1.0.0")])
            .await
            .unwrap();

        assert_eq!(results.len(), 1);
        assert!(results.contains_key("b"));
    }

    #[tokio::test]
    async fn test_classify_is_idempotent() {
        let registry = MockRegistry::default()
            .with("a", &["1.0.0", "1.5.0", "2.0.0", "3.0.0-beta.0"])
            .with("b", &["0.1.0", "0.2.0"]);
        let options = ClassifyOptions::new().with_unstable(true).with_warn404(true);
        let classifier = Classifier::new(&registry, options);
        let deps = [dep("a", "^1.0.0"), dep("b", "~0.1.0"), dep("c", "*")];

        let first = classifier.classify(&deps).await.unwrap();
        let second = classifier.classify(&deps).await.unwrap();

        assert_eq!(first, second);
    }
}
