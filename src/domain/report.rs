//! Aggregated classification results of one run

use super::{DependencyKind, DependencyResult};
use indexmap::IndexMap;
use serde::Serialize;

/// Results of one manifest section, keyed by package name in manifest order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionReport {
    /// Section the results belong to
    pub kind: DependencyKind,
    /// Non-up-to-date dependencies
    pub results: IndexMap<String, DependencyResult>,
}

impl SectionReport {
    /// Create a section report
    pub fn new(kind: DependencyKind, results: IndexMap<String, DependencyResult>) -> Self {
        Self { kind, results }
    }

    /// Results with an update target
    pub fn updates(&self) -> impl Iterator<Item = &DependencyResult> {
        self.results.values().filter(|r| !r.is_warning())
    }

    /// Results that only carry a warning
    pub fn warnings(&self) -> impl Iterator<Item = &DependencyResult> {
        self.results.values().filter(|r| r.is_warning())
    }

    /// `name@version` specifiers of every update, in manifest order
    pub fn install_specs(&self) -> Vec<String> {
        self.updates().filter_map(DependencyResult::install_spec).collect()
    }

    /// Returns true if the section has neither updates nor warnings
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// Everything a run found, section by section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Report {
    /// Sections in the order they were checked
    pub sections: Vec<SectionReport>,
    /// Whether the updates were installed during this run
    pub installed: bool,
}

impl Report {
    /// Create an empty report
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a section
    pub fn push(&mut self, section: SectionReport) {
        self.sections.push(section);
    }

    /// Mark the updates as installed
    pub fn mark_installed(&mut self) {
        self.installed = true;
    }

    /// Returns true if no section reports anything
    pub fn is_up_to_date(&self) -> bool {
        self.sections.iter().all(SectionReport::is_empty)
    }

    /// Number of results with an update target
    pub fn update_count(&self) -> usize {
        self.sections.iter().map(|s| s.updates().count()).sum()
    }

    /// Number of warning results
    pub fn warning_count(&self) -> usize {
        self.sections.iter().map(|s| s.warnings().count()).sum()
    }
}
