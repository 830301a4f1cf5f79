//! Classification options
//!
//! This module provides the ClassifyOptions struct that carries the run
//! configuration into every classification call.

/// Options for dependency classification
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassifyOptions {
    /// Consider prerelease versions as update candidates
    pub unstable: bool,
    /// Record unknown packages as warnings instead of failing
    pub warn404: bool,
    /// If non-empty, only report these packages
    pub names: Vec<String>,
}

impl ClassifyOptions {
    /// Create options with default settings (stable only, 404 is fatal)
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether prereleases are considered
    pub fn with_unstable(mut self, unstable: bool) -> Self {
        self.unstable = unstable;
        self
    }

    /// Set whether unknown packages only produce a warning
    pub fn with_warn404(mut self, warn404: bool) -> Self {
        self.warn404 = warn404;
        self
    }

    /// Restrict the report to the given package names
    pub fn with_names(mut self, names: Vec<String>) -> Self {
        self.names = names;
        self
    }

    /// Check if a package should appear in the report
    pub fn should_report(&self, name: &str) -> bool {
        self.names.is_empty() || self.names.iter().any(|n| n == name)
    }
}
