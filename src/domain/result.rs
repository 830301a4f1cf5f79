//! Classification result types

use super::{Dependency, DependencyKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The version a dependency would be updated to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateTarget {
    /// Version string as published
    pub version: String,
    /// Publish time reported by the registry, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub released_at: Option<DateTime<Utc>>,
}

impl UpdateTarget {
    /// Creates a target without a publish time
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            released_at: None,
        }
    }

    /// Sets the publish time
    pub fn with_released_at(mut self, released_at: Option<DateTime<Utc>>) -> Self {
        self.released_at = released_at;
        self
    }
}

/// Outcome of classifying one dependency against the registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DependencyStatus {
    /// The package is registered and a newer version exists
    Resolved {
        /// Latest stable version satisfying the required range
        stable: Option<String>,
        /// Latest version of any kind satisfying the range (unstable mode only)
        latest: Option<String>,
        /// Version proposed as the update
        target: UpdateTarget,
    },
    /// The registry does not know the package
    Unregistered {
        /// Message describing the lookup failure
        reason: String,
    },
}

/// Result record for one declared dependency
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyResult {
    /// Package name
    pub name: String,
    /// Required range from the manifest
    pub required: String,
    /// Manifest section
    pub kind: DependencyKind,
    /// Classification outcome
    #[serde(flatten)]
    pub status: DependencyStatus,
}

impl DependencyResult {
    /// Creates a resolved result
    pub fn resolved(
        dependency: &Dependency,
        stable: Option<String>,
        latest: Option<String>,
        target: UpdateTarget,
    ) -> Self {
        Self {
            name: dependency.name.clone(),
            required: dependency.required.clone(),
            kind: dependency.kind,
            status: DependencyStatus::Resolved {
                stable,
                latest,
                target,
            },
        }
    }

    /// Creates an unregistered (warning) result
    pub fn unregistered(dependency: &Dependency, reason: impl Into<String>) -> Self {
        Self {
            name: dependency.name.clone(),
            required: dependency.required.clone(),
            kind: dependency.kind,
            status: DependencyStatus::Unregistered {
                reason: reason.into(),
            },
        }
    }

    /// Returns true if this result carries a warning instead of an update
    pub fn is_warning(&self) -> bool {
        matches!(self.status, DependencyStatus::Unregistered { .. })
    }

    /// Returns the update target, if this result is resolvable
    pub fn target(&self) -> Option<&UpdateTarget> {
        match &self.status {
            DependencyStatus::Resolved { target, .. } => Some(target),
            DependencyStatus::Unregistered { .. } => None,
        }
    }

    /// Returns the `name@version` install specifier, if this result is resolvable
    pub fn install_spec(&self) -> Option<String> {
        self.target()
            .map(|target| format!("{}@{}", self.name, target.version))
    }
}

impl fmt::Display for DependencyResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.status {
            DependencyStatus::Resolved { target, .. } => {
                write!(f, "{}: {} → {}", self.name, self.required, target.version)
            }
            DependencyStatus::Unregistered { reason } => {
                write!(f, "{}: unregistered ({})", self.name, reason)
            }
        }
    }
}
