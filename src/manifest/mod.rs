//! Declared dependencies of a project or of the global npm prefix
//!
//! This module provides functionality to:
//! - Load `package.json` from a project directory
//! - Build a manifest from the `npm ls --global` listing
//! - Split a manifest into the sections the classifier works on

mod global;
mod package_json;

pub use global::parse_global_listing;
pub use package_json::{load_manifest, parse_package_json, PACKAGE_JSON};

use crate::domain::{Dependency, DependencyKind};
use indexmap::IndexMap;

/// Name → required range, in declaration order
pub type DependencyMap = IndexMap<String, String>;

/// A project's declared dependencies, partitioned by section
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    /// `dependencies`
    pub dependencies: DependencyMap,
    /// `devDependencies`
    pub dev_dependencies: DependencyMap,
    /// `optionalDependencies`
    pub optional_dependencies: DependencyMap,
    /// Globally installed packages with their installed versions
    pub global: DependencyMap,
}

impl Manifest {
    /// Returns the name → range map of one section
    pub fn section_map(&self, kind: DependencyKind) -> &DependencyMap {
        match kind {
            DependencyKind::Normal => &self.dependencies,
            DependencyKind::Dev => &self.dev_dependencies,
            DependencyKind::Optional => &self.optional_dependencies,
            DependencyKind::Global => &self.global,
        }
    }

    /// Returns the dependencies of one section
    pub fn section(&self, kind: DependencyKind) -> Vec<Dependency> {
        self.section_map(kind)
            .iter()
            .map(|(name, required)| Dependency::new(name.clone(), required.clone(), kind))
            .collect()
    }

    /// Total number of declared dependencies across sections
    pub fn len(&self) -> usize {
        self.dependencies.len()
            + self.dev_dependencies.len()
            + self.optional_dependencies.len()
            + self.global.len()
    }

    /// Returns true if nothing is declared
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
