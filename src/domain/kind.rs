//! Dependency section types for package.json and the global package list

use serde::{Deserialize, Serialize};
use std::fmt;

/// The manifest section a dependency is declared in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyKind {
    /// `dependencies`
    Normal,
    /// `devDependencies`
    Dev,
    /// `optionalDependencies`
    Optional,
    /// Packages installed with `npm install --global`
    Global,
}

impl DependencyKind {
    /// Returns the label used in report headers ("Outdated Dev Dependencies")
    pub fn label(&self) -> &'static str {
        match self {
            DependencyKind::Normal => "",
            DependencyKind::Dev => "Dev",
            DependencyKind::Optional => "Optional",
            DependencyKind::Global => "Global",
        }
    }

    /// Returns the npm flag that saves an install into this section
    pub fn save_flag(&self) -> &'static str {
        match self {
            DependencyKind::Normal => "--save",
            DependencyKind::Dev => "--save-dev",
            DependencyKind::Optional => "--save-optional",
            DependencyKind::Global => "--global",
        }
    }

    /// Sections of a project manifest in install order
    pub fn project_sections() -> &'static [DependencyKind] {
        &[
            DependencyKind::Normal,
            DependencyKind::Dev,
            DependencyKind::Optional,
        ]
    }
}

impl fmt::Display for DependencyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DependencyKind::Normal => "normal",
            DependencyKind::Dev => "dev",
            DependencyKind::Optional => "optional",
            DependencyKind::Global => "global",
        };
        write!(f, "{}", name)
    }
}
