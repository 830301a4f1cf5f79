//! Dependency information structures

use super::DependencyKind;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A declared dependency: a name and the range string required for it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    /// Package name
    pub name: String,
    /// Required range exactly as written in the manifest (e.g. `^1.2.0`)
    pub required: String,
    /// Manifest section the dependency is declared in
    pub kind: DependencyKind,
}

impl Dependency {
    /// Creates a new dependency
    pub fn new(name: impl Into<String>, required: impl Into<String>, kind: DependencyKind) -> Self {
        Self {
            name: name.into(),
            required: required.into(),
            kind,
        }
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            DependencyKind::Normal => write!(f, "{}@{}", self.name, self.required),
            kind => write!(f, "{}@{} ({})", self.name, self.required, kind),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dependency_new() {
        let dep = Dependency::new("lodash", "^4.17.21", DependencyKind::Normal);
        assert_eq!(dep.name, "lodash");
        assert_eq!(dep.required, "^4.17.21");
        assert_eq!(dep.kind, DependencyKind::Normal);
    }

    #[test]
    fn test_display_normal() {
        let dep = Dependency::new("lodash", "^4.17.21", DependencyKind::Normal);
        assert_eq!(format!("{}", dep), "lodash@^4.17.21");
    }

    #[test]
    fn test_display_dev() {
        let dep = Dependency::new("mocha", "~10.0.0", DependencyKind::Dev);
        assert_eq!(format!("{}", dep), "mocha@~10.0.0 (dev)");
    }
}
