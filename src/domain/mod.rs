//! Core domain models for depstat
//!
//! This module contains the fundamental types used throughout the application:
//! - Dependency sections (normal, dev, optional, global)
//! - Declared dependency records
//! - Classification results and the per-run report

mod dependency;
mod kind;
mod report;
mod result;

pub use dependency::Dependency;
pub use kind::DependencyKind;
pub use report::{Report, SectionReport};
pub use result::{DependencyResult, DependencyStatus, UpdateTarget};
