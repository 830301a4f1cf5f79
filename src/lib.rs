//! depstat - npm dependency status library
//!
//! This library reports which dependencies of a package.json (or of the
//! global npm prefix) have newer versions published, and installs them:
//! - npm range parsing and latest-version resolution
//! - Registry lookups against any npm-compatible registry
//! - Text and JSON reports
//! - `npm install` of the updates, section by section

pub mod cli;
pub mod domain;
pub mod error;
pub mod logging;
pub mod manifest;
pub mod orchestrator;
pub mod output;
pub mod package_manager;
pub mod progress;
pub mod registry;
pub mod update;
