//! CLI argument parsing module for depstat

use crate::error::ConfigError;
use crate::registry::DEFAULT_REGISTRY_URL;
use clap::Parser;
use reqwest::Url;
use std::path::PathBuf;

/// Words that switch from reporting to installing
const UPDATE_COMMANDS: [&str; 2] = ["update", "u"];

/// Report and install newer versions of npm dependencies
#[derive(Parser, Debug, Clone)]
#[command(
    name = "depstat",
    about = "Get latest dependency version information",
    disable_version_flag = true
)]
pub struct CliArgs {
    /// `update` (or `u`) to install the updates; any other word restricts the
    /// report to that package
    #[arg(value_name = "COMMAND|NAME")]
    pub words: Vec<String>,

    /// Consider global dependencies
    #[arg(short, long)]
    pub global: bool,

    /// Use unstable (prerelease) versions
    #[arg(short, long)]
    pub unstable: bool,

    /// The npm registry URL
    #[arg(short, long, default_value = DEFAULT_REGISTRY_URL)]
    pub registry: String,

    /// If a dependency is not found, continue and warn
    #[arg(long)]
    pub warn404: bool,

    /// Print version number and exit
    #[arg(short = 'v', long = "version")]
    pub print_version: bool,

    /// Project directory containing package.json (default: current directory)
    #[arg(long)]
    pub path: Option<PathBuf>,

    /// Output results in JSON format
    #[arg(long)]
    pub json: bool,

    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,

    /// Enable quiet mode - minimal output
    #[arg(short, long)]
    pub quiet: bool,
}

impl CliArgs {
    /// Check if the run installs updates instead of only reporting them
    pub fn is_update(&self) -> bool {
        self.words
            .iter()
            .any(|w| UPDATE_COMMANDS.contains(&w.as_str()))
    }

    /// Package names the report is restricted to
    pub fn names(&self) -> Vec<String> {
        self.words
            .iter()
            .filter(|w| !UPDATE_COMMANDS.contains(&w.as_str()))
            .cloned()
            .collect()
    }

    /// Project directory, defaulting to the current directory
    pub fn project_dir(&self) -> PathBuf {
        self.path.clone().unwrap_or_else(|| PathBuf::from("."))
    }

    /// Version line printed by `--version`
    pub fn version_line() -> String {
        format!("v{}", env!("CARGO_PKG_VERSION"))
    }

    /// Check option combinations that clap cannot express
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.quiet && self.verbose {
            return Err(ConfigError::ConflictingOptions {
                message: "--quiet and --verbose cannot be used together".to_string(),
            });
        }

        if self.global && self.path.is_some() {
            return Err(ConfigError::ConflictingOptions {
                message: "--path has no effect together with --global".to_string(),
            });
        }

        let url = Url::parse(&self.registry).map_err(|e| ConfigError::InvalidRegistry {
            value: self.registry.clone(),
            message: e.to_string(),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidRegistry {
                value: self.registry.clone(),
                message: format!("unsupported scheme '{}'", url.scheme()),
            });
        }

        if let Some(path) = &self.path {
            if !path.is_dir() {
                return Err(ConfigError::InvalidPath {
                    path: path.clone(),
                    message: "not a directory".to_string(),
                });
            }
        }

        Ok(())
    }
}
