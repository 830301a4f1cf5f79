//! npm integration
//!
//! This module provides:
//! - Installing updated dependencies, one manifest section per npm invocation
//! - Listing globally installed packages

use crate::domain::DependencyKind;
use crate::error::{InstallError, ManifestError};
use crate::manifest::{parse_global_listing, Manifest};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tracing::{debug, info};

/// Name of the package manager executable
pub const NPM: &str = "npm";

/// One npm install invocation for a manifest section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallRequest {
    /// Section the packages are saved into
    pub kind: DependencyKind,
    /// `name@version` specifiers
    pub specs: Vec<String>,
    /// Registry base URL passed to npm
    pub registry: String,
    /// Directory npm runs in
    pub working_dir: PathBuf,
}

impl InstallRequest {
    /// Create a new install request
    pub fn new(
        kind: DependencyKind,
        specs: Vec<String>,
        registry: impl Into<String>,
        working_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            kind,
            specs,
            registry: registry.into(),
            working_dir: working_dir.into(),
        }
    }

    /// Returns true if there is nothing to install
    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Arguments passed to npm
    pub fn args(&self) -> Vec<String> {
        let mut args = vec![
            "install".to_string(),
            self.kind.save_flag().to_string(),
            "--registry".to_string(),
            self.registry.clone(),
        ];
        args.extend(self.specs.iter().cloned());
        args
    }

    /// Full command line, for logs and error messages
    pub fn command_line(&self) -> String {
        format!("{} {}", NPM, self.args().join(" "))
    }
}

/// Result of one npm install invocation
#[derive(Debug, Clone)]
pub struct InstallResult {
    /// Section that was installed
    pub kind: DependencyKind,
    /// The command that was executed
    pub command: String,
    /// Whether the command succeeded
    pub success: bool,
    /// Exit status as reported by the OS
    pub status: String,
    /// Standard output from the command
    pub stdout: String,
    /// Standard error from the command
    pub stderr: String,
}

impl InstallResult {
    /// Build a result from a finished process
    pub fn from_output(request: &InstallRequest, output: &Output) -> Self {
        Self {
            kind: request.kind,
            command: request.command_line(),
            success: output.status.success(),
            status: output.status.to_string(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        }
    }

    /// Convert a failed run into an error
    pub fn into_result(self) -> Result<Self, InstallError> {
        if self.success {
            Ok(self)
        } else {
            Err(InstallError::Failed {
                kind: self.kind,
                command: self.command,
                status: self.status,
                stderr: self.stderr,
            })
        }
    }
}

/// Trait for running package manager commands
pub trait PackageManagerRunner {
    /// Install the requested specifiers into their section
    fn install(&self, request: &InstallRequest) -> Result<InstallResult, InstallError>;

    /// List globally installed packages as a manifest
    fn list_global(&self, registry: &str) -> Result<Manifest, ManifestError>;
}

/// Runner that executes the real npm binary
#[derive(Debug, Default)]
pub struct SystemPackageManager;

impl SystemPackageManager {
    /// Create a new system package manager
    pub fn new() -> Self {
        Self
    }

    fn run_command(
        &self,
        args: &[String],
        working_dir: Option<&Path>,
    ) -> std::io::Result<Output> {
        let mut command = Command::new(NPM);
        command.args(args);
        if let Some(dir) = working_dir {
            command.current_dir(dir);
        }
        command.output()
    }
}

impl PackageManagerRunner for SystemPackageManager {
    fn install(&self, request: &InstallRequest) -> Result<InstallResult, InstallError> {
        let command = request.command_line();
        info!(kind = %request.kind, command = %command, "installing");

        let working_dir = match request.kind {
            DependencyKind::Global => None,
            _ => Some(request.working_dir.as_path()),
        };
        let output = self
            .run_command(&request.args(), working_dir)
            .map_err(|source| InstallError::Spawn { command, source })?;

        Ok(InstallResult::from_output(request, &output))
    }

    fn list_global(&self, registry: &str) -> Result<Manifest, ManifestError> {
        let args: Vec<String> = [
            "ls",
            "--global",
            "--depth=0",
            "--json",
            "--registry",
            registry,
        ]
        .iter()
        .map(ToString::to_string)
        .collect();
        debug!(command = %format!("{} {}", NPM, args.join(" ")), "listing global packages");

        let output = self
            .run_command(&args, None)
            .map_err(|e| ManifestError::GlobalListError {
                message: format!("failed to run {}: {}", NPM, e),
            })?;

        // npm ls exits non-zero on extraneous or invalid packages but still
        // prints the tree
        let stdout = String::from_utf8_lossy(&output.stdout);
        if stdout.trim().is_empty() {
            return Err(ManifestError::GlobalListError {
                message: format!(
                    "{} exited with {}: {}",
                    NPM,
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            });
        }

        parse_global_listing(&stdout)
    }
}

/// Run install requests in order, stopping at the first failure
///
/// Requests without specifiers are skipped. Already completed installs are
/// not rolled back.
pub fn run_installs<R: PackageManagerRunner + ?Sized>(
    runner: &R,
    requests: &[InstallRequest],
) -> Result<Vec<InstallResult>, InstallError> {
    let mut results = Vec::new();
    for request in requests.iter().filter(|r| !r.is_empty()) {
        let result = runner.install(request)?.into_result()?;
        results.push(result);
    }
    Ok(results)
}
