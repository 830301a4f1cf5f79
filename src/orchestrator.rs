//! Run orchestrator
//!
//! This module provides:
//! - Workflow coordination: load manifest → classify sections → install
//! - Sequential registry queries, one section after another
//! - Installation of updates in update mode

use crate::cli::CliArgs;
use crate::domain::{DependencyKind, Report, SectionReport};
use crate::error::AppError;
use crate::manifest::{load_manifest, Manifest};
use crate::package_manager::{
    run_installs, InstallRequest, PackageManagerRunner, SystemPackageManager,
};
use crate::progress::Progress;
use crate::registry::{HttpClient, NpmAdapter, RegistryAdapter};
use crate::update::{Classifier, ClassifyOptions};
use tracing::{debug, info};

/// Orchestrator for one depstat run
pub struct Orchestrator {
    /// CLI arguments for configuration
    args: CliArgs,
    /// Registry the classifier queries
    adapter: Box<dyn RegistryAdapter>,
    /// npm runner for installs and the global listing
    runner: Box<dyn PackageManagerRunner>,
}

impl Orchestrator {
    /// Create an orchestrator talking to the configured registry and the system npm
    pub fn new(args: CliArgs) -> Result<Self, AppError> {
        args.validate()?;

        let client = HttpClient::new()?;
        let adapter = NpmAdapter::with_registry(client, &args.registry);

        Ok(Self {
            args,
            adapter: Box::new(adapter),
            runner: Box::new(SystemPackageManager::new()),
        })
    }

    /// Create an orchestrator with custom registry and runner (for testing)
    pub fn with_parts(
        args: CliArgs,
        adapter: Box<dyn RegistryAdapter>,
        runner: Box<dyn PackageManagerRunner>,
    ) -> Self {
        Self {
            args,
            adapter,
            runner,
        }
    }

    /// Classification options derived from the arguments
    pub fn classify_options(&self) -> ClassifyOptions {
        ClassifyOptions::new()
            .with_unstable(self.args.unstable)
            .with_warn404(self.args.warn404)
            .with_names(self.args.names())
    }

    /// Sections checked in this run, in order
    pub fn sections(&self) -> &'static [DependencyKind] {
        if self.args.global {
            &[DependencyKind::Global]
        } else {
            DependencyKind::project_sections()
        }
    }

    /// Load the declared dependencies: package.json, or the global listing
    pub fn load_manifest(&self) -> Result<Manifest, AppError> {
        let manifest = if self.args.global {
            self.runner.list_global(&self.args.registry)?
        } else {
            load_manifest(&self.args.project_dir())?
        };
        debug!(dependencies = manifest.len(), "manifest loaded");
        Ok(manifest)
    }

    /// Run the workflow
    pub async fn run(&self) -> Result<Report, AppError> {
        let show_progress = !self.args.quiet && !self.args.json;
        let mut progress = Progress::for_terminal(show_progress);
        self.run_with_progress(&mut progress).await
    }

    /// Run the workflow reporting on `progress`
    ///
    /// Any registry failure that is not a tolerated "not found" aborts the
    /// run. In update mode the install of a section only starts after every
    /// section has been classified.
    pub async fn run_with_progress(&self, progress: &mut Progress) -> Result<Report, AppError> {
        if self.args.global {
            progress.spinner("Listing global packages...");
        }
        let manifest = self.load_manifest();
        progress.finish_and_clear();
        let manifest = manifest?;

        let classifier = Classifier::new(self.adapter.as_ref(), self.classify_options());
        let mut report = Report::new();

        for &kind in self.sections() {
            let dependencies = manifest.section(kind);
            progress.start_section(kind, dependencies.len());
            let results = classifier
                .classify_with_progress(&dependencies, progress)
                .await;
            progress.finish_and_clear();

            report.push(SectionReport::new(kind, results?));
        }

        if self.args.is_update() {
            let requests = self.install_requests(&report);
            if requests.iter().any(|r| !r.is_empty()) {
                progress.spinner("Installing updates...");
            }
            let installed = run_installs(self.runner.as_ref(), &requests);
            progress.finish_and_clear();

            for result in installed? {
                info!(command = %result.command, "installed");
            }
            report.mark_installed();
        }

        Ok(report)
    }

    /// One install request per section, in section order
    pub fn install_requests(&self, report: &Report) -> Vec<InstallRequest> {
        report
            .sections
            .iter()
            .map(|section| {
                InstallRequest::new(
                    section.kind,
                    section.install_specs(),
                    self.args.registry.clone(),
                    self.args.project_dir(),
                )
            })
            .collect()
    }
}
