//! Text output formatter for human-readable display
//!
//! Per section:
//! - Outdated dependencies with their required range and proposed version
//! - The npm command that installs all of them
//! - Unregistered dependencies with the lookup failure

use crate::domain::{DependencyResult, DependencyStatus, Report, SectionReport};
use crate::output::{install_command, section_title, OutputFormatter, Verbosity};
use colored::Colorize;
use std::io::Write;

/// Message printed when no section reports anything
pub const UP_TO_DATE: &str = "All dependencies up to date";

/// Text formatter for human-readable output
pub struct TextFormatter {
    /// Verbosity level
    verbosity: Verbosity,
    /// Whether to use colors
    color: bool,
}

impl TextFormatter {
    /// Create a new text formatter
    pub fn new(verbosity: Verbosity) -> Self {
        Self {
            verbosity,
            color: true,
        }
    }

    /// Create a new text formatter with color option
    pub fn with_color(verbosity: Verbosity, color: bool) -> Self {
        Self { verbosity, color }
    }

    fn write_title(&self, title: &str, writer: &mut dyn Write) -> std::io::Result<()> {
        writeln!(writer)?;
        if self.color {
            writeln!(writer, "{}", title.yellow())?;
        } else {
            writeln!(writer, "{}", title)?;
        }
        writeln!(writer)
    }

    /// Format a single outdated line
    fn format_update_line(
        &self,
        result: &DependencyResult,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let DependencyStatus::Resolved {
            stable,
            latest,
            target,
        } = &result.status
        else {
            return Ok(());
        };

        if self.color {
            write!(
                writer,
                "{} {}{}{} {}{}{}",
                result.name.green(),
                "(package: ".dimmed(),
                result.required.blue(),
                ",".dimmed(),
                "latest: ".dimmed(),
                target.version.blue(),
                ")".dimmed()
            )?;
        } else {
            write!(
                writer,
                "{} (package: {}, latest: {})",
                result.name, result.required, target.version
            )?;
        }

        if self.verbosity == Verbosity::Verbose {
            let mut details = Vec::new();
            if let Some(stable) = stable {
                details.push(format!("in range: {}", stable));
            }
            if let Some(latest) = latest.as_ref().filter(|l| Some(*l) != stable.as_ref()) {
                details.push(format!("in range incl. prereleases: {}", latest));
            }
            if let Some(released_at) = target.released_at {
                details.push(format!("released {}", released_at.format("%Y/%m/%d %H:%M")));
            }
            if !details.is_empty() {
                let details = format!(" [{}]", details.join(", "));
                if self.color {
                    write!(writer, "{}", details.dimmed())?;
                } else {
                    write!(writer, "{}", details)?;
                }
            }
        }

        writeln!(writer)
    }

    /// Format a single warning line
    fn format_warning_line(
        &self,
        result: &DependencyResult,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let DependencyStatus::Unregistered { reason } = &result.status else {
            return Ok(());
        };

        if self.color {
            writeln!(
                writer,
                "{} {}{}{}",
                result.name.dimmed(),
                "(".dimmed(),
                reason.red(),
                ")".dimmed()
            )
        } else {
            writeln!(writer, "{} ({})", result.name, reason)
        }
    }

    /// Outdated listing plus install command; nothing when there are no updates
    pub fn format_updates(
        &self,
        section: &SectionReport,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let specs = section.install_specs();
        if specs.is_empty() {
            return Ok(());
        }

        self.write_title(&section_title("Outdated", section.kind), writer)?;
        for result in section.updates() {
            self.format_update_line(result, writer)?;
        }

        writeln!(writer)?;
        let command = install_command(section.kind, &specs);
        if self.color {
            writeln!(writer, "{}", command.dimmed())?;
        } else {
            writeln!(writer, "{}", command)?;
        }
        writeln!(writer)
    }

    /// Unregistered listing; nothing when there are no warnings
    pub fn format_warnings(
        &self,
        section: &SectionReport,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        if section.warnings().next().is_none() {
            return Ok(());
        }

        self.write_title(&section_title("Unregistered", section.kind), writer)?;
        for result in section.warnings() {
            self.format_warning_line(result, writer)?;
        }
        writeln!(writer)
    }
}

impl OutputFormatter for TextFormatter {
    fn format(&self, report: &Report, writer: &mut dyn Write) -> std::io::Result<()> {
        for section in &report.sections {
            if !report.installed {
                self.format_updates(section, writer)?;
            }
            self.format_warnings(section, writer)?;
        }

        if report.is_up_to_date() && self.verbosity != Verbosity::Quiet {
            if self.color {
                writeln!(writer, "{}", UP_TO_DATE.green())?;
            } else {
                writeln!(writer, "{}", UP_TO_DATE)?;
            }
        }

        Ok(())
    }
}
