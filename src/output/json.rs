//! JSON output formatter for machine processing
//!
//! One document per run with a section entry for every non-empty section.

use crate::domain::{DependencyKind, DependencyResult, Report, SectionReport};
use crate::output::{install_command, OutputFormatter, Verbosity};
use serde::Serialize;
use std::io::Write;

/// JSON formatter for machine-readable output
pub struct JsonFormatter {
    /// Verbosity level affects detail in output
    verbosity: Verbosity,
}

impl JsonFormatter {
    /// Create a new JSON formatter
    pub fn new(verbosity: Verbosity) -> Self {
        Self { verbosity }
    }
}

/// JSON representation of the full report
#[derive(Serialize)]
struct JsonOutput<'a> {
    /// Whether the updates were installed
    installed: bool,
    /// True if no section reports anything
    up_to_date: bool,
    /// Summary counts
    summary: JsonSummary,
    /// Non-empty sections
    sections: Vec<JsonSection<'a>>,
}

#[derive(Serialize)]
struct JsonSummary {
    outdated: usize,
    unregistered: usize,
}

/// JSON representation of a section
#[derive(Serialize)]
struct JsonSection<'a> {
    kind: DependencyKind,
    outdated: Vec<JsonUpdate<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    unregistered: Vec<&'a DependencyResult>,
    /// Install command, absent when nothing is installable
    #[serde(skip_serializing_if = "Option::is_none")]
    install: Option<String>,
}

/// An outdated dependency; the full result record only in verbose mode
#[derive(Serialize)]
#[serde(untagged)]
enum JsonUpdate<'a> {
    Brief {
        name: &'a str,
        required: &'a str,
        latest: &'a str,
    },
    Full(&'a DependencyResult),
}

impl JsonFormatter {
    fn section_to_json<'a>(&self, section: &'a SectionReport, installed: bool) -> JsonSection<'a> {
        let outdated = section
            .updates()
            .filter_map(|result| {
                if self.verbosity == Verbosity::Verbose {
                    return Some(JsonUpdate::Full(result));
                }
                result.target().map(|target| JsonUpdate::Brief {
                    name: &result.name,
                    required: &result.required,
                    latest: &target.version,
                })
            })
            .collect();

        let specs = section.install_specs();
        let install = if installed || specs.is_empty() {
            None
        } else {
            Some(install_command(section.kind, &specs))
        };

        JsonSection {
            kind: section.kind,
            outdated,
            unregistered: section.warnings().collect(),
            install,
        }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format(&self, report: &Report, writer: &mut dyn Write) -> std::io::Result<()> {
        let output = JsonOutput {
            installed: report.installed,
            up_to_date: report.is_up_to_date(),
            summary: JsonSummary {
                outdated: report.update_count(),
                unregistered: report.warning_count(),
            },
            sections: report
                .sections
                .iter()
                .filter(|s| !s.is_empty())
                .map(|s| self.section_to_json(s, report.installed))
                .collect(),
        };

        serde_json::to_writer_pretty(&mut *writer, &output)?;
        writeln!(writer)
    }
}
