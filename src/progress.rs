//! Terminal feedback while registry lookups and installs run
//!
//! Drawn on stderr with indicatif so stdout stays clean for the report.

use crate::domain::DependencyKind;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::io::IsTerminal;
use std::time::Duration;

const SPINNER_TICKS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏";

/// Progress reporter for one run
pub struct Progress {
    /// Whether anything is drawn at all
    enabled: bool,
    /// Current bar or spinner
    bar: Option<ProgressBar>,
}

impl Progress {
    /// Create a new progress reporter
    pub fn new(enabled: bool) -> Self {
        Self { enabled, bar: None }
    }

    /// Create a disabled progress reporter
    pub fn disabled() -> Self {
        Self::new(false)
    }

    /// Enabled only when `wanted` and stderr is an interactive terminal
    pub fn for_terminal(wanted: bool) -> Self {
        Self::new(wanted && std::io::stderr().is_terminal())
    }

    /// Show a spinner for an operation of unknown length
    pub fn spinner(&mut self, message: &str) {
        if !self.enabled {
            return;
        }

        let spinner = ProgressBar::with_draw_target(None, ProgressDrawTarget::stderr());
        let style = ProgressStyle::default_spinner()
            .tick_chars(SPINNER_TICKS)
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        spinner.set_style(style);
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(Duration::from_millis(80));
        self.replace(spinner);
    }

    /// Start a bar over the registry lookups of one manifest section
    pub fn start_section(&mut self, kind: DependencyKind, total: usize) {
        if !self.enabled || total == 0 {
            return;
        }

        let bar = ProgressBar::with_draw_target(Some(total as u64), ProgressDrawTarget::stderr());
        let style = ProgressStyle::default_bar()
            .template("{spinner:.cyan} {prefix} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓▒░");
        bar.set_style(style);
        bar.set_prefix(section_prefix(kind));
        bar.enable_steady_tick(Duration::from_millis(100));
        self.replace(bar);
    }

    /// Increment progress by one
    pub fn inc(&self) {
        if let Some(ref bar) = self.bar {
            bar.inc(1);
        }
    }

    /// Update the message
    pub fn set_message(&self, message: &str) {
        if let Some(ref bar) = self.bar {
            bar.set_message(message.to_string());
        }
    }

    /// Finish and clear the current bar
    pub fn finish_and_clear(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }

    fn replace(&mut self, bar: ProgressBar) {
        self.finish_and_clear();
        self.bar = Some(bar);
    }
}

impl Drop for Progress {
    fn drop(&mut self) {
        self.finish_and_clear();
    }
}

fn section_prefix(kind: DependencyKind) -> String {
    match kind.label() {
        "" => "Checking dependencies".to_string(),
        label => format!("Checking {} dependencies", label.to_lowercase()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_disabled() {
        let mut progress = Progress::disabled();
        progress.spinner("Listing global packages");
        progress.start_section(DependencyKind::Normal, 10);
        progress.inc();
        progress.set_message("lodash");
        progress.finish_and_clear();
    }

    #[test]
    fn test_progress_enabled() {
        let mut progress = Progress::new(true);
        progress.start_section(DependencyKind::Dev, 3);
        progress.inc();
        progress.set_message("mocha");
        progress.inc();
        progress.spinner("Installing");
        progress.finish_and_clear();
    }

    #[test]
    fn test_empty_section_draws_nothing() {
        let mut progress = Progress::new(true);
        progress.start_section(DependencyKind::Optional, 0);
        assert!(progress.bar.is_none());
    }

    #[test]
    fn test_section_prefix() {
        assert_eq!(section_prefix(DependencyKind::Normal), "Checking dependencies");
        assert_eq!(
            section_prefix(DependencyKind::Dev),
            "Checking dev dependencies"
        );
        assert_eq!(
            section_prefix(DependencyKind::Global),
            "Checking global dependencies"
        );
    }
}
