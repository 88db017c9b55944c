//! Terminal output formatting and utilities.
//!
//! This module provides consistent output formatting across all commands,
//! including colors, the config report and error messages.

pub mod colors;
pub mod errors;
pub mod report;

use report::ColorReportStyle;
use sprout_core::Report;

/// Output handler for consistent terminal formatting
pub struct OutputHandler {
    colors: colors::ColorSupport,
}

impl OutputHandler {
    /// Create a new output handler
    pub fn new() -> Self {
        Self::with_colors(colors::ColorSupport::detect())
    }

    pub fn with_colors(colors: colors::ColorSupport) -> Self {
        Self { colors }
    }

    /// Print an info message
    pub fn info(&self, message: &str) {
        eprintln!("{}", self.colors.dim(message));
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        eprintln!("{} {}", self.colors.green("✓"), message);
    }

    /// Print a warning message
    pub fn warn(&self, message: &str) {
        eprintln!("{} {}", self.colors.yellow("⚠"), message);
    }

    /// Print an error message
    pub fn error(&self, message: &str) {
        eprintln!("{} {}", self.colors.red("✗"), message);
    }

    /// Render a config report with terminal colors
    pub fn format_report(&self, report: &Report) -> String {
        report.render_with(&ColorReportStyle::new(self.colors.clone()))
    }

    /// Print a config report to stderr
    pub fn print_report(&self, report: &Report) {
        eprintln!("{}", self.format_report(report));
    }

    /// Print a value as pretty JSON on stdout
    pub fn print_json(&self, value: &serde_json::Value) {
        println!("{:#}", value);
    }
}

impl Default for OutputHandler {
    fn default() -> Self {
        Self::new()
    }
}
