//! Error message formatting with actionable suggestions.
//!
//! Validation failures are printed as their full config report; every other
//! error gets a one-line message, a suggestion when one exists, and its
//! source chain.

use super::colors::ColorSupport;
use super::report::ColorReportStyle;
use sprout_core::SproutError;
use std::error::Error;

/// Error formatter with suggestions
pub struct ErrorFormatter {
    colors: ColorSupport,
}

impl ErrorFormatter {
    /// Create a new error formatter
    pub fn new() -> Self {
        Self::with_colors(ColorSupport::detect())
    }

    pub fn with_colors(colors: ColorSupport) -> Self {
        Self { colors }
    }

    /// Format an error with context and suggestions
    pub fn format_error(&self, error: &SproutError) -> String {
        let mut output = String::new();

        if let Some(report) = error.report() {
            let style = ColorReportStyle::new(self.colors.clone());
            output.push_str(&report.render_with(&style));
            output.push('\n');
        }

        output.push_str(&self.colors.red("error"));
        output.push_str(": ");
        output.push_str(&error.to_string());
        output.push('\n');

        // Validation reports already show everything the user can act on
        if error.report().is_none() {
            if let Some(suggestion) = error.suggestion() {
                output.push('\n');
                output.push_str(&self.colors.dim("help"));
                output.push_str(": ");
                output.push_str(&suggestion);
                output.push('\n');
            }
        }

        let mut source = error.source();
        while let Some(err) = source {
            output.push('\n');
            output.push_str(&self.colors.dim("caused by"));
            output.push_str(": ");
            output.push_str(&err.to_string());
            source = err.source();
        }

        output
    }

    /// Format a simple error message
    pub fn format_simple(&self, message: &str) -> String {
        format!("{}: {}", self.colors.red("error"), message)
    }
}

impl Default for ErrorFormatter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sprout_core::{ConfigPath, ConfigValue, Report};

    fn formatter() -> ErrorFormatter {
        ErrorFormatter::with_colors(ColorSupport::disabled())
    }

    #[test]
    fn test_not_found_includes_help() {
        let error = SproutError::ConfigNotFound {
            path: "missing.json".to_string(),
        };
        let output = formatter().format_error(&error);
        assert!(output.starts_with("error: Couldn't find a config file at missing.json"));
        assert!(output.contains("help: Create a sprout.config.json file"));
    }

    #[test]
    fn test_validation_error_prints_report() {
        let mut report = Report::new(None);
        report.error(ConfigPath::root().key("foo"), ConfigValue::Bool(true), "Unexpected prop");
        let output = formatter().format_error(&SproutError::validation(report));
        assert!(output.contains("✖ foo = true"));
        assert!(output.contains("error: Invalid config: 1 error in default config"));
        assert!(!output.contains("help:"));
    }

    #[test]
    fn test_io_error_shows_cause() {
        let error = SproutError::io(
            "Failed to read sprout.config.json".to_string(),
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        let output = formatter().format_error(&error);
        assert!(output.contains("caused by: denied"));
        assert_eq!(formatter().format_simple("boom"), "error: boom");
    }
}
