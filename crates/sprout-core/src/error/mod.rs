//! Error types and result aliases for Sprout operations.
//!
//! Provides a unified error type that covers every fatal condition of the
//! configuration pipeline with actionable error messages.

use crate::diagnostics::Report;
use crate::types::ProjectType;
use thiserror::Error;

/// Unified error type for all Sprout operations
#[derive(Error, Debug)]
pub enum SproutError {
    // Loading errors
    #[error("Couldn't find a config file at {path}")]
    ConfigNotFound { path: String },

    #[error("Couldn't import the config file at {path}: {message}")]
    ConfigImport { path: String, message: String },

    // Validation errors
    #[error("{}", .report.summary())]
    ConfigValidation { report: Box<Report> },

    #[error("Unknown project type '{name}'")]
    UnknownProjectType { name: String },

    // IO errors
    #[error("IO error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for Sprout operations
pub type SproutResult<T> = Result<T, SproutError>;

impl SproutError {
    /// Create an IO error from std::io::Error
    pub fn io(message: String, source: std::io::Error) -> Self {
        Self::Io { message, source }
    }

    /// Wrap a report that contains errors
    pub fn validation(report: Report) -> Self {
        Self::ConfigValidation {
            report: Box::new(report),
        }
    }

    /// The diagnostics report attached to a validation failure
    pub fn report(&self) -> Option<&Report> {
        match self {
            SproutError::ConfigValidation { report } => Some(report),
            _ => None,
        }
    }

    /// Loading errors come from the config file itself, not from its contents
    pub fn is_load_error(&self) -> bool {
        matches!(
            self,
            SproutError::ConfigNotFound { .. } | SproutError::ConfigImport { .. }
        )
    }

    /// Get a user-friendly suggestion for fixing this error
    pub fn suggestion(&self) -> Option<String> {
        match self {
            SproutError::ConfigNotFound { .. } => Some(
                "Create a sprout.config.json file or point --config at an existing one".to_string(),
            ),
            SproutError::ConfigImport { .. } => {
                Some("Check the config file for syntax errors".to_string())
            },
            SproutError::ConfigValidation { .. } => {
                Some("Run 'sprout check-config' to see the full config report".to_string())
            },
            SproutError::UnknownProjectType { .. } => Some(format!(
                "Project type must be one of: {}",
                ProjectType::ALL
                    .iter()
                    .map(|t| t.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            )),
            SproutError::Io { .. } => None,
        }
    }
}
