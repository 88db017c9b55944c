//! # sprout-core
//!
//! Core types and utilities shared across all Sprout crates.
//!
//! This crate provides:
//! - `ConfigValue`, the tagged value union every config tree is built from
//! - `ConfigPath` for precise, segment-based addressing of config locations
//! - `Report` for path-addressed errors, deprecations and hints
//! - `SproutError` for unified error handling
//!
//! ## Architecture
//!
//! The crate is organized into modules:
//! - `types`: Core data types (ConfigValue, ConfigPath, CliArgs, ProjectType, BuildMode)
//! - `diagnostics`: The diagnostics report and its plain-text rendering
//! - `error`: Error types and result aliases
//! - `utils`: Text helpers shared by the validator and the report

pub mod diagnostics;
pub mod error;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use diagnostics::{DiagnosticKind, Notice, PlainStyle, Report, ReportStyle, ValueError};
pub use error::{SproutError, SproutResult};
pub use types::{
    BuildMode, CliArgs, ConfigFn, ConfigMap, ConfigPath, ConfigValue, Pattern, ProjectType,
    Segment,
};
