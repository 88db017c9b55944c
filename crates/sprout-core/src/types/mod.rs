//! Core data types for the Sprout config pipeline.
//!
//! This module provides the fundamental types used throughout Sprout:
//! - Config tree values and their paths
//! - Command-line arguments as consumed by the pipeline
//! - Project types and build modes

pub mod args;
pub mod path;
pub mod project;
pub mod value;

// Re-export all public types
pub use args::CliArgs;
pub use path::{ConfigPath, Segment};
pub use project::{BuildMode, ProjectType};
pub use value::{ConfigFn, ConfigMap, ConfigValue, Pattern};
