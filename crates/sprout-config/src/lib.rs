//! Config compilation for Sprout
//!
//! This crate turns a user-authored config tree (from a config file, a
//! config function, and command-line flags) into a validated, normalized,
//! fully merged config plus a diagnostics report.

pub mod defaults;
pub mod derive;
pub mod json;
pub mod loader;
pub mod merge;
pub mod pipeline;
pub mod plugins;
pub mod schema;
pub mod shorthand;
pub mod toml;
pub mod validate;

// Re-export main types
pub use defaults::{cli_overrides, has_cli_overrides, project_defaults};
pub use derive::{derive_config, prepare_rule_config, prepare_style_config};
pub use loader::{ConfigLoader, LoadedConfig, CONFIG_FILE_NAMES};
pub use merge::{deep_merge, deep_merge_with, ArrayMerge, ConfigLayers, MergeStrategy};
pub use pipeline::{
    CompiledConfig, ConfigPipeline, MergedConfig, ToolHandle, TransformContext, UserConfig,
};
pub use plugins::{scan_plugins, PluginConfig};
pub use schema::{user_config_schema, Kind, Schema};
pub use shorthand::normalize;
pub use validate::validate;
