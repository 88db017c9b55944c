//! Test-runner plugin resolution for Sprout
//!
//! This crate resolves the browsers, frameworks, reporters and plugins a test
//! run needs from the user's `karma` config, filling in defaults and making
//! sure the plugins those defaults depend on are loaded.

pub mod plugins;
pub mod runner;

// Re-export main types
pub use plugins::{
    find_plugin, process_plugin_config, resolve_test_runner_config, PluginDefinition, PluginEntry,
    TestRunnerOptions, TestRunnerPlugins,
};
pub use runner::{create_test_runner_config, RunnerArgs};
