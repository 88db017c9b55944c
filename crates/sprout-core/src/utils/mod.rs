//! Utility functions and helpers.
//!
//! Common functionality used across multiple Sprout crates.

pub mod text;

// Re-export commonly used utilities
pub use text::{edit_distance, join_or, pluralise, suggest_similar};
