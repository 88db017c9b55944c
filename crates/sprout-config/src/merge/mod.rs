//! Config layering and deep merging.
//!
//! Layers are merged lowest to highest precedence. Maps merge key by key,
//! anything else from a higher layer replaces the lower value wholesale, and
//! `null` never overrides a value that is already present.

use sprout_core::{ConfigMap, ConfigValue};
use tracing::debug;

/// Top-level namespaces every merged config contains
pub const NAMESPACES: [&str; 5] = ["babel", "devServer", "karma", "npm", "webpack"];

/// Fields whose arrays accumulate across layers instead of being replaced
pub const CONCAT_FIELDS: [&[&str]; 2] = [&["babel", "presets"], &["babel", "plugins"]];

/// How arrays from two layers are combined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArrayMerge {
    /// The higher layer's array replaces the lower one
    #[default]
    Replace,
    /// The higher layer's items are appended to the lower ones
    Concat,
}

/// Merge behaviour for one merge operation
#[derive(Debug, Clone, Copy, Default)]
pub struct MergeStrategy<'a> {
    /// Default handling of arrays
    pub arrays: ArrayMerge,
    /// Paths whose arrays always concatenate
    pub concat_fields: &'a [&'a [&'a str]],
}

/// Where a config layer came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    /// Empty namespaces
    Baseline,
    /// Defaults for the project type and build mode
    ProjectDefaults,
    /// The user's config file or transform
    User,
    /// Flags passed on the command line
    CommandLine,
}

/// Ordered config layers, lowest precedence first
#[derive(Debug, Clone, Default)]
pub struct ConfigLayers {
    layers: Vec<(ConfigSource, ConfigValue)>,
}

impl<'a> MergeStrategy<'a> {
    /// Concatenate arrays everywhere
    pub fn concat_arrays() -> Self {
        Self {
            arrays: ArrayMerge::Concat,
            concat_fields: &[],
        }
    }

    fn arrays_at(&self, path: &[&str]) -> ArrayMerge {
        if self.concat_fields.iter().any(|field| *field == path) {
            ArrayMerge::Concat
        } else {
            self.arrays
        }
    }
}

impl ConfigSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigSource::Baseline => "baseline",
            ConfigSource::ProjectDefaults => "project defaults",
            ConfigSource::User => "user config",
            ConfigSource::CommandLine => "command line",
        }
    }
}

impl ConfigLayers {
    /// Start from the baseline layer holding every namespace as an empty map
    pub fn new() -> Self {
        let mut layers = Self::default();
        layers.push(ConfigSource::Baseline, baseline());
        layers
    }

    /// Add a higher-precedence layer
    pub fn push(&mut self, source: ConfigSource, config: ConfigValue) -> &mut Self {
        self.layers.push((source, config));
        self
    }

    /// Merge every layer in order
    pub fn merge(&self) -> ConfigValue {
        let strategy = MergeStrategy {
            arrays: ArrayMerge::Replace,
            concat_fields: &CONCAT_FIELDS,
        };
        self.layers
            .iter()
            .fold(ConfigValue::object(), |merged, (source, config)| {
                debug!(source = source.as_str(), "Merging config layer");
                deep_merge_with(&merged, config, &strategy)
            })
    }
}

/// A config holding every namespace as an empty map
pub fn baseline() -> ConfigValue {
    let map: ConfigMap = NAMESPACES
        .iter()
        .map(|namespace| ((*namespace).to_string(), ConfigValue::object()))
        .collect();
    ConfigValue::Object(map)
}

/// Merge `overlay` over `base`, replacing arrays
pub fn deep_merge(base: &ConfigValue, overlay: &ConfigValue) -> ConfigValue {
    deep_merge_with(base, overlay, &MergeStrategy::default())
}

/// Merge `overlay` over `base` using `strategy`
pub fn deep_merge_with(
    base: &ConfigValue,
    overlay: &ConfigValue,
    strategy: &MergeStrategy<'_>,
) -> ConfigValue {
    let mut path = Vec::new();
    merge_at(base, overlay, strategy, &mut path)
}

fn merge_at<'k>(
    base: &'k ConfigValue,
    overlay: &'k ConfigValue,
    strategy: &MergeStrategy<'_>,
    path: &mut Vec<&'k str>,
) -> ConfigValue {
    match (base, overlay) {
        (_, ConfigValue::Null) => base.clone(),
        (ConfigValue::Object(base_map), ConfigValue::Object(overlay_map)) => {
            let mut merged = base_map.clone();
            for (key, value) in overlay_map {
                if value.is_null() {
                    continue;
                }
                path.push(key);
                let next = match base_map.get(key) {
                    Some(existing) => merge_at(existing, value, strategy, path),
                    None => value.clone(),
                };
                path.pop();
                merged.insert(key.clone(), next);
            }
            ConfigValue::Object(merged)
        },
        (ConfigValue::Array(base_items), ConfigValue::Array(overlay_items))
            if strategy.arrays_at(path) == ArrayMerge::Concat =>
        {
            let mut items = base_items.clone();
            items.extend(overlay_items.iter().cloned());
            ConfigValue::Array(items)
        },
        _ => overlay.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn value(json: serde_json::Value) -> ConfigValue {
        ConfigValue::from(json)
    }

    #[test]
    fn test_maps_merge_recursively() {
        let merged = deep_merge(
            &value(json!({"npm": {"cjs": true, "umd": {"global": "A"}}})),
            &value(json!({"npm": {"umd": {"entry": "src/index.js"}}})),
        );
        assert_eq!(
            merged,
            value(json!({"npm": {"cjs": true, "umd": {"global": "A", "entry": "src/index.js"}}}))
        );
    }

    #[test]
    fn test_scalars_and_arrays_are_replaced() {
        let merged = deep_merge(
            &value(json!({"karma": {"browsers": ["PhantomJS"], "testContext": "a.js"}})),
            &value(json!({"karma": {"browsers": ["Chrome"], "testContext": "b.js"}})),
        );
        assert_eq!(
            merged,
            value(json!({"karma": {"browsers": ["Chrome"], "testContext": "b.js"}}))
        );
    }

    #[test]
    fn test_null_never_overrides() {
        let merged = deep_merge(
            &value(json!({"npm": {"cjs": true}})),
            &value(json!({"npm": {"cjs": null}, "webpack": null})),
        );
        assert_eq!(merged, value(json!({"npm": {"cjs": true}})));
    }

    #[test]
    fn test_false_does_override() {
        let merged = deep_merge(
            &value(json!({"npm": {"umd": {"global": "A"}}})),
            &value(json!({"npm": {"umd": false}})),
        );
        assert_eq!(merged, value(json!({"npm": {"umd": false}})));
    }

    #[test]
    fn test_concat_fields() {
        let mut layers = ConfigLayers::new();
        layers
            .push(ConfigSource::ProjectDefaults, value(json!({"babel": {"presets": ["react"]}})))
            .push(
                ConfigSource::User,
                value(json!({"babel": {"presets": ["stage-0"], "env": {"a": [1]}}})),
            )
            .push(ConfigSource::CommandLine, value(json!({"babel": {"env": {"a": [2]}}})));
        let merged = layers.merge();
        assert_eq!(
            merged.get("babel"),
            Some(&value(json!({"presets": ["react", "stage-0"], "env": {"a": [2]}})))
        );
    }

    #[test]
    fn test_empty_layers_give_every_namespace() {
        let merged = ConfigLayers::new().merge();
        assert_eq!(
            merged,
            value(json!({"babel": {}, "devServer": {}, "karma": {}, "npm": {}, "webpack": {}}))
        );
    }

    #[test]
    fn test_concat_arrays_strategy() {
        let merged = deep_merge_with(
            &value(json!({"plugins": ["a"], "files": ["x"]})),
            &value(json!({"plugins": ["b"]})),
            &MergeStrategy::concat_arrays(),
        );
        assert_eq!(merged, value(json!({"plugins": ["a", "b"], "files": ["x"]})));
    }
}
