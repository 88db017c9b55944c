//! Post-merge structural transforms.
//!
//! These run on validated, merged config and lift loosely placed keys into
//! the sub-objects the build tools expect. Each returns a new value and is a
//! no-op on its own output.

use sprout_core::{ConfigMap, ConfigValue};

use crate::plugins::PluginConfig;

/// Keys a rule descriptor keeps at its top level
pub const RULE_RESERVED_KEYS: [&str; 6] = ["test", "include", "exclude", "loader", "use", "options"];

/// Move a rule's non-reserved keys into a new `options` map.
///
/// Rules that already declare `options` are returned unchanged.
pub fn prepare_rule_config(rule: &ConfigMap) -> ConfigMap {
    if rule.contains_key("options") {
        return rule.clone();
    }
    let mut prepared = ConfigMap::new();
    let mut options = ConfigMap::new();
    for (key, value) in rule {
        if RULE_RESERVED_KEYS.contains(&key.as_str()) {
            prepared.insert(key.clone(), value.clone());
        } else {
            options.insert(key.clone(), value.clone());
        }
    }
    if !options.is_empty() {
        prepared.insert("options".to_string(), ConfigValue::Object(options));
    }
    prepared
}

/// Move loader-name keys of every style rule entry to `loaders.<name>.options`
pub fn prepare_style_config(styles: &ConfigMap, loader_names: &[String]) -> ConfigMap {
    styles
        .iter()
        .map(|(style_type, entries)| {
            let prepared = match entries {
                ConfigValue::Array(entries) => ConfigValue::Array(
                    entries
                        .iter()
                        .map(|entry| match entry {
                            ConfigValue::Object(entry) => {
                                ConfigValue::Object(prepare_style_entry(entry, loader_names))
                            },
                            other => other.clone(),
                        })
                        .collect(),
                ),
                other => other.clone(),
            };
            (style_type.clone(), prepared)
        })
        .collect()
}

fn prepare_style_entry(entry: &ConfigMap, loader_names: &[String]) -> ConfigMap {
    let mut prepared = ConfigMap::new();
    let mut loaders = match entry.get("loaders") {
        Some(ConfigValue::Object(loaders)) => loaders.clone(),
        _ => ConfigMap::new(),
    };
    for (key, value) in entry {
        if key == "loaders" {
            continue;
        }
        if loader_names.iter().any(|name| name == key) {
            let loader = loaders.entry(key.clone()).or_insert_with(ConfigValue::object);
            if !loader.is_object() {
                *loader = ConfigValue::object();
            }
            if let ConfigValue::Object(loader) = loader {
                loader.insert("options".to_string(), value.clone());
            }
        } else {
            prepared.insert(key.clone(), value.clone());
        }
    }
    if !loaders.is_empty() {
        prepared.insert("loaders".to_string(), ConfigValue::Object(loaders));
    }
    prepared
}

/// Apply every derived transform to a merged config
pub fn derive_config(config: &ConfigValue, plugins: &PluginConfig) -> ConfigValue {
    let mut derived = config.clone();

    if let Some(ConfigValue::Object(rules)) = config.get_path(&["webpack", "rules"]) {
        let prepared: ConfigMap = rules
            .iter()
            .map(|(name, rule)| {
                let rule = match rule {
                    ConfigValue::Object(rule) => ConfigValue::Object(prepare_rule_config(rule)),
                    other => other.clone(),
                };
                (name.clone(), rule)
            })
            .collect();
        derived.insert_path(&["webpack", "rules"], ConfigValue::Object(prepared));
    }

    if let Some(ConfigValue::Object(styles)) = config.get_path(&["webpack", "styles"]) {
        let prepared = prepare_style_config(styles, &plugins.loader_names());
        derived.insert_path(&["webpack", "styles"], ConfigValue::Object(prepared));
    }

    derived
}
