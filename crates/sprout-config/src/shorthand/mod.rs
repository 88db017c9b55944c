//! Shorthand normalization.
//!
//! Rewrites convenience input shapes into the canonical shapes the schema
//! describes, and renames legacy keys. Every rewrite only fires on the
//! non-canonical shape, so running the normalizer twice changes nothing.

use sprout_core::{ConfigMap, ConfigPath, ConfigValue, Report};
use tracing::debug;

/// A scalar or sequence that stands for a map with a single key
struct Shorthand {
    path: &'static [&'static str],
    accepts: fn(&ConfigValue) -> bool,
    wrap_key: &'static str,
}

/// A legacy key that moved
struct Rename {
    from: &'static [&'static str],
    to: &'static [&'static str],
}

/// A key in an open passthrough map that has a dedicated option
struct Suggestion {
    path: &'static [&'static str],
    use_instead: &'static str,
}

const SHORTHANDS: [Shorthand; 3] = [
    Shorthand {
        path: &["npm", "umd"],
        accepts: is_string,
        wrap_key: "global",
    },
    Shorthand {
        path: &["webpack", "autoprefixer"],
        accepts: is_string,
        wrap_key: "browsers",
    },
    Shorthand {
        path: &["webpack", "copy"],
        accepts: ConfigValue::is_array,
        wrap_key: "patterns",
    },
];

const RENAMES: [Rename; 2] = [
    Rename {
        from: &["webpack", "uglify"],
        to: &["webpack", "terser"],
    },
    Rename {
        from: &["karma", "testDirs"],
        to: &["karma", "excludeFromCoverage"],
    },
];

const SUGGESTIONS: [Suggestion; 2] = [
    Suggestion {
        path: &["webpack", "extra", "resolve", "alias"],
        use_instead: "webpack.aliases",
    },
    Suggestion {
        path: &["webpack", "extra", "output", "publicPath"],
        use_instead: "webpack.publicPath",
    },
];

fn is_string(value: &ConfigValue) -> bool {
    matches!(value, ConfigValue::String(_))
}

fn dotted(path: &[&str]) -> String {
    path.join(".")
}

/// Return a normalized copy of `config`, recording deprecations and hints
pub fn normalize(config: &ConfigValue, report: &mut Report) -> ConfigValue {
    let mut config = config.clone();
    if !config.is_object() {
        return config;
    }

    for rename in &RENAMES {
        apply_rename(&mut config, rename, report);
    }

    for shorthand in &SHORTHANDS {
        let Some(value) = config.get_path(shorthand.path) else {
            continue;
        };
        if !(shorthand.accepts)(value) {
            continue;
        }
        let mut map = ConfigMap::new();
        map.insert(shorthand.wrap_key.to_string(), value.clone());
        debug!(path = %dotted(shorthand.path), "Expanded shorthand config");
        config.insert_path(shorthand.path, ConfigValue::Object(map));
    }

    for suggestion in &SUGGESTIONS {
        if config.get_path(suggestion.path).is_some() {
            report.hint(
                ConfigPath::from_keys(suggestion.path),
                [format!(
                    "You can use the more convenient {} config instead",
                    suggestion.use_instead
                )],
            );
        }
    }

    config
}

fn apply_rename(config: &mut ConfigValue, rename: &Rename, report: &mut Report) {
    // Only maps can hold the legacy key
    if !config
        .get_path(&rename.from[..rename.from.len() - 1])
        .is_some_and(ConfigValue::is_object)
    {
        return;
    }
    let Some(value) = config.remove_path(rename.from) else {
        return;
    };

    let from = ConfigPath::from_keys(rename.from);
    if config.get_path(rename.to).is_some() {
        report.deprecated(
            from,
            [
                format!("Deprecated in favour of {}", dotted(rename.to)),
                format!("{} is also set, so this value was ignored", dotted(rename.to)),
            ],
        );
        return;
    }

    report.deprecated(
        from,
        [
            format!("Deprecated in favour of {}", dotted(rename.to)),
            format!("Rename {} to {} in your config", dotted(rename.from), dotted(rename.to)),
        ],
    );
    config.insert_path(rename.to, value);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn normalize_json(config: serde_json::Value) -> (ConfigValue, Report) {
        let mut report = Report::default();
        let normalized = normalize(&ConfigValue::from(config), &mut report);
        (normalized, report)
    }

    #[test]
    fn test_umd_string_shorthand() {
        let (shorthand, _) = normalize_json(json!({"npm": {"umd": "Foo"}}));
        let (canonical, _) = normalize_json(json!({"npm": {"umd": {"global": "Foo"}}}));
        assert_eq!(shorthand, canonical);
        assert_eq!(shorthand, ConfigValue::from(json!({"npm": {"umd": {"global": "Foo"}}})));
    }

    #[test]
    fn test_autoprefixer_and_copy_shorthands() {
        let (normalized, report) = normalize_json(json!({
            "webpack": {"autoprefixer": "last 2 versions", "copy": ["static"]}
        }));
        assert_eq!(
            normalized,
            ConfigValue::from(json!({"webpack": {
                "autoprefixer": {"browsers": "last 2 versions"},
                "copy": {"patterns": ["static"]}
            }}))
        );
        assert!(!report.has_something_to_report());
    }

    #[test]
    fn test_false_is_left_alone() {
        let input = json!({"npm": {"umd": false}, "webpack": {"autoprefixer": false}});
        let (normalized, _) = normalize_json(input.clone());
        assert_eq!(normalized, ConfigValue::from(input));
    }

    #[test]
    fn test_input_is_not_mutated() {
        let input = ConfigValue::from(json!({"npm": {"umd": "Foo"}}));
        let mut report = Report::default();
        let _ = normalize(&input, &mut report);
        assert_eq!(input, ConfigValue::from(json!({"npm": {"umd": "Foo"}})));
    }

    #[test]
    fn test_legacy_keys_are_renamed_with_deprecation() {
        let (normalized, report) = normalize_json(json!({
            "webpack": {"uglify": false},
            "karma": {"testDirs": ["test/"]}
        }));
        assert_eq!(
            normalized,
            ConfigValue::from(json!({
                "webpack": {"terser": false},
                "karma": {"excludeFromCoverage": ["test/"]}
            }))
        );
        let paths: Vec<String> = report.deprecations().iter().map(|d| d.path.to_string()).collect();
        assert_eq!(paths, vec!["webpack.uglify", "karma.testDirs"]);
        assert_eq!(
            report.deprecations()[0].messages[0],
            "Deprecated in favour of webpack.terser"
        );
        assert!(!report.has_errors());
    }

    #[test]
    fn test_rename_keeps_new_key_when_both_present() {
        let (normalized, report) = normalize_json(json!({
            "webpack": {"uglify": false, "terser": {"parallel": true}}
        }));
        assert_eq!(
            normalized,
            ConfigValue::from(json!({"webpack": {"terser": {"parallel": true}}}))
        );
        assert_eq!(report.deprecations().len(), 1);
    }

    #[test]
    fn test_extra_hints() {
        let (normalized, report) = normalize_json(json!({
            "webpack": {"extra": {"resolve": {"alias": {"a": "b"}}, "output": {"publicPath": "/"}}}
        }));
        assert_eq!(report.hints().len(), 2);
        assert_eq!(report.hints()[0].path.to_string(), "webpack.extra.resolve.alias");
        assert!(report.hints()[1].messages[0].contains("webpack.publicPath"));
        // Hints never rewrite
        assert!(normalized
            .get_path(&["webpack", "extra", "resolve", "alias"])
            .is_some());
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let (once, _) = normalize_json(json!({
            "npm": {"umd": "Foo"},
            "webpack": {"uglify": true, "copy": ["a"], "autoprefixer": "ie 11"}
        }));
        let mut report = Report::default();
        let twice = normalize(&once, &mut report);
        assert_eq!(once, twice);
        assert!(report.deprecations().is_empty());
    }

    #[test]
    fn test_non_map_namespaces_are_left_for_the_validator() {
        let (normalized, report) = normalize_json(json!({"webpack": "nope", "npm": 1}));
        assert_eq!(normalized, ConfigValue::from(json!({"webpack": "nope", "npm": 1})));
        assert!(!report.has_something_to_report());
    }
}
