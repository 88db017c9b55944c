//! Command-line arguments as seen by the config pipeline.
//!
//! The CLI layer owns flag parsing; the pipeline only needs positional
//! arguments and a bag of flag values it can look up by name.

use indexmap::IndexMap;

use super::value::{ConfigMap, ConfigValue};

/// Positional arguments plus flag values
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CliArgs {
    /// Positional arguments, the first being the command name
    pub positional: Vec<String>,
    /// Flags keyed by their long name, e.g. `es-modules`
    pub flags: IndexMap<String, ConfigValue>,
}

impl CliArgs {
    pub fn new<I, S>(positional: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            positional: positional.into_iter().map(Into::into).collect(),
            flags: IndexMap::new(),
        }
    }

    /// Add a flag value
    pub fn with_flag(mut self, name: &str, value: impl Into<ConfigValue>) -> Self {
        self.flags.insert(name.to_string(), value.into());
        self
    }

    /// The command being run, if any
    pub fn command(&self) -> Option<&str> {
        self.positional.first().map(String::as_str)
    }

    pub fn flag(&self, name: &str) -> Option<&ConfigValue> {
        self.flags.get(name)
    }

    pub fn flag_str(&self, name: &str) -> Option<&str> {
        self.flag(name).and_then(ConfigValue::as_str)
    }

    /// Whether a flag was passed as `--name`
    pub fn is_enabled(&self, name: &str) -> bool {
        self.flag(name).and_then(ConfigValue::as_bool) == Some(true)
    }

    /// Whether a flag was passed as `--no-name`
    pub fn is_disabled(&self, name: &str) -> bool {
        self.flag(name).and_then(ConfigValue::as_bool) == Some(false)
    }

    /// Tree form handed to user config functions: `{ _: [...positional], ...flags }`
    pub fn to_value(&self) -> ConfigValue {
        let mut map = ConfigMap::new();
        map.insert("_".to_string(), ConfigValue::from(self.positional.clone()));
        for (name, value) in &self.flags {
            map.insert(name.clone(), value.clone());
        }
        ConfigValue::Object(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flags_lookup() {
        let args = CliArgs::new(["build"])
            .with_flag("umd", "MyLib")
            .with_flag("es-modules", false)
            .with_flag("coverage", true);

        assert_eq!(args.command(), Some("build"));
        assert_eq!(args.flag_str("umd"), Some("MyLib"));
        assert!(args.is_disabled("es-modules"));
        assert!(args.is_enabled("coverage"));
        assert!(!args.is_enabled("umd"));
        assert!(!args.is_disabled("missing"));
    }

    #[test]
    fn test_to_value_uses_underscore_for_positional() {
        let args = CliArgs::new(["abc123"]).with_flag("open", true);
        assert_eq!(
            args.to_value(),
            ConfigValue::from(json!({"_": ["abc123"], "open": true}))
        );
    }
}
