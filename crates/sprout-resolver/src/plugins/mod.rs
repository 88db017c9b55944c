//! Test-runner plugin resolution.
//!
//! Karma config lists (`browsers`, `frameworks`, `reporters`, `plugins`) may
//! hold bare names or plugin definitions: single-key maps from a `type:name`
//! identifier to the plugin's load arguments. Resolution extracts the names,
//! fills in defaults, and makes sure every plugin the defaults rely on is
//! loaded unless the user already supplied it.

use serde::{Serialize, Serializer};
use sprout_core::{ConfigMap, ConfigValue};
use tracing::{debug, warn};

/// A plugin identifier with its load arguments
#[derive(Debug, Clone, PartialEq)]
pub struct PluginDefinition {
    /// `type:name`, e.g. `framework:mocha`
    pub identifier: String,
    pub args: Vec<ConfigValue>,
}

/// One item of a karma plugin list
#[derive(Debug, Clone, PartialEq)]
pub enum PluginEntry {
    Name(String),
    Definition(PluginDefinition),
}

/// User settings the resolver works from
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TestRunnerOptions {
    pub code_coverage: bool,
    pub browsers: Option<Vec<PluginEntry>>,
    pub frameworks: Option<Vec<PluginEntry>>,
    pub reporters: Option<Vec<PluginEntry>>,
    pub plugins: Option<Vec<PluginEntry>>,
}

/// The resolved plugin set
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestRunnerPlugins {
    pub browsers: Vec<String>,
    pub frameworks: Vec<String>,
    pub reporters: Vec<String>,
    pub plugins: Vec<PluginEntry>,
}

impl PluginDefinition {
    /// A definition loaded from an npm package
    pub fn from_package(identifier: &str, package: &str) -> Self {
        Self {
            identifier: identifier.to_string(),
            args: vec!["module".into(), package.into()],
        }
    }

    /// The part of the identifier after the type, e.g. `mocha`
    pub fn name(&self) -> &str {
        match self.identifier.split_once(':') {
            Some((_, name)) => name,
            None => &self.identifier,
        }
    }

    /// Read a single-key map whose value is an argument list
    pub fn from_value(value: &ConfigValue) -> Option<Self> {
        let map = value.as_object()?;
        if map.len() != 1 {
            return None;
        }
        let (identifier, args) = map.first()?;
        Some(Self {
            identifier: identifier.clone(),
            args: args.as_array()?.clone(),
        })
    }

    pub fn to_value(&self) -> ConfigValue {
        let mut map = ConfigMap::new();
        map.insert(self.identifier.clone(), ConfigValue::Array(self.args.clone()));
        ConfigValue::Object(map)
    }
}

impl PluginEntry {
    /// Read a list item, `None` for anything that is neither a name nor a definition
    pub fn from_value(value: &ConfigValue) -> Option<Self> {
        match value {
            ConfigValue::String(name) => Some(PluginEntry::Name(name.clone())),
            other => PluginDefinition::from_value(other).map(PluginEntry::Definition),
        }
    }

    /// Read a whole list, skipping malformed items
    pub fn list_from_value(value: &ConfigValue) -> Vec<Self> {
        let Some(items) = value.as_array() else {
            return Vec::new();
        };
        items
            .iter()
            .filter_map(|item| {
                let entry = PluginEntry::from_value(item);
                if entry.is_none() {
                    warn!(item = %item, "Skipping malformed plugin entry");
                }
                entry
            })
            .collect()
    }

    pub fn to_value(&self) -> ConfigValue {
        match self {
            PluginEntry::Name(name) => name.as_str().into(),
            PluginEntry::Definition(definition) => definition.to_value(),
        }
    }

    fn definition(&self) -> Option<&PluginDefinition> {
        match self {
            PluginEntry::Definition(definition) => Some(definition),
            PluginEntry::Name(_) => None,
        }
    }
}

impl Serialize for PluginEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

impl TestRunnerOptions {
    /// Read the karma namespace of a merged config
    pub fn from_karma_config(karma: &ConfigMap, code_coverage: bool) -> Self {
        let list = |key: &str| karma.get(key).map(PluginEntry::list_from_value);
        Self {
            code_coverage,
            browsers: list("browsers"),
            frameworks: list("frameworks"),
            reporters: list("reporters"),
            plugins: list("plugins"),
        }
    }
}

impl TestRunnerPlugins {
    pub fn to_value(&self) -> ConfigValue {
        let names = |list: &[String]| {
            ConfigValue::Array(list.iter().map(|name| name.as_str().into()).collect())
        };
        let mut map = ConfigMap::new();
        map.insert("browsers".into(), names(&self.browsers));
        map.insert("frameworks".into(), names(&self.frameworks));
        map.insert("reporters".into(), names(&self.reporters));
        map.insert(
            "plugins".into(),
            ConfigValue::Array(self.plugins.iter().map(PluginEntry::to_value).collect()),
        );
        ConfigValue::Object(map)
    }
}

/// Split a plugin list into names and definitions.
///
/// Definitions contribute the name part of their identifier.
pub fn process_plugin_config(entries: &[PluginEntry]) -> (Vec<String>, Vec<PluginDefinition>) {
    let mut names = Vec::new();
    let mut definitions = Vec::new();
    for entry in entries {
        match entry {
            PluginEntry::Name(name) => names.push(name.clone()),
            PluginEntry::Definition(definition) => {
                names.push(definition.name().to_string());
                definitions.push(definition.clone());
            },
        }
    }
    (names, definitions)
}

/// First definition with the given identifier
pub fn find_plugin<'a>(entries: &'a [PluginEntry], identifier: &str) -> Option<&'a PluginDefinition> {
    entries
        .iter()
        .filter_map(PluginEntry::definition)
        .find(|definition| definition.identifier == identifier)
}

/// Resolve the browsers, frameworks, reporters and plugins to run tests with
pub fn resolve_test_runner_config(options: &TestRunnerOptions) -> TestRunnerPlugins {
    let (browsers, browser_plugins) = match &options.browsers {
        Some(entries) => process_plugin_config(entries),
        None => (vec!["PhantomJS".to_string()], Vec::new()),
    };
    let (frameworks, framework_plugins) = match &options.frameworks {
        Some(entries) => process_plugin_config(entries),
        None => (vec!["mocha".to_string()], Vec::new()),
    };
    let (mut reporters, reporter_plugins) = match &options.reporters {
        Some(entries) => process_plugin_config(entries),
        // Mocha's reporter only makes sense with the default framework
        None if options.frameworks.is_none() => (vec!["mocha".to_string()], Vec::new()),
        None => (vec!["dots".to_string()], Vec::new()),
    };
    let (plugin_names, user_plugins) = match &options.plugins {
        Some(entries) => {
            let definitions = entries
                .iter()
                .filter_map(PluginEntry::definition)
                .cloned()
                .collect::<Vec<_>>();
            let names = entries
                .iter()
                .filter_map(|entry| match entry {
                    PluginEntry::Name(name) => Some(name.clone()),
                    PluginEntry::Definition(_) => None,
                })
                .collect::<Vec<_>>();
            (names, definitions)
        },
        None => (Vec::new(), Vec::new()),
    };

    let user_definitions: Vec<PluginDefinition> = browser_plugins
        .into_iter()
        .chain(framework_plugins)
        .chain(reporter_plugins)
        .chain(user_plugins)
        .collect();
    let user_supplied = |identifier: &str| {
        user_definitions
            .iter()
            .any(|definition| definition.identifier == identifier)
    };
    let has = |list: &[String], name: &str| list.iter().any(|item| item == name);

    let mut defaults = vec![
        PluginDefinition::from_package("preprocessor:sourcemap", "karma-sourcemap-loader"),
        PluginDefinition::from_package("webpackPlugin", "karma-webpack"),
        PluginDefinition::from_package("preprocessor:webpack", "karma-webpack"),
    ];
    if has(&browsers, "PhantomJS") && !user_supplied("launcher:PhantomJS") {
        defaults.push(PluginDefinition::from_package(
            "launcher:PhantomJS",
            "karma-phantomjs-launcher",
        ));
    }
    if has(&browsers, "Chrome") && !user_supplied("launcher:Chrome") {
        defaults.push(PluginDefinition::from_package("launcher:Chrome", "karma-chrome-launcher"));
    }
    if has(&frameworks, "mocha") {
        if !user_supplied("framework:mocha") {
            defaults.push(PluginDefinition::from_package("framework:mocha", "karma-mocha"));
        }
        if !user_supplied("reporter:mocha") {
            defaults.push(PluginDefinition::from_package(
                "reporter:mocha",
                "karma-mocha-reporter",
            ));
        }
    }
    if options.code_coverage {
        reporters.push("coverage".to_string());
        defaults.push(PluginDefinition::from_package("preprocessor:coverage", "karma-coverage"));
        defaults.push(PluginDefinition::from_package("reporter:coverage", "karma-coverage"));
    }

    let plugins: Vec<PluginEntry> = defaults
        .into_iter()
        .chain(user_definitions)
        .map(PluginEntry::Definition)
        .chain(plugin_names.into_iter().map(PluginEntry::Name))
        .collect();

    debug!(
        browsers = ?browsers,
        frameworks = ?frameworks,
        reporters = ?reporters,
        plugins = plugins.len(),
        "Resolved test runner plugins"
    );
    TestRunnerPlugins {
        browsers,
        frameworks,
        reporters,
        plugins,
    }
}
