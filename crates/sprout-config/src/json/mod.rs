//! JSON config files and package.json parsing

use indexmap::IndexMap;
use serde::Deserialize;
use sprout_core::{ConfigMap, ConfigValue, Pattern};

/// Key of the single-entry object used to write a regular expression in JSON
pub const REGEX_KEY: &str = "$regex";

/// The parts of package.json the plugin scanner reads
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PackageJson {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub version: Option<String>,

    /// Runtime dependencies
    #[serde(default)]
    pub dependencies: IndexMap<String, String>,

    /// Development dependencies
    #[serde(default, rename = "devDependencies")]
    pub dev_dependencies: IndexMap<String, String>,
}

impl PackageJson {
    /// Names of all dependencies and devDependencies, in file order
    pub fn dependency_names(&self) -> impl Iterator<Item = &str> {
        self.dependencies
            .keys()
            .chain(self.dev_dependencies.keys())
            .map(String::as_str)
    }
}

/// Parse package.json contents
pub fn parse_package_json(content: &str) -> Result<PackageJson, String> {
    serde_json::from_str(content).map_err(|e| format!("JSON parsing error: {}", e))
}

/// Parse a JSON config file into a config tree.
///
/// `{"$regex": "source"}` objects become pattern values.
pub fn parse_config_json(content: &str) -> Result<ConfigValue, String> {
    let json: serde_json::Value =
        serde_json::from_str(content).map_err(|e| format!("JSON parsing error: {}", e))?;
    from_json(json)
}

/// Convert a JSON value into a config tree, decoding `$regex` objects
pub fn from_json(value: serde_json::Value) -> Result<ConfigValue, String> {
    Ok(match value {
        serde_json::Value::Array(items) => ConfigValue::Array(
            items
                .into_iter()
                .map(from_json)
                .collect::<Result<Vec<_>, _>>()?,
        ),
        serde_json::Value::Object(map) => {
            if let Some(source) = regex_source(&map) {
                let pattern = Pattern::new(source)
                    .map_err(|e| format!("Invalid regular expression /{}/: {}", source, e))?;
                return Ok(ConfigValue::Pattern(pattern));
            }
            let mut out = ConfigMap::with_capacity(map.len());
            for (key, value) in map {
                out.insert(key, from_json(value)?);
            }
            ConfigValue::Object(out)
        },
        scalar => ConfigValue::from(scalar),
    })
}

fn regex_source(map: &serde_json::Map<String, serde_json::Value>) -> Option<&str> {
    if map.len() != 1 {
        return None;
    }
    map.get(REGEX_KEY).and_then(serde_json::Value::as_str)
}
