//! Config tree values.
//!
//! A config tree is a recursive `ConfigValue`: scalars, regular-expression
//! patterns, ordered sequences, insertion-ordered maps and functions. Maps keep
//! insertion order so reports and serialized output follow the author's layout.

use indexmap::IndexMap;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use std::fmt;
use std::sync::Arc;

/// Insertion-ordered map of config keys to values
pub type ConfigMap = IndexMap<String, ConfigValue>;

/// A single node of a config tree
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ConfigValue {
    #[default]
    Null,
    Bool(bool),
    Number(serde_json::Number),
    String(String),
    Pattern(Pattern),
    Array(Vec<ConfigValue>),
    Object(ConfigMap),
    Function(ConfigFn),
}

/// Compiled regular expression used for `test`/`include`/`exclude` style fields
#[derive(Clone)]
pub struct Pattern(regex::Regex);

type Transform = dyn Fn(ConfigValue) -> ConfigValue + Send + Sync;

/// A function embedded in a config tree, e.g. `webpack.config` or `karma.config`.
///
/// Functions receive a generated config and return the config to use instead.
/// Two functions are equal only if they are the same allocation.
#[derive(Clone)]
pub struct ConfigFn(Arc<Transform>);

impl Pattern {
    /// Compile a pattern from its source text
    pub fn new(source: &str) -> Result<Self, regex::Error> {
        regex::Regex::new(source).map(Self)
    }

    /// The pattern's source text
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.0.is_match(text)
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/", self.as_str())
    }
}

impl ConfigFn {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(ConfigValue) -> ConfigValue + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Invoke the function with a generated config
    pub fn call(&self, input: ConfigValue) -> ConfigValue {
        (self.0)(input)
    }
}

impl PartialEq for ConfigFn {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for ConfigFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[Function]")
    }
}

impl ConfigValue {
    /// An empty map
    pub fn object() -> Self {
        ConfigValue::Object(ConfigMap::new())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, ConfigValue::Null)
    }

    pub fn is_object(&self) -> bool {
        matches!(self, ConfigValue::Object(_))
    }

    pub fn is_array(&self) -> bool {
        matches!(self, ConfigValue::Array(_))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ConfigValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Vec<ConfigValue>> {
        match self {
            ConfigValue::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ConfigMap> {
        match self {
            ConfigValue::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_object_mut(&mut self) -> Option<&mut ConfigMap> {
        match self {
            ConfigValue::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&ConfigFn> {
        match self {
            ConfigValue::Function(f) => Some(f),
            _ => None,
        }
    }

    /// Look up a key of a map value
    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.as_object().and_then(|map| map.get(key))
    }

    /// Look up a nested key, e.g. `["webpack", "styles"]`
    pub fn get_path(&self, path: &[&str]) -> Option<&ConfigValue> {
        path.iter().try_fold(self, |node, key| node.get(key))
    }

    /// Remove a nested key, returning its value
    pub fn remove_path(&mut self, path: &[&str]) -> Option<ConfigValue> {
        let (last, parents) = path.split_last()?;
        let mut node = self;
        for key in parents {
            node = node.as_object_mut()?.get_mut(*key)?;
        }
        node.as_object_mut()?.shift_remove(*last)
    }

    /// Insert a value at a nested key, creating intermediate maps.
    ///
    /// Intermediate values that are not maps are replaced.
    pub fn insert_path(&mut self, path: &[&str], value: ConfigValue) {
        let Some((last, parents)) = path.split_last() else {
            *self = value;
            return;
        };
        let mut node = self;
        for key in parents {
            if !node.is_object() {
                *node = ConfigValue::object();
            }
            let ConfigValue::Object(map) = node else {
                return;
            };
            node = map
                .entry((*key).to_string())
                .or_insert_with(ConfigValue::object);
        }
        if !node.is_object() {
            *node = ConfigValue::object();
        }
        if let ConfigValue::Object(map) = node {
            map.insert((*last).to_string(), value);
        }
    }

    /// Short name of the value's type, for log output
    pub fn kind_name(&self) -> &'static str {
        match self {
            ConfigValue::Null => "null",
            ConfigValue::Bool(_) => "boolean",
            ConfigValue::Number(_) => "number",
            ConfigValue::String(_) => "string",
            ConfigValue::Pattern(_) => "regexp",
            ConfigValue::Array(_) => "array",
            ConfigValue::Object(_) => "object",
            ConfigValue::Function(_) => "function",
        }
    }

    /// Render the value the way a JavaScript developer would expect to read it,
    /// e.g. `{ umd: /invalid/, cjs: 'yes' }`
    pub fn inspect(&self) -> String {
        match self {
            ConfigValue::Null => "null".to_string(),
            ConfigValue::Bool(b) => b.to_string(),
            ConfigValue::Number(n) => n.to_string(),
            ConfigValue::String(s) => quote(s),
            ConfigValue::Pattern(p) => format!("/{}/", p.as_str()),
            ConfigValue::Function(_) => "[Function]".to_string(),
            ConfigValue::Array(items) if items.is_empty() => "[]".to_string(),
            ConfigValue::Array(items) => {
                let inner: Vec<String> = items.iter().map(ConfigValue::inspect).collect();
                format!("[ {} ]", inner.join(", "))
            },
            ConfigValue::Object(map) if map.is_empty() => "{}".to_string(),
            ConfigValue::Object(map) => {
                let inner: Vec<String> = map
                    .iter()
                    .map(|(key, value)| format!("{}: {}", inspect_key(key), value.inspect()))
                    .collect();
                format!("{{ {} }}", inner.join(", "))
            },
        }
    }

    /// Convert to JSON, rendering patterns as `/source/` and functions as `[Function]`
    pub fn to_json(&self) -> serde_json::Value {
        match serde_json::to_value(self) {
            Ok(value) => value,
            Err(_) => serde_json::Value::Null,
        }
    }
}

fn quote(s: &str) -> String {
    format!("'{}'", s.replace('\\', "\\\\").replace('\'', "\\'"))
}

fn inspect_key(key: &str) -> String {
    let mut chars = key.chars();
    let is_identifier = chars
        .next()
        .map_or(false, |c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$');
    if is_identifier {
        key.to_string()
    } else {
        quote(key)
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.inspect())
    }
}

impl Serialize for ConfigValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ConfigValue::Null => serializer.serialize_unit(),
            ConfigValue::Bool(b) => serializer.serialize_bool(*b),
            ConfigValue::Number(n) => n.serialize(serializer),
            ConfigValue::String(s) => serializer.serialize_str(s),
            ConfigValue::Pattern(p) => serializer.serialize_str(&format!("/{}/", p.as_str())),
            ConfigValue::Function(_) => serializer.serialize_str("[Function]"),
            ConfigValue::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            },
            ConfigValue::Object(map) => {
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (key, value) in map {
                    out.serialize_entry(key, value)?;
                }
                out.end()
            },
        }
    }
}

impl From<bool> for ConfigValue {
    fn from(value: bool) -> Self {
        ConfigValue::Bool(value)
    }
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        ConfigValue::String(value.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(value: String) -> Self {
        ConfigValue::String(value)
    }
}

impl From<i64> for ConfigValue {
    fn from(value: i64) -> Self {
        ConfigValue::Number(value.into())
    }
}

impl From<u16> for ConfigValue {
    fn from(value: u16) -> Self {
        ConfigValue::Number(value.into())
    }
}

impl From<Pattern> for ConfigValue {
    fn from(value: Pattern) -> Self {
        ConfigValue::Pattern(value)
    }
}

impl From<ConfigFn> for ConfigValue {
    fn from(value: ConfigFn) -> Self {
        ConfigValue::Function(value)
    }
}

impl From<ConfigMap> for ConfigValue {
    fn from(value: ConfigMap) -> Self {
        ConfigValue::Object(value)
    }
}

impl<T: Into<ConfigValue>> From<Vec<T>> for ConfigValue {
    fn from(value: Vec<T>) -> Self {
        ConfigValue::Array(value.into_iter().map(Into::into).collect())
    }
}

/// Plain structural conversion; JSON has no pattern or function values
impl From<serde_json::Value> for ConfigValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => ConfigValue::Null,
            serde_json::Value::Bool(b) => ConfigValue::Bool(b),
            serde_json::Value::Number(n) => ConfigValue::Number(n),
            serde_json::Value::String(s) => ConfigValue::String(s),
            serde_json::Value::Array(items) => {
                ConfigValue::Array(items.into_iter().map(ConfigValue::from).collect())
            },
            serde_json::Value::Object(map) => ConfigValue::Object(
                map.into_iter()
                    .map(|(key, value)| (key, ConfigValue::from(value)))
                    .collect(),
            ),
        }
    }
}
