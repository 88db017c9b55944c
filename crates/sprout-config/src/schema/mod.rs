//! Declarative schema nodes.
//!
//! A `Schema` describes the allowed shape of the value at one config path:
//! accepted type kinds, literal choices, literal exceptions that bypass the
//! type check (such as `false` meaning "disabled"), declared fields for maps,
//! and item/value schemas for sequences and open maps. The validator walks a
//! config tree and a schema side by side.

pub mod user;

use indexmap::IndexMap;
use sprout_core::utils::join_or;
use sprout_core::ConfigValue;

pub use user::user_config_schema;

/// Builds the message for keys a closed map does not declare
pub type UnknownKeyMessage = fn(unexpected: &[String], allowed: &[String]) -> String;

/// Type predicate a value can satisfy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    String,
    Boolean,
    Number,
    Array,
    Object,
    Function,
    Pattern,
}

/// What to do with map keys that have no declared field
#[derive(Debug, Clone, Copy, Default)]
pub enum UnknownKeys {
    /// Any key is accepted
    #[default]
    Allow,
    /// Report one `Unexpected prop` error at the map's path
    Reject,
    /// Report one error at the map's path with a custom message
    RejectWith(UnknownKeyMessage),
}

/// Allowed shape of the value at one config path
#[derive(Debug, Clone, Default)]
pub struct Schema {
    pub(crate) kinds: Vec<Kind>,
    pub(crate) choices: Vec<String>,
    pub(crate) exceptions: Vec<ConfigValue>,
    pub(crate) fields: IndexMap<String, Schema>,
    pub(crate) unknown_keys: UnknownKeys,
    pub(crate) require_any: Vec<String>,
    pub(crate) items: Option<Box<Schema>>,
    pub(crate) values: Option<Box<Schema>>,
    pub(crate) single_entry: Option<Box<Schema>>,
    pub(crate) description: Option<String>,
}

impl Kind {
    pub fn matches(&self, value: &ConfigValue) -> bool {
        matches!(
            (self, value),
            (Kind::String, ConfigValue::String(_))
                | (Kind::Boolean, ConfigValue::Bool(_))
                | (Kind::Number, ConfigValue::Number(_))
                | (Kind::Array, ConfigValue::Array(_))
                | (Kind::Object, ConfigValue::Object(_))
                | (Kind::Function, ConfigValue::Function(_))
                | (Kind::Pattern, ConfigValue::Pattern(_))
        )
    }

    pub fn describe(&self) -> &'static str {
        match self {
            Kind::String => "a string",
            Kind::Boolean => "a boolean",
            Kind::Number => "a number",
            Kind::Array => "an array",
            Kind::Object => "an object",
            Kind::Function => "a function",
            Kind::Pattern => "a regular expression",
        }
    }
}

impl Schema {
    /// Accepts any value
    pub fn any() -> Self {
        Self::default()
    }

    /// Accepts values of one kind
    pub fn of(kind: Kind) -> Self {
        Self::one_of(&[kind])
    }

    /// Accepts values of any of the given kinds
    pub fn one_of(kinds: &[Kind]) -> Self {
        Self {
            kinds: kinds.to_vec(),
            ..Self::default()
        }
    }

    /// Accepts only the given strings
    pub fn choice(choices: &[&str]) -> Self {
        Self::default().or_choices(choices)
    }

    /// A map with a closed set of declared fields
    pub fn record() -> Self {
        Self::of(Kind::Object).closed()
    }

    /// Also accept the given strings
    pub fn or_choices(mut self, choices: &[&str]) -> Self {
        self.choices
            .extend(choices.iter().map(|choice| (*choice).to_string()));
        self
    }

    /// Also accept `false` as an explicit "disabled" value
    pub fn or_false(mut self) -> Self {
        self.exceptions.push(ConfigValue::Bool(false));
        self
    }

    pub fn field(mut self, name: &str, schema: Schema) -> Self {
        self.fields.insert(name.to_string(), schema);
        self
    }

    /// Reject keys without a declared field
    pub fn closed(mut self) -> Self {
        self.unknown_keys = UnknownKeys::Reject;
        self
    }

    /// Reject keys without a declared field, describing them with `message`
    pub fn closed_with(mut self, message: UnknownKeyMessage) -> Self {
        self.unknown_keys = UnknownKeys::RejectWith(message);
        self
    }

    /// Require at least one of the given keys to be present
    pub fn require_any(mut self, keys: &[&str]) -> Self {
        self.require_any = keys.iter().map(|key| (*key).to_string()).collect();
        self
    }

    /// Schema for every item of a sequence
    pub fn items(mut self, schema: Schema) -> Self {
        self.items = Some(Box::new(schema));
        self
    }

    /// Schema for every value of a map whose key is not a declared field
    pub fn values(mut self, schema: Schema) -> Self {
        self.values = Some(Box::new(schema));
        self
    }

    /// Maps must hold exactly one key, whose value `schema` accepts
    pub fn single_entry(mut self, schema: Schema) -> Self {
        self.single_entry = Some(Box::new(schema));
        self
    }

    /// Replace the generated description used in `Must be ...` messages
    pub fn described_as(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    /// Declared field names, in declaration order
    pub fn field_names(&self) -> Vec<String> {
        self.fields.keys().cloned().collect()
    }

    pub fn field_schema(&self, name: &str) -> Option<&Schema> {
        self.fields.get(name)
    }

    /// Whether `value` is accepted before any type check
    pub fn is_exception(&self, value: &ConfigValue) -> bool {
        self.exceptions.contains(value)
    }

    /// Whether `value` passes the exception and kind checks
    pub fn accepts_kind(&self, value: &ConfigValue) -> bool {
        self.is_exception(value)
            || self.kinds.is_empty()
            || self.kinds.iter().any(|kind| kind.matches(value))
    }

    /// Describe what the schema accepts, e.g. `false, an object or one of: 'old'`
    pub fn describe(&self) -> String {
        if let Some(description) = &self.description {
            return description.clone();
        }
        let mut parts: Vec<String> = self.exceptions.iter().map(ConfigValue::inspect).collect();
        parts.extend(self.kinds.iter().map(|kind| kind.describe().to_string()));
        if !self.choices.is_empty() {
            parts.push(format!("one of: {}", self.quoted_choices()));
        }
        join_or(&parts)
    }

    pub(crate) fn quoted_choices(&self) -> String {
        self.choices
            .iter()
            .map(|choice| format!("'{}'", choice))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_matches() {
        assert!(Kind::String.matches(&"x".into()));
        assert!(Kind::Boolean.matches(&false.into()));
        assert!(!Kind::Object.matches(&ConfigValue::Array(vec![])));
        assert!(Kind::Object.matches(&ConfigValue::object()));
    }

    #[test]
    fn test_describe_lists_exceptions_kinds_and_choices() {
        assert_eq!(Schema::of(Kind::String).describe(), "a string");
        assert_eq!(
            Schema::one_of(&[Kind::String, Kind::Array]).describe(),
            "a string or an array"
        );
        assert_eq!(
            Schema::of(Kind::Object).or_false().describe(),
            "false or an object"
        );
        assert_eq!(
            Schema::of(Kind::Boolean)
                .or_choices(&["helpers", "polyfill"])
                .describe(),
            "a boolean or one of: 'helpers', 'polyfill'"
        );
    }

    #[test]
    fn test_builder_records_fields_in_order() {
        let schema = Schema::record()
            .field("cjs", Schema::of(Kind::Boolean))
            .field("esModules", Schema::of(Kind::Boolean));
        assert_eq!(schema.field_names(), vec!["cjs", "esModules"]);
        assert!(matches!(schema.unknown_keys, UnknownKeys::Reject));
        assert!(schema.field_schema("umd").is_none());
    }

    #[test]
    fn test_custom_description() {
        let schema = Schema::one_of(&[Kind::String, Kind::Object])
            .single_entry(Schema::of(Kind::Array))
            .described_as("a plugin name or a single-key plugin definition");
        assert_eq!(schema.describe(), "a plugin name or a single-key plugin definition");
        assert!(schema.accepts_kind(&"mocha".into()));
        assert!(!schema.accepts_kind(&ConfigValue::Bool(true)));
    }
}
