//! Schema validation.
//!
//! One recursive interpreter checks any config tree against any `Schema`,
//! extending a `ConfigPath` at each step. Validation never fails: problems are
//! written to the `Report` and the caller decides whether to abort.

use sprout_core::utils::{pluralise, suggest_similar};
use sprout_core::{ConfigMap, ConfigPath, ConfigValue, Report};
use tracing::debug;

use crate::schema::{Kind, Schema, UnknownKeys};

/// Validate a whole config tree
pub fn validate(schema: &Schema, config: &ConfigValue, report: &mut Report) {
    let before = report.errors().len();
    check(schema, config, &ConfigPath::root(), report);
    debug!(
        errors = report.errors().len() - before,
        "Validated config against schema"
    );
}

/// Validate the value at `path`
pub fn check(schema: &Schema, value: &ConfigValue, path: &ConfigPath, report: &mut Report) {
    // Literal exceptions such as `false` bypass the type check entirely
    if schema.is_exception(value) {
        return;
    }

    if !schema.choices.is_empty() && !schema.kinds.contains(&Kind::String) {
        if let ConfigValue::String(s) = value {
            if !schema.choices.contains(s) {
                report.error(path.clone(), value.clone(), choice_message(schema));
                suggest_choice(schema, s, path, report);
            }
            return;
        }
        if schema.kinds.is_empty() && schema.exceptions.is_empty() {
            report.error(path.clone(), value.clone(), choice_message(schema));
            return;
        }
    }

    if !schema.kinds.is_empty() && !schema.kinds.iter().any(|kind| kind.matches(value)) {
        debug!(path = %path, found = value.kind_name(), "Value has the wrong kind");
        report.error(
            path.clone(),
            value.clone(),
            format!("Must be {}", schema.describe()),
        );
        return;
    }

    match value {
        ConfigValue::Object(map) if schema.single_entry.is_some() => {
            check_single_entry(schema, map, value, path, report)
        },
        ConfigValue::Object(map) => check_map(schema, map, value, path, report),
        ConfigValue::Array(items) => {
            if let Some(item_schema) = &schema.items {
                for (index, item) in items.iter().enumerate() {
                    check(item_schema, item, &path.index(index), report);
                }
            }
        },
        _ => {},
    }
}

fn check_map(
    schema: &Schema,
    map: &ConfigMap,
    value: &ConfigValue,
    path: &ConfigPath,
    report: &mut Report,
) {
    let unexpected: Vec<String> = map
        .keys()
        .filter(|key| !schema.fields.contains_key(key.as_str()))
        .cloned()
        .collect();
    if !unexpected.is_empty() {
        let allowed = schema.field_names();
        match schema.unknown_keys {
            UnknownKeys::Allow => {},
            UnknownKeys::Reject => {
                report.error(path.clone(), value.clone(), unexpected_props(&unexpected, &allowed));
            },
            UnknownKeys::RejectWith(message) => {
                report.error(path.clone(), value.clone(), message(&unexpected, &allowed));
            },
        }
    }

    if !schema.require_any.is_empty()
        && !schema.require_any.iter().any(|key| map.contains_key(key))
    {
        report.error(
            path.clone(),
            value.clone(),
            format!("Must include {}", sprout_core::utils::join_or(&schema.require_any)),
        );
    }

    for (key, field) in &schema.fields {
        match map.get(key) {
            // Absent and null are treated the same way
            None | Some(ConfigValue::Null) => {},
            Some(child) => check(field, child, &path.key(key), report),
        }
    }

    if let Some(value_schema) = &schema.values {
        for (key, child) in map {
            if !schema.fields.contains_key(key) {
                check(value_schema, child, &path.key(key), report);
            }
        }
    }
}

/// A single-key map such as `{"framework:mocha": [...]}`, reported as a whole
fn check_single_entry(
    schema: &Schema,
    map: &ConfigMap,
    value: &ConfigValue,
    path: &ConfigPath,
    report: &mut Report,
) {
    let accepted = match (map.first(), &schema.single_entry) {
        (Some((_, entry)), Some(entry_schema)) if map.len() == 1 => {
            entry_schema.accepts_kind(entry)
        },
        _ => false,
    };
    if !accepted {
        debug!(path = %path, keys = map.len(), "Rejected single-entry map");
        report.error(
            path.clone(),
            value.clone(),
            format!("Must be {}", schema.describe()),
        );
    }
}

fn choice_message(schema: &Schema) -> String {
    if schema.kinds.is_empty() && schema.exceptions.is_empty() {
        format!("Must be one of: {}", schema.quoted_choices())
    } else {
        format!("Must be {}", schema.describe())
    }
}

fn suggest_choice(schema: &Schema, input: &str, path: &ConfigPath, report: &mut Report) {
    let choices: Vec<&str> = schema.choices.iter().map(String::as_str).collect();
    if let Some(suggestion) = suggest_similar(input, &choices) {
        report.hint(path.clone(), [format!("Did you mean '{}'?", suggestion)]);
    }
}

fn unexpected_props(unexpected: &[String], allowed: &[String]) -> String {
    format!(
        "Unexpected prop{}: {} - valid props are: {}",
        pluralise(unexpected.len()),
        unexpected.join(", "),
        allowed.join(", ")
    )
}
