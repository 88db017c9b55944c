//! Schema for user config files.
//!
//! The set of style types depends on which CSS preprocessor plugins are
//! installed, so the schema is built per run from the scanned plugin config.

use sprout_core::{utils::pluralise, ProjectType};

use super::{Kind, Schema};
use crate::plugins::PluginConfig;

/// Build the schema for a whole user config
pub fn user_config_schema(plugins: &PluginConfig) -> Schema {
    let project_types: Vec<&str> = ProjectType::ALL.iter().map(ProjectType::as_str).collect();
    Schema::record()
        .field("type", Schema::choice(&project_types))
        .field("babel", babel_schema())
        .field("devServer", Schema::of(Kind::Object))
        .field("karma", karma_schema())
        .field("npm", npm_schema())
        .field("webpack", webpack_schema(plugins))
}

fn babel_schema() -> Schema {
    Schema::record()
        .field("cherryPick", Schema::one_of(&[Kind::String, Kind::Array]))
        .field("env", Schema::of(Kind::Object))
        .field("loose", Schema::of(Kind::Boolean))
        .field("plugins", Schema::of(Kind::Array))
        .field("presets", Schema::of(Kind::Array))
        .field("proposals", Schema::of(Kind::Object).or_false())
        .field("react", Schema::one_of(&[Kind::String, Kind::Object]))
        .field("reactConstant", Schema::of(Kind::Boolean))
        .field("removePropTypes", Schema::of(Kind::Object).or_false())
        .field(
            "runtime",
            Schema::of(Kind::Boolean).or_choices(&["helpers", "polyfill"]),
        )
        .field("config", Schema::of(Kind::Function))
}

fn karma_schema() -> Schema {
    let plugin = Schema::one_of(&[Kind::String, Kind::Object])
        .single_entry(Schema::of(Kind::Array))
        .described_as("a plugin name or a single-key plugin definition");
    let plugin_list = Schema::of(Kind::Array).items(plugin);
    Schema::record()
        .field("browsers", plugin_list.clone())
        .field("excludeFromCoverage", Schema::one_of(&[Kind::String, Kind::Array]))
        .field("frameworks", plugin_list.clone())
        .field("plugins", plugin_list.clone())
        .field("reporters", plugin_list)
        .field("testContext", Schema::of(Kind::String))
        .field("testFiles", Schema::one_of(&[Kind::String, Kind::Array]))
        .field("extra", Schema::of(Kind::Object))
        .field("config", Schema::of(Kind::Function))
}

fn npm_schema() -> Schema {
    let umd = Schema::record()
        .or_false()
        .field("entry", Schema::of(Kind::String))
        .field("global", Schema::of(Kind::String))
        .field("externals", Schema::of(Kind::Object));
    Schema::record()
        .field("cjs", Schema::of(Kind::Boolean))
        .field("esModules", Schema::of(Kind::Boolean))
        .field("umd", umd)
}

fn webpack_schema(plugins: &PluginConfig) -> Schema {
    let locales = Schema::record().field("locales", Schema::of(Kind::Array));
    let compat = Schema::record()
        .field("enzyme", Schema::of(Kind::Boolean))
        .field("intl", locales.clone())
        .field("moment", locales.clone())
        .field("react-intl", locales)
        .field("sinon", Schema::of(Kind::Boolean));

    let copy = Schema::record()
        .field("patterns", Schema::of(Kind::Array))
        .field("options", Schema::of(Kind::Object))
        .require_any(&["patterns", "options"]);

    Schema::record()
        .field("aliases", Schema::of(Kind::Object).values(Schema::of(Kind::String)))
        .field("autoprefixer", Schema::of(Kind::Object).or_false())
        .field("compat", compat)
        .field("copy", copy)
        .field("debug", Schema::of(Kind::Boolean))
        .field("define", Schema::of(Kind::Object))
        .field("extractCSS", Schema::one_of(&[Kind::Boolean, Kind::Object]))
        .field("hoisting", Schema::of(Kind::Boolean))
        .field("html", Schema::of(Kind::Object))
        .field("install", Schema::of(Kind::Object))
        .field("publicPath", Schema::of(Kind::String))
        .field("rules", Schema::of(Kind::Object).values(rule_schema()))
        .field("styles", styles_schema(plugins))
        .field("terser", Schema::one_of(&[Kind::Boolean, Kind::Object]))
        .field("extra", Schema::of(Kind::Object))
        .field("config", Schema::of(Kind::Function))
}

/// Matches webpack's rule conditions
fn condition() -> Schema {
    Schema::one_of(&[Kind::String, Kind::Pattern, Kind::Array, Kind::Function])
}

fn rule_schema() -> Schema {
    Schema::of(Kind::Object)
        .field("test", Schema::one_of(&[Kind::Pattern, Kind::String]))
        .field("include", condition())
        .field("exclude", condition())
        .field("loader", Schema::of(Kind::String))
        .field("use", Schema::of(Kind::Array))
        .field("options", Schema::of(Kind::Object))
}

fn styles_schema(plugins: &PluginConfig) -> Schema {
    let mut styles = Schema::of(Kind::Object).or_false().closed_with(unknown_style_type);
    for style_type in plugins.style_types() {
        let loader_names = plugins.loader_names_for(&style_type);
        styles = styles.field(&style_type, style_type_schema(&loader_names));
    }
    styles
}

fn style_type_schema(loader_names: &[String]) -> Schema {
    let mut entry = Schema::of(Kind::Object)
        .closed_with(style_rule_props)
        .field("include", condition())
        .field("exclude", condition())
        .field("loaders", Schema::of(Kind::Object).values(Schema::of(Kind::Object)));
    for name in loader_names {
        entry = entry.field(name, Schema::of(Kind::Object));
    }
    Schema::of(Kind::Array).items(entry)
}

fn unknown_style_type(unexpected: &[String], allowed: &[String]) -> String {
    format!(
        "Unknown style type{}: {} - must be one of: {}",
        pluralise(unexpected.len()),
        unexpected.join(", "),
        allowed.join(", ")
    )
}

fn style_rule_props(unexpected: &[String], allowed: &[String]) -> String {
    format!(
        "Must be a style rule object using only these props: {} (unexpected: {})",
        allowed.join(", "),
        unexpected.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate;
    use serde_json::json;
    use sprout_core::{ConfigValue, Report};

    #[test]
    fn test_type_choices_are_project_types() {
        let schema = user_config_schema(&PluginConfig::default());
        let check = |ty: &str| {
            let mut report = Report::default();
            validate(&schema, &ConfigValue::from(json!({ "type": ty })), &mut report);
            report
        };
        for ty in ProjectType::ALL {
            let report = check(ty.as_str());
            assert!(!report.has_errors(), "{}", report.render());
        }
        let report = check("angular-app");
        assert_eq!(report.errors()[0].path.to_string(), "type");
        assert_eq!(
            schema.field_schema("type").map(|t| t.choices.len()),
            Some(ProjectType::ALL.len())
        );
    }

    #[test]
    fn test_top_level_namespaces() {
        let schema = user_config_schema(&PluginConfig::default());
        assert_eq!(
            schema.field_names(),
            vec!["type", "babel", "devServer", "karma", "npm", "webpack"]
        );
    }

    #[test]
    fn test_style_types_follow_plugins() {
        let plugins = PluginConfig::default().with_preprocessor("sass", ConfigValue::object());
        let schema = user_config_schema(&plugins);
        let styles = schema
            .field_schema("webpack")
            .and_then(|webpack| webpack.field_schema("styles"))
            .unwrap();
        assert_eq!(styles.field_names(), vec!["css", "sass"]);

        let sass_entry = styles.field_schema("sass").and_then(|s| s.items.as_deref()).unwrap();
        assert!(sass_entry.field_schema("sass").is_some());
        assert!(sass_entry.field_schema("postcss").is_some());
    }
}
