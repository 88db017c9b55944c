//! TOML config file parsing

use sprout_core::{ConfigMap, ConfigValue, Pattern};

use crate::json::REGEX_KEY;

/// Parse a TOML config file into a config tree.
///
/// Tables of the form `{ "$regex" = "source" }` become pattern values.
pub fn parse_config_toml(content: &str) -> Result<ConfigValue, String> {
    // toml_edit reports syntax errors with line and column
    content
        .parse::<toml_edit::DocumentMut>()
        .map_err(|e| format!("TOML syntax error: {}", e))?;

    let value: toml::Value =
        toml::from_str(content).map_err(|e| format!("TOML parsing error: {}", e))?;
    from_toml(value)
}

fn from_toml(value: toml::Value) -> Result<ConfigValue, String> {
    Ok(match value {
        toml::Value::String(s) => ConfigValue::String(s),
        toml::Value::Integer(i) => ConfigValue::from(i),
        toml::Value::Float(f) => serde_json::Number::from_f64(f)
            .map(ConfigValue::Number)
            .ok_or_else(|| format!("Unsupported number: {}", f))?,
        toml::Value::Boolean(b) => ConfigValue::Bool(b),
        toml::Value::Datetime(dt) => ConfigValue::String(dt.to_string()),
        toml::Value::Array(items) => ConfigValue::Array(
            items
                .into_iter()
                .map(from_toml)
                .collect::<Result<Vec<_>, _>>()?,
        ),
        toml::Value::Table(table) => {
            if table.len() == 1 {
                if let Some(toml::Value::String(source)) = table.get(REGEX_KEY) {
                    let pattern = Pattern::new(source)
                        .map_err(|e| format!("Invalid regular expression /{}/: {}", source, e))?;
                    return Ok(ConfigValue::Pattern(pattern));
                }
            }
            let mut map = ConfigMap::with_capacity(table.len());
            for (key, value) in table {
                map.insert(key, from_toml(value)?);
            }
            ConfigValue::Object(map)
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_namespaces() {
        let toml = r#"
type = "react-component"

[npm]
esModules = true
umd = "MyComponent"

[webpack.rules.svg]
test = { "$regex" = "\\.svg$" }
loader = "svg-inline-loader"
"#;

        let config = parse_config_toml(toml).unwrap();
        assert_eq!(config.get("type"), Some(&ConfigValue::from("react-component")));
        assert_eq!(
            config.get_path(&["npm", "umd"]),
            Some(&ConfigValue::from("MyComponent"))
        );
        assert!(matches!(
            config.get_path(&["webpack", "rules", "svg", "test"]),
            Some(ConfigValue::Pattern(_))
        ));
    }

    #[test]
    fn test_numbers() {
        let config = parse_config_toml("[devServer]\nport = 3000\nratio = 0.5\n").unwrap();
        assert_eq!(config.get_path(&["devServer", "port"]), Some(&ConfigValue::from(3000i64)));
        assert!(matches!(
            config.get_path(&["devServer", "ratio"]),
            Some(ConfigValue::Number(_))
        ));
    }

    #[test]
    fn test_syntax_error() {
        let err = parse_config_toml("[npm\ncjs = true").unwrap_err();
        assert!(err.starts_with("TOML syntax error"));
    }
}
