//! Project-type defaults and command-line override fragments

use sprout_core::{BuildMode, CliArgs, ConfigMap, ConfigValue, ProjectType};
use tracing::debug;

const PREACT_COMPAT: &str = "preact-compat/dist/preact-compat";

/// Which React-compatible library a React build is aliased to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Compat {
    Inferno,
    Preact,
}

impl Compat {
    fn from_args(args: &CliArgs) -> Option<Self> {
        if args.is_enabled("inferno") || args.is_enabled("inferno-compat") {
            Some(Compat::Inferno)
        } else if args.is_enabled("preact") || args.is_enabled("preact-compat") {
            Some(Compat::Preact)
        } else {
            None
        }
    }

    fn aliases(&self) -> ConfigValue {
        let mut aliases = ConfigMap::new();
        match self {
            Compat::Inferno => {
                aliases.insert("react".into(), "inferno-compat".into());
                aliases.insert("react-dom".into(), "inferno-compat".into());
            },
            Compat::Preact => {
                aliases.insert("react".into(), PREACT_COMPAT.into());
                aliases.insert("react-dom".into(), PREACT_COMPAT.into());
                aliases.insert(
                    "create-react-class".into(),
                    "preact-compat/lib/create-react-class".into(),
                );
            },
        }
        ConfigValue::Object(aliases)
    }
}

/// Defaults contributed by the project type for one build mode
pub fn project_defaults(
    project_type: Option<ProjectType>,
    mode: BuildMode,
    args: &CliArgs,
) -> ConfigValue {
    let mut config = ConfigValue::object();
    let Some(project_type) = project_type else {
        return config;
    };

    match project_type {
        ProjectType::ReactApp | ProjectType::ReactComponent => {
            let mut presets = vec!["react"];
            match mode {
                BuildMode::Production => presets.push("react-prod"),
                BuildMode::Development => {
                    presets.push("react-dev");
                    if !args.is_disabled("hmr") && !args.is_disabled("hmre") {
                        presets.push("react-hmre");
                    }
                },
                BuildMode::Test => {},
            }
            config.insert_path(&["babel", "presets"], presets.into());

            if mode == BuildMode::Production {
                if let Some(compat) = Compat::from_args(args) {
                    config.insert_path(&["webpack", "aliases"], compat.aliases());
                }
            }

            if project_type == ProjectType::ReactComponent && !keeps_prop_types(args) {
                let remove_prop_types = match mode {
                    BuildMode::Production => ("removeImport", ConfigValue::Bool(true)),
                    _ => ("mode", ConfigValue::from("wrap")),
                };
                let mut options = ConfigMap::new();
                options.insert(remove_prop_types.0.to_string(), remove_prop_types.1);
                config.insert_path(&["babel", "removePropTypes"], options.into());
            }
        },
        ProjectType::PreactApp => {
            config.insert_path(&["babel", "presets"], vec!["preact"].into());
            config.insert_path(&["webpack", "aliases"], Compat::Preact.aliases());
        },
        ProjectType::InfernoApp => {
            config.insert_path(&["babel", "presets"], vec!["inferno"].into());
            config.insert_path(&["webpack", "aliases"], Compat::Inferno.aliases());
        },
        ProjectType::WebApp | ProjectType::WebModule => {},
    }

    debug!(project_type = %project_type, mode = mode.as_str(), "Built project defaults");
    config
}

fn keeps_prop_types(args: &CliArgs) -> bool {
    args.is_enabled("keep-proptypes") || args.is_enabled("proptypes")
}

/// Config fragment built from recognised command-line flags.
///
/// Values are left in their shorthand forms; they go through the same
/// normalization and validation as the user's config.
pub fn cli_overrides(args: &CliArgs) -> ConfigValue {
    let mut config = ConfigValue::object();

    if let Some(project_type) = args.flag("type") {
        config.insert_path(&["type"], project_type.clone());
    }
    match args.flag("umd") {
        Some(ConfigValue::String(global)) => {
            config.insert_path(&["npm", "umd"], global.as_str().into());
        },
        Some(ConfigValue::Bool(false)) => config.insert_path(&["npm", "umd"], false.into()),
        _ => {},
    }
    if let Some(es_modules) = args.flag("es-modules").and_then(flag_bool) {
        config.insert_path(&["npm", "esModules"], es_modules.into());
    }
    if keeps_prop_types(args) {
        config.insert_path(&["babel", "removePropTypes"], false.into());
    }
    if let Some(browsers) = args.flag_str("browsers") {
        let browsers: Vec<ConfigValue> = browsers
            .split(',')
            .map(str::trim)
            .filter(|browser| !browser.is_empty())
            .map(ConfigValue::from)
            .collect();
        config.insert_path(&["karma", "browsers"], ConfigValue::Array(browsers));
    }
    if let Some(host) = args.flag_str("host") {
        config.insert_path(&["devServer", "host"], host.into());
    }
    if let Some(port) = args.flag("port") {
        config.insert_path(&["devServer", "port"], port_value(port));
    }
    if let Some(open) = args.flag("open") {
        config.insert_path(&["devServer", "open"], open.clone());
    }

    config
}

/// Whether any recognised override flag was passed
pub fn has_cli_overrides(args: &CliArgs) -> bool {
    cli_overrides(args)
        .as_object()
        .is_some_and(|map| !map.is_empty())
}

/// Flags like `--es-modules=false` arrive as strings
fn flag_bool(value: &ConfigValue) -> Option<bool> {
    match value {
        ConfigValue::Bool(b) => Some(*b),
        ConfigValue::String(s) => match s.as_str() {
            "0" | "false" | "no" | "off" => Some(false),
            "1" | "true" | "yes" | "on" => Some(true),
            _ => None,
        },
        _ => None,
    }
}

fn port_value(value: &ConfigValue) -> ConfigValue {
    match value {
        ConfigValue::String(s) => s
            .parse::<u16>()
            .map(ConfigValue::from)
            .unwrap_or_else(|_| value.clone()),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn value(json: serde_json::Value) -> ConfigValue {
        ConfigValue::from(json)
    }

    #[test]
    fn test_react_presets_per_mode() {
        let args = CliArgs::new(["serve"]);
        assert_eq!(
            project_defaults(Some(ProjectType::ReactApp), BuildMode::Development, &args),
            value(json!({"babel": {"presets": ["react", "react-dev", "react-hmre"]}}))
        );
        assert_eq!(
            project_defaults(Some(ProjectType::ReactApp), BuildMode::Production, &args),
            value(json!({"babel": {"presets": ["react", "react-prod"]}}))
        );
        assert_eq!(
            project_defaults(Some(ProjectType::ReactApp), BuildMode::Test, &args),
            value(json!({"babel": {"presets": ["react"]}}))
        );
    }

    #[test]
    fn test_no_hmr() {
        let args = CliArgs::new(["serve"]).with_flag("hmr", false);
        assert_eq!(
            project_defaults(Some(ProjectType::ReactApp), BuildMode::Development, &args),
            value(json!({"babel": {"presets": ["react", "react-dev"]}}))
        );
    }

    #[test]
    fn test_compat_aliases_in_production_builds() {
        let args = CliArgs::new(["build"]).with_flag("inferno", true);
        let defaults = project_defaults(Some(ProjectType::ReactApp), BuildMode::Production, &args);
        assert_eq!(
            defaults.get_path(&["webpack", "aliases", "react"]),
            Some(&ConfigValue::from("inferno-compat"))
        );

        let args = CliArgs::new(["serve"]).with_flag("preact", true);
        let defaults = project_defaults(Some(ProjectType::ReactApp), BuildMode::Development, &args);
        assert!(defaults.get("webpack").is_none());
    }

    #[test]
    fn test_react_component_prop_types() {
        let args = CliArgs::new(["build"]);
        let defaults =
            project_defaults(Some(ProjectType::ReactComponent), BuildMode::Production, &args);
        assert_eq!(
            defaults.get_path(&["babel", "removePropTypes"]),
            Some(&value(json!({"removeImport": true})))
        );

        let defaults =
            project_defaults(Some(ProjectType::ReactComponent), BuildMode::Development, &args);
        assert_eq!(
            defaults.get_path(&["babel", "removePropTypes"]),
            Some(&value(json!({"mode": "wrap"})))
        );

        let args = args.with_flag("keep-proptypes", true);
        let defaults =
            project_defaults(Some(ProjectType::ReactComponent), BuildMode::Production, &args);
        assert!(defaults.get_path(&["babel", "removePropTypes"]).is_none());
    }

    #[test]
    fn test_web_and_untyped_projects_have_no_defaults() {
        let args = CliArgs::default();
        assert_eq!(
            project_defaults(Some(ProjectType::WebModule), BuildMode::Production, &args),
            ConfigValue::object()
        );
        assert_eq!(
            project_defaults(None, BuildMode::Production, &args),
            ConfigValue::object()
        );
    }

    #[test]
    fn test_preact_app_defaults() {
        let defaults =
            project_defaults(Some(ProjectType::PreactApp), BuildMode::Test, &CliArgs::default());
        assert_eq!(
            defaults.get_path(&["babel", "presets"]),
            Some(&value(json!(["preact"])))
        );
        assert_eq!(
            defaults.get_path(&["webpack", "aliases", "react-dom"]),
            Some(&ConfigValue::from(PREACT_COMPAT))
        );
    }

    #[test]
    fn test_cli_overrides() {
        let args = CliArgs::new(["build"])
            .with_flag("umd", "MyLib")
            .with_flag("es-modules", "false")
            .with_flag("browsers", "Chrome, Firefox")
            .with_flag("port", "8080")
            .with_flag("open", true);
        assert_eq!(
            cli_overrides(&args),
            value(json!({
                "npm": {"umd": "MyLib", "esModules": false},
                "karma": {"browsers": ["Chrome", "Firefox"]},
                "devServer": {"port": 8080, "open": true}
            }))
        );
        assert!(has_cli_overrides(&args));
    }

    #[test]
    fn test_no_overrides() {
        let args = CliArgs::new(["build"]).with_flag("verbose", true);
        assert_eq!(cli_overrides(&args), ConfigValue::object());
        assert!(!has_cli_overrides(&args));
    }

    #[test]
    fn test_umd_false_and_keep_proptypes() {
        let args = CliArgs::new(["build"])
            .with_flag("umd", false)
            .with_flag("keep-proptypes", true);
        assert_eq!(
            cli_overrides(&args),
            value(json!({"npm": {"umd": false}, "babel": {"removePropTypes": false}}))
        );
    }
}
