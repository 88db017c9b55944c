//! The config compile pipeline.
//!
//! user config (transform evaluated) → normalize → validate → merge with
//! project defaults and command-line overrides → derive. Any validation error
//! stops the pipeline before merging and is returned with the full report.

use serde::{Serialize, Serializer};
use sprout_core::{
    BuildMode, CliArgs, ConfigMap, ConfigValue, ProjectType, Report, SproutError, SproutResult,
};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

use crate::defaults::{cli_overrides, has_cli_overrides, project_defaults};
use crate::derive::derive_config;
use crate::merge::{ConfigLayers, ConfigSource};
use crate::plugins::PluginConfig;
use crate::schema::user_config_schema;
use crate::shorthand::normalize;
use crate::validate::validate;

/// A function producing the user's config from the invocation context
pub type UserTransform = Arc<dyn Fn(&TransformContext) -> ConfigValue + Send + Sync>;

/// What the user's config file provided
#[derive(Clone)]
pub enum UserConfig {
    /// A plain config tree
    Tree(ConfigValue),
    /// A function evaluated once per invocation
    Transform(UserTransform),
}

/// The build tool a user transform is running under
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolHandle {
    pub name: &'static str,
    pub version: &'static str,
}

/// Passed to a user transform
#[derive(Debug, Clone)]
pub struct TransformContext {
    /// The command being run, e.g. `build`
    pub command: Option<String>,
    pub args: CliArgs,
    pub tool_handle: ToolHandle,
    pub mode: BuildMode,
}

/// The final config, with every namespace present
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergedConfig {
    pub project_type: Option<ProjectType>,
    pub babel: ConfigMap,
    pub dev_server: ConfigMap,
    pub karma: ConfigMap,
    pub npm: ConfigMap,
    pub webpack: ConfigMap,
}

/// A merged config plus the soft diagnostics produced along the way
#[derive(Debug, Clone)]
pub struct CompiledConfig {
    pub config: MergedConfig,
    pub report: Report,
}

/// Compiles user config for one invocation
#[derive(Debug, Clone)]
pub struct ConfigPipeline {
    args: CliArgs,
    mode: BuildMode,
    plugins: PluginConfig,
    config_path: Option<String>,
    tool_handle: ToolHandle,
}

impl Default for ToolHandle {
    fn default() -> Self {
        Self {
            name: "sprout",
            version: env!("CARGO_PKG_VERSION"),
        }
    }
}

impl UserConfig {
    /// Wrap a transform function
    pub fn transform<F>(f: F) -> Self
    where
        F: Fn(&TransformContext) -> ConfigValue + Send + Sync + 'static,
    {
        UserConfig::Transform(Arc::new(f))
    }

    /// Evaluate to a config tree
    pub fn evaluate(&self, context: &TransformContext) -> ConfigValue {
        match self {
            UserConfig::Tree(tree) => tree.clone(),
            UserConfig::Transform(transform) => {
                debug!(command = ?context.command, "Evaluating user config function");
                (transform.as_ref())(context)
            },
        }
    }
}

impl fmt::Debug for UserConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserConfig::Tree(tree) => f.debug_tuple("Tree").field(tree).finish(),
            UserConfig::Transform(_) => f.write_str("Transform([Function])"),
        }
    }
}

impl From<ConfigValue> for UserConfig {
    fn from(tree: ConfigValue) -> Self {
        UserConfig::Tree(tree)
    }
}

impl MergedConfig {
    /// Split a merged tree into its namespaces
    fn from_value(value: ConfigValue) -> SproutResult<Self> {
        let ConfigValue::Object(mut map) = value else {
            return Ok(Self::default());
        };
        let project_type = match map.shift_remove("type") {
            Some(ConfigValue::String(name)) => Some(name.parse()?),
            _ => None,
        };
        let mut namespace = |name: &str| match map.shift_remove(name) {
            Some(ConfigValue::Object(namespace)) => namespace,
            _ => ConfigMap::new(),
        };
        Ok(Self {
            project_type,
            babel: namespace("babel"),
            dev_server: namespace("devServer"),
            karma: namespace("karma"),
            npm: namespace("npm"),
            webpack: namespace("webpack"),
        })
    }

    /// Look up a namespace by its config key
    pub fn namespace(&self, name: &str) -> Option<&ConfigMap> {
        match name {
            "babel" => Some(&self.babel),
            "devServer" => Some(&self.dev_server),
            "karma" => Some(&self.karma),
            "npm" => Some(&self.npm),
            "webpack" => Some(&self.webpack),
            _ => None,
        }
    }

    /// Tree form, with `type` only when a project type is set
    pub fn to_value(&self) -> ConfigValue {
        let mut map = ConfigMap::new();
        if let Some(project_type) = self.project_type {
            map.insert("type".to_string(), project_type.as_str().into());
        }
        map.insert("babel".to_string(), self.babel.clone().into());
        map.insert("devServer".to_string(), self.dev_server.clone().into());
        map.insert("karma".to_string(), self.karma.clone().into());
        map.insert("npm".to_string(), self.npm.clone().into());
        map.insert("webpack".to_string(), self.webpack.clone().into());
        ConfigValue::Object(map)
    }
}

impl Serialize for MergedConfig {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

/// Normalized, validated input ready to merge
#[derive(Debug, Clone)]
pub struct CheckedConfig {
    pub user: ConfigValue,
    pub overrides: ConfigValue,
    pub report: Report,
}

impl ConfigPipeline {
    /// Pipeline for `args`, with the build mode inferred from the command
    pub fn new(args: CliArgs) -> Self {
        let mode = args
            .command()
            .map(BuildMode::for_command)
            .unwrap_or_default();
        Self {
            args,
            mode,
            plugins: PluginConfig::default(),
            config_path: None,
            tool_handle: ToolHandle::default(),
        }
    }

    pub fn with_mode(mut self, mode: BuildMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_plugins(mut self, plugins: PluginConfig) -> Self {
        self.plugins = plugins;
        self
    }

    /// Record where the user config was loaded from, for the report
    pub fn with_config_path(mut self, path: impl Into<String>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    pub fn mode(&self) -> BuildMode {
        self.mode
    }

    pub fn plugins(&self) -> &PluginConfig {
        &self.plugins
    }

    pub fn transform_context(&self) -> TransformContext {
        TransformContext {
            command: self.args.command().map(str::to_string),
            args: self.args.clone(),
            tool_handle: self.tool_handle,
            mode: self.mode,
        }
    }

    /// Normalize and validate the user config and command-line overrides.
    ///
    /// Never fails; the returned report may contain errors.
    pub fn check(&self, user: Option<&UserConfig>) -> CheckedConfig {
        let mut report = Report::new(self.config_path.clone());
        let schema = user_config_schema(&self.plugins);

        let user = match user {
            Some(user) => user.evaluate(&self.transform_context()),
            None => ConfigValue::object(),
        };
        let user = normalize(&user, &mut report);
        validate(&schema, &user, &mut report);

        let overrides = normalize(&cli_overrides(&self.args), &mut report);
        validate(&schema, &overrides, &mut report);
        report.set_argument_overrides(has_cli_overrides(&self.args));

        debug!(
            errors = report.errors().len(),
            deprecations = report.deprecations().len(),
            hints = report.hints().len(),
            "Checked user config"
        );
        CheckedConfig {
            user,
            overrides,
            report,
        }
    }

    /// Compile the final config
    pub fn run(&self, user: Option<&UserConfig>) -> SproutResult<CompiledConfig> {
        let CheckedConfig {
            user,
            overrides,
            report,
        } = self.check(user);
        if report.has_errors() {
            return Err(SproutError::validation(report));
        }

        let project_type = overrides
            .get("type")
            .or_else(|| user.get("type"))
            .and_then(ConfigValue::as_str)
            .map(str::parse::<ProjectType>)
            .transpose()?;

        let mut layers = ConfigLayers::new();
        layers
            .push(
                ConfigSource::ProjectDefaults,
                project_defaults(project_type, self.mode, &self.args),
            )
            .push(ConfigSource::User, user)
            .push(ConfigSource::CommandLine, overrides);
        let merged = derive_config(&layers.merge(), &self.plugins);

        info!(
            mode = self.mode.as_str(),
            project_type = project_type.map(|t| t.as_str()),
            source = %report.config_source(),
            "Compiled config"
        );
        Ok(CompiledConfig {
            config: MergedConfig::from_value(merged)?,
            report,
        })
    }
}
