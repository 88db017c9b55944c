//! Installed plugin discovery.
//!
//! Plugins are npm packages named `sprout-*` listed in the project's
//! package.json. Each ships a `sprout-plugin.json` manifest registering extra
//! CSS preprocessors, which become additional style types and loader names.

use camino::{Utf8Path, Utf8PathBuf};
use indexmap::IndexMap;
use serde::Deserialize;
use sprout_core::{ConfigValue, SproutError, SproutResult};
use tracing::{debug, warn};

use crate::json::{from_json, parse_package_json};

/// Package name prefix identifying plugins
pub const PLUGIN_PREFIX: &str = "sprout-";

/// Manifest file each plugin package provides
pub const PLUGIN_MANIFEST: &str = "sprout-plugin.json";

/// Loader names every style type gets
pub const BASE_STYLE_LOADERS: [&str; 3] = ["style", "css", "postcss"];

/// Registrations merged from every installed plugin
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PluginConfig {
    /// CSS preprocessor configs keyed by id, e.g. `sass`
    pub css_preprocessors: IndexMap<String, ConfigValue>,
}

#[derive(Debug, Default, Deserialize)]
struct PluginManifest {
    #[serde(default, rename = "cssPreprocessors")]
    css_preprocessors: IndexMap<String, serde_json::Value>,
}

impl PluginConfig {
    /// Register a CSS preprocessor
    pub fn with_preprocessor(mut self, id: &str, config: ConfigValue) -> Self {
        self.css_preprocessors.insert(id.to_string(), config);
        self
    }

    /// Style types accepted under `webpack.styles`
    pub fn style_types(&self) -> Vec<String> {
        std::iter::once("css".to_string())
            .chain(self.css_preprocessors.keys().cloned())
            .collect()
    }

    /// Every known loader name
    pub fn loader_names(&self) -> Vec<String> {
        BASE_STYLE_LOADERS
            .iter()
            .map(|name| (*name).to_string())
            .chain(self.css_preprocessors.keys().cloned())
            .collect()
    }

    /// Loader names usable in a rule for one style type
    pub fn loader_names_for(&self, style_type: &str) -> Vec<String> {
        let mut names: Vec<String> = BASE_STYLE_LOADERS
            .iter()
            .map(|name| (*name).to_string())
            .collect();
        if self.css_preprocessors.contains_key(style_type) {
            names.push(style_type.to_string());
        }
        names
    }

    /// Add registrations from another plugin; earlier registrations win
    pub fn merge(&mut self, other: PluginConfig) {
        for (id, config) in other.css_preprocessors {
            self.css_preprocessors.entry(id).or_insert(config);
        }
    }
}

/// Scan `cwd/package.json` for plugin dependencies and load their manifests.
///
/// A project without package.json has no plugins. A plugin package without a
/// manifest is skipped with a warning; an unreadable manifest is an error.
pub async fn scan_plugins(cwd: &Utf8Path) -> SproutResult<PluginConfig> {
    let package_path = cwd.join("package.json");
    let content = match tokio::fs::read_to_string(&package_path).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %package_path, "No package.json, skipping plugin scan");
            return Ok(PluginConfig::default());
        },
        Err(e) => return Err(SproutError::io(format!("Failed to read {}", package_path), e)),
    };
    let package = parse_package_json(&content).map_err(|message| SproutError::ConfigImport {
        path: package_path.to_string(),
        message,
    })?;

    let mut plugins = PluginConfig::default();
    for name in package
        .dependency_names()
        .filter(|name| name.starts_with(PLUGIN_PREFIX))
    {
        let manifest_path = plugin_manifest_path(cwd, name);
        match load_manifest(&manifest_path).await? {
            Some(plugin) => {
                debug!(plugin = name, preprocessors = plugin.css_preprocessors.len(), "Loaded plugin");
                plugins.merge(plugin);
            },
            None => warn!(plugin = name, path = %manifest_path, "Plugin has no manifest, skipping"),
        }
    }
    Ok(plugins)
}

fn plugin_manifest_path(cwd: &Utf8Path, name: &str) -> Utf8PathBuf {
    cwd.join("node_modules").join(name).join(PLUGIN_MANIFEST)
}

async fn load_manifest(path: &Utf8Path) -> SproutResult<Option<PluginConfig>> {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(SproutError::io(format!("Failed to read {}", path), e)),
    };
    let import_error = |message: String| SproutError::ConfigImport {
        path: path.to_string(),
        message,
    };

    let manifest: PluginManifest =
        serde_json::from_str(&content).map_err(|e| import_error(format!("JSON parsing error: {}", e)))?;
    let mut plugin = PluginConfig::default();
    for (id, config) in manifest.css_preprocessors {
        plugin = plugin.with_preprocessor(&id, from_json(config).map_err(import_error)?);
    }
    Ok(Some(plugin))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn utf8_dir(dir: &TempDir) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap()
    }

    async fn write(path: Utf8PathBuf, content: &str) {
        tokio::fs::create_dir_all(path.parent().unwrap()).await.unwrap();
        tokio::fs::write(path, content).await.unwrap();
    }

    #[test]
    fn test_names_follow_registered_preprocessors() {
        let plugins = PluginConfig::default()
            .with_preprocessor("sass", ConfigValue::object())
            .with_preprocessor("less", ConfigValue::object());
        assert_eq!(plugins.style_types(), vec!["css", "sass", "less"]);
        assert_eq!(
            plugins.loader_names(),
            vec!["style", "css", "postcss", "sass", "less"]
        );
        assert_eq!(plugins.loader_names_for("css"), vec!["style", "css", "postcss"]);
        assert_eq!(
            plugins.loader_names_for("less"),
            vec!["style", "css", "postcss", "less"]
        );
    }

    #[test]
    fn test_scan_without_package_json() {
        let dir = TempDir::new().unwrap();
        let plugins = tokio_test::block_on(scan_plugins(&utf8_dir(&dir))).unwrap();
        assert_eq!(plugins, PluginConfig::default());
    }

    #[tokio::test]
    async fn test_scan_loads_plugin_manifests() {
        let dir = TempDir::new().unwrap();
        let cwd = utf8_dir(&dir);
        write(
            cwd.join("package.json"),
            r#"{"dependencies": {"react": "16"}, "devDependencies": {"sprout-sass": "1", "sprout-missing": "1"}}"#,
        )
        .await;
        write(
            plugin_manifest_path(&cwd, "sprout-sass"),
            r#"{"cssPreprocessors": {"sass": {"test": {"$regex": "\\.scss$"}, "loader": "sass-loader"}}}"#,
        )
        .await;

        let plugins = scan_plugins(&cwd).await.unwrap();
        assert_eq!(plugins.style_types(), vec!["css", "sass"]);
        assert!(matches!(
            plugins.css_preprocessors["sass"].get("test"),
            Some(ConfigValue::Pattern(_))
        ));
    }

    #[tokio::test]
    async fn test_malformed_manifest_is_an_import_error() {
        let dir = TempDir::new().unwrap();
        let cwd = utf8_dir(&dir);
        write(cwd.join("package.json"), r#"{"dependencies": {"sprout-bad": "1"}}"#).await;
        write(plugin_manifest_path(&cwd, "sprout-bad"), "{ nope").await;

        let err = scan_plugins(&cwd).await.unwrap_err();
        assert!(matches!(err, SproutError::ConfigImport { .. }));
    }
}
