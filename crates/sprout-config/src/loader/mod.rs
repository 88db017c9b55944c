//! Config file discovery and loading

use camino::{Utf8Path, Utf8PathBuf};
use sprout_core::{ConfigValue, SproutError, SproutResult};
use tracing::debug;

use crate::json::parse_config_json;
use crate::toml::parse_config_toml;

/// Config files looked for in the working directory, in order
pub const CONFIG_FILE_NAMES: [&str; 2] = ["sprout.config.json", "sprout.config.toml"];

/// A config file and its parsed contents
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedConfig {
    pub path: Utf8PathBuf,
    pub config: ConfigValue,
}

/// Finds and reads the user's config file
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Current working directory
    cwd: Utf8PathBuf,
}

impl ConfigLoader {
    pub fn new(cwd: Utf8PathBuf) -> Self {
        Self { cwd }
    }

    pub fn cwd(&self) -> &Utf8Path {
        &self.cwd
    }

    /// Load the config file.
    ///
    /// An explicit path must exist. Without one, the default file names are
    /// tried in the working directory and a missing file is only an error
    /// when `required` is set.
    pub async fn load(
        &self,
        explicit: Option<&Utf8Path>,
        required: bool,
    ) -> SproutResult<Option<LoadedConfig>> {
        let path = match explicit {
            Some(path) => {
                let path = self.cwd.join(path);
                if !file_exists(&path).await? {
                    return Err(SproutError::ConfigNotFound {
                        path: path.to_string(),
                    });
                }
                path
            },
            None => match self.find_default_config().await? {
                Some(path) => path,
                None if required => {
                    return Err(SproutError::ConfigNotFound {
                        path: self.cwd.join(CONFIG_FILE_NAMES[0]).to_string(),
                    });
                },
                None => {
                    debug!(cwd = %self.cwd, "No config file found, using defaults");
                    return Ok(None);
                },
            },
        };

        let content = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| SproutError::io(format!("Failed to read {}", path), e))?;
        let config = parse_config(&path, &content).map_err(|message| SproutError::ConfigImport {
            path: path.to_string(),
            message,
        })?;
        debug!(path = %path, "Loaded config file");
        Ok(Some(LoadedConfig { path, config }))
    }

    /// First default config file present in the working directory
    pub async fn find_default_config(&self) -> SproutResult<Option<Utf8PathBuf>> {
        for name in CONFIG_FILE_NAMES {
            let path = self.cwd.join(name);
            if file_exists(&path).await? {
                return Ok(Some(path));
            }
        }
        Ok(None)
    }
}

async fn file_exists(path: &Utf8Path) -> SproutResult<bool> {
    tokio::fs::try_exists(path)
        .await
        .map_err(|e| SproutError::io(format!("Failed to check {}", path), e))
}

/// Parse config file contents, choosing the format from the extension
pub fn parse_config(path: &Utf8Path, content: &str) -> Result<ConfigValue, String> {
    match path.extension() {
        Some("toml") => parse_config_toml(content),
        _ => parse_config_json(content),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn loader_in(dir: &TempDir) -> ConfigLoader {
        ConfigLoader::new(Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap())
    }

    #[tokio::test]
    async fn test_missing_default_config_is_not_an_error() {
        let dir = TempDir::new().unwrap();
        let loaded = loader_in(&dir).load(None, false).await.unwrap();
        assert!(loaded.is_none());
    }

    #[tokio::test]
    async fn test_missing_required_config() {
        let dir = TempDir::new().unwrap();
        let err = loader_in(&dir).load(None, true).await.unwrap_err();
        assert!(matches!(err, SproutError::ConfigNotFound { .. }));
    }

    #[tokio::test]
    async fn test_missing_explicit_config() {
        let dir = TempDir::new().unwrap();
        let err = loader_in(&dir)
            .load(Some(Utf8Path::new("custom.json")), false)
            .await
            .unwrap_err();
        match err {
            SproutError::ConfigNotFound { path } => assert!(path.ends_with("custom.json")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_loads_default_json_config() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("sprout.config.json"),
            r#"{"type": "web-app", "npm": {"cjs": false}}"#,
        )
        .unwrap();

        let loaded = loader_in(&dir).load(None, true).await.unwrap().unwrap();
        assert!(loaded.path.ends_with("sprout.config.json"));
        assert_eq!(loaded.config.get("type"), Some(&ConfigValue::from("web-app")));
    }

    #[tokio::test]
    async fn test_loads_explicit_toml_config() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("sprout.toml"), "type = \"web-module\"\n").unwrap();

        let loaded = loader_in(&dir)
            .load(Some(Utf8Path::new("sprout.toml")), false)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(loaded.config.get("type"), Some(&ConfigValue::from("web-module")));
    }

    #[tokio::test]
    async fn test_parse_failure_is_an_import_error() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("sprout.config.json"), "{ not json").unwrap();

        let err = loader_in(&dir).load(None, false).await.unwrap_err();
        assert!(matches!(err, SproutError::ConfigImport { .. }));
        assert!(err.is_load_error());
    }
}
