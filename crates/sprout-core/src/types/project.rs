//! Project types and build modes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::SproutError;

/// Kind of project a config describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectType {
    ReactApp,
    ReactComponent,
    PreactApp,
    InfernoApp,
    WebApp,
    WebModule,
}

/// Which kind of output a command is producing.
///
/// Threaded explicitly through every stage that has mode-dependent defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildMode {
    #[default]
    Development,
    Production,
    Test,
}

impl ProjectType {
    pub const ALL: [ProjectType; 6] = [
        ProjectType::ReactApp,
        ProjectType::ReactComponent,
        ProjectType::PreactApp,
        ProjectType::InfernoApp,
        ProjectType::WebApp,
        ProjectType::WebModule,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectType::ReactApp => "react-app",
            ProjectType::ReactComponent => "react-component",
            ProjectType::PreactApp => "preact-app",
            ProjectType::InfernoApp => "inferno-app",
            ProjectType::WebApp => "web-app",
            ProjectType::WebModule => "web-module",
        }
    }
}

impl fmt::Display for ProjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectType {
    type Err = SproutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProjectType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| SproutError::UnknownProjectType {
                name: s.to_string(),
            })
    }
}

impl BuildMode {
    /// Infer the mode from a command name such as `build-react-app` or `serve`
    pub fn for_command(command: &str) -> Self {
        if command.starts_with("build") {
            BuildMode::Production
        } else if command.starts_with("test") {
            BuildMode::Test
        } else {
            BuildMode::Development
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BuildMode::Development => "development",
            BuildMode::Production => "production",
            BuildMode::Test => "test",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_type_round_trips_through_str() {
        for project_type in ProjectType::ALL {
            assert_eq!(project_type.as_str().parse::<ProjectType>().unwrap(), project_type);
        }
        assert!("angular-app".parse::<ProjectType>().is_err());
    }

    #[test]
    fn test_build_mode_for_command() {
        assert_eq!(BuildMode::for_command("build"), BuildMode::Production);
        assert_eq!(BuildMode::for_command("build-react-app"), BuildMode::Production);
        assert_eq!(BuildMode::for_command("test"), BuildMode::Test);
        assert_eq!(BuildMode::for_command("serve"), BuildMode::Development);
    }
}
