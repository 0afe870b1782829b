use anyhow::{Context, Result};
use directories::BaseDirs;
use serde::{de, Deserialize, Deserializer};
use std::fs;
use std::path::PathBuf;
use tracing::debug;

use crate::error::{StatsError, StatsResult};

const CONFIG_FILE_NAME: &str = ".toggl-stats.json";

fn deserialize_opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    match value {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(s)) => Ok(Some(s)),
        Some(serde_json::Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(de::Error::custom(format!(
            "expected a string or number, found {}",
            other
        ))),
    }
}

/// Contents of `~/.toggl-stats.json`. Both keys are optional; flags fill the gaps.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileConfig {
    #[serde(default, deserialize_with = "deserialize_opt_string")]
    pub token: Option<String>,
    #[serde(default, deserialize_with = "deserialize_opt_string")]
    pub workspace: Option<String>,
}

/// Resolved credentials for a single report request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub token: String,
    pub workspace: String,
}

impl Settings {
    /// Explicit values win over the config file. Blank values count as missing.
    pub fn resolve(
        token: Option<String>,
        workspace: Option<String>,
        file: Option<FileConfig>,
    ) -> StatsResult<Self> {
        let file = file.unwrap_or_default();
        let token = pick(token, file.token);
        let workspace = pick(workspace, file.workspace);

        match (token, workspace) {
            (Some(token), Some(workspace)) => Ok(Settings { token, workspace }),
            (token, workspace) => {
                debug!(
                    has_token = token.is_some(),
                    has_workspace = workspace.is_some(),
                    "settings unresolved"
                );
                Err(StatsError::MissingSettings)
            }
        }
    }
}

/// Absent and whitespace-only values are both treated as unset.
pub fn is_unset(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}

fn pick(primary: Option<String>, fallback: Option<String>) -> Option<String> {
    primary
        .filter(|v| !is_unset(Some(v.as_str())))
        .or_else(|| fallback.filter(|v| !is_unset(Some(v.as_str()))))
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    config_file: PathBuf,
}

impl AppConfig {
    /// Uses `path` when given, otherwise the file in the user's home directory.
    pub fn new(path: Option<PathBuf>) -> Result<Self> {
        let config_file = match path {
            Some(path) => path,
            None => BaseDirs::new()
                .context("Failed to locate home directory")?
                .home_dir()
                .join(CONFIG_FILE_NAME),
        };

        Ok(AppConfig { config_file })
    }

    pub fn load(&self) -> Result<Option<FileConfig>> {
        if !self.config_file.exists() {
            debug!(path = %self.config_file.display(), "no config file");
            return Ok(None);
        }

        let contents = fs::read_to_string(&self.config_file).with_context(|| {
            format!("Failed to read config file {}", self.config_file.display())
        })?;

        let config: FileConfig = serde_json::from_str(&contents).with_context(|| {
            format!("Failed to parse config file {}", self.config_file.display())
        })?;

        debug!(path = %self.config_file.display(), "loaded config file");
        Ok(Some(config))
    }

    pub fn config_file_path(&self) -> &PathBuf {
        &self.config_file
    }
}
