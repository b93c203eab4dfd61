use config::{Config, ConfigError, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::view::StaleResponses;

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Default, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct ClientConfig {
    pub api: ApiConfig,
    pub view: ViewConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Default, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct ViewConfig {
    pub stale_responses: StaleResponses,
}

const DEFAULT_CONFIG: &str = r#"
[api]
base_url = "http://localhost:5000"
timeout_secs = 10

[view]
# What to do with a response that arrives after a newer request of the same
# kind was issued: "discard" keeps the newest request's result, "apply" lets
# whichever response resolves last win.
stale_responses = "discard"
"#;

impl ClientConfig {
    /// Loads the user config, writing the default file on first run.
    pub fn load() -> Result<(Self, PathBuf), ConfigError> {
        let config_path = get_config_path();

        // Create config directory if it doesn't exist
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ConfigError::Message(format!("Failed to create config directory: {e}"))
            })?;
        }

        if !config_path.exists() {
            std::fs::write(&config_path, DEFAULT_CONFIG).map_err(|e| {
                ConfigError::Message(format!("Failed to write default config: {e}"))
            })?;
        }

        let config = Self::load_from(&config_path)?;

        Ok((config, config_path))
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from(path))
            .build()?
            .try_deserialize()
    }
}

pub fn get_config_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        config_dir.join("costs").join("client.toml")
    } else {
        PathBuf::from("client.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_config(dir: &tempfile::TempDir, contents: &str) -> PathBuf {
        let path = dir.path().join("client.toml");
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_default_file_matches_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, DEFAULT_CONFIG);

        let config = ClientConfig::load_from(&path).unwrap();

        assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.api.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert_eq!(config.view.stale_responses, StaleResponses::Discard);
    }

    #[test]
    fn test_partial_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "[api]\nbase_url = \"http://api.internal:8080\"\n");

        let config = ClientConfig::load_from(&path).unwrap();

        assert_eq!(config.api.base_url, "http://api.internal:8080");
        assert_eq!(config.api.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert_eq!(config.view.stale_responses, StaleResponses::Discard);
    }

    #[test]
    fn test_stale_response_policy() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "[view]\nstale_responses = \"apply\"\n");

        let config = ClientConfig::load_from(&path).unwrap();

        assert_eq!(config.view.stale_responses, StaleResponses::Apply);
    }

    #[test]
    fn test_unknown_policy_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "[view]\nstale_responses = \"sometimes\"\n");

        assert!(ClientConfig::load_from(&path).is_err());
    }
}
