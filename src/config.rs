//! Client configuration loading, including the backend base URL.

use std::{env, fs, io::ErrorKind, path::PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

use crate::services::api_client::DEFAULT_API_BASE_URL;

/// Default location on disk where the client looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/client.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "ULTISTATS_CONFIG_PATH";
/// Environment variable that overrides the configured API base URL.
const API_BASE_URL_ENV: &str = "ULTISTATS_API_BASE_URL";
/// Default preferences file, relative to the working directory.
const DEFAULT_PREFERENCES_PATH: &str = ".ultistats/preferences.json";

#[derive(Debug, Clone, PartialEq, Eq)]
/// Immutable runtime configuration shared across the client.
pub struct AppConfig {
    /// Base URL every API endpoint is appended to.
    pub api_base_url: String,
    /// File backing the persisted preferences.
    pub preferences_path: PathBuf,
    /// System color-scheme preference reported by the console display.
    pub prefers_dark: bool,
}

impl AppConfig {
    /// Load the configuration from disk, falling back to built-in defaults, then
    /// apply environment overrides.
    pub fn load() -> Self {
        let path = resolve_config_path();
        let config = match fs::read_to_string(&path) {
            Ok(contents) => match Self::from_json(&contents) {
                Ok(config) => {
                    info!(path = %path.display(), "loaded client config");
                    config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        };

        config.with_env_overrides(env::var(API_BASE_URL_ENV).ok())
    }

    /// Parse a JSON configuration document. Missing keys take their defaults.
    pub fn from_json(contents: &str) -> serde_json::Result<Self> {
        serde_json::from_str::<RawConfig>(contents).map(Into::into)
    }

    fn with_env_overrides(mut self, api_base_url: Option<String>) -> Self {
        if let Some(url) = api_base_url.filter(|url| !url.trim().is_empty()) {
            info!(api_base_url = %url, "API base URL overridden from environment");
            self.api_base_url = url;
        }
        self
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_owned(),
            preferences_path: PathBuf::from(DEFAULT_PREFERENCES_PATH),
            prefers_dark: false,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    api_base_url: Option<String>,
    preferences_path: Option<PathBuf>,
    prefers_dark: Option<bool>,
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        let defaults = AppConfig::default();
        Self {
            api_base_url: value.api_base_url.unwrap_or(defaults.api_base_url),
            preferences_path: value.preferences_path.unwrap_or(defaults.preferences_path),
            prefers_dark: value.prefers_dark.unwrap_or(defaults.prefers_dark),
        }
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_local_backend() {
        let config = AppConfig::default();
        assert_eq!(config.api_base_url, "http://localhost:8000/api");
        assert!(!config.prefers_dark);
    }

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let config = AppConfig::from_json(r#"{ "api_base_url": "https://stats.example/api" }"#)
            .unwrap();
        assert_eq!(config.api_base_url, "https://stats.example/api");
        assert_eq!(
            config.preferences_path,
            AppConfig::default().preferences_path
        );
    }

    #[test]
    fn malformed_file_is_an_error() {
        assert!(AppConfig::from_json("{ api_base_url: 1 }").is_err());
    }

    #[test]
    fn env_override_ignores_blank_values() {
        let config = AppConfig::default().with_env_overrides(Some("  ".into()));
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);

        let config = AppConfig::default().with_env_overrides(Some("http://10.0.0.2/api".into()));
        assert_eq!(config.api_base_url, "http://10.0.0.2/api");
    }
}
