//! Runtime settings: an optional YAML file overlaid by CLI flags and env vars.
//!
//! ```yaml
//! # news_browser.yaml
//! api_key: your-gnews-key
//! base_url: https://gnews.io/api/v4
//! placeholder_delay_ms: 800
//! ```
//!
//! Every key is optional. Without an API key the browser runs entirely on
//! sample data, which is a normal mode of operation rather than an error.

use crate::api::DEFAULT_BASE_URL;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{info, instrument};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Yaml {
        path: PathBuf,
        source: serde_yaml::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// News API credential. `None` selects sample-data mode.
    pub api_key: Option<String>,
    /// API root the endpoint paths are joined onto.
    pub base_url: String,
    /// Simulated latency before sample data is shown when no key is set.
    pub placeholder_delay_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            placeholder_delay_ms: 800,
        }
    }
}

impl Settings {
    /// Load settings from `path`, or defaults when no path is given.
    #[instrument(level = "info")]
    pub async fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        let settings = Self::from_yaml(&raw).map_err(|source| ConfigError::Yaml {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), live = settings.api_key().is_some(), "Loaded configuration");
        Ok(settings)
    }

    pub fn from_yaml(raw: &str) -> Result<Self, serde_yaml::Error> {
        // An empty file deserializes to `null`, which should mean "all defaults".
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(raw)
    }

    /// Overlay values given on the command line or through the environment.
    pub fn with_overrides(mut self, api_key: Option<String>, base_url: Option<String>) -> Self {
        if let Some(key) = api_key {
            self.api_key = Some(key);
        }
        if let Some(url) = base_url {
            self.base_url = url;
        }
        self
    }

    /// The configured key, treating a blank value as absent.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    pub fn placeholder_delay(&self) -> Duration {
        Duration::from_millis(self.placeholder_delay_ms)
    }
}
