//! Configuration management for the portal tools.

use crate::{CoreError, CoreResult, Paths};
use serde::{Deserialize, Serialize};
use std::path::Path;
use url::Url;

/// Default API base URL (can be overridden at compile time via TOMA_API_BASE env var).
pub const DEFAULT_API_BASE: &str = match option_env!("TOMA_API_BASE") {
    Some(url) => url,
    None => "http://localhost:8000",
};

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Runtime override for the API base URL.
const ENV_API_BASE: &str = "TOMA_API_BASE";
/// Runtime override for the log level.
const ENV_LOG_LEVEL: &str = "TOMA_LOG_LEVEL";

/// Path segment appended to the base URL for every API call.
const API_PREFIX: &str = "/api";

/// Portal client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Backend origin, e.g. `https://app.toma.example`. `/api` is appended.
    #[serde(default = "default_api_base")]
    pub api_base: String,
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            api_base: default_api_base(),
        }
    }
}

impl Config {
    /// Load configuration from `paths`, then apply environment overrides.
    pub fn load(paths: &Paths) -> CoreResult<Self> {
        let config_path = paths.config_file();

        let mut config = if config_path.exists() {
            Self::load_from_file(&config_path)?
        } else {
            Self::default()
        };

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a file.
    pub fn save(&self, paths: &Paths) -> CoreResult<()> {
        paths.ensure_dirs()?;
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(paths.config_file(), content)?;
        Ok(())
    }

    /// Override values from an environment lookup. Empty values are ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(base) = lookup(ENV_API_BASE).filter(|v| !v.trim().is_empty()) {
            self.api_base = base;
        }
        if let Some(level) = lookup(ENV_LOG_LEVEL).filter(|v| !v.trim().is_empty()) {
            self.log_level = level;
        }
    }

    /// Ensure the API base is an absolute http(s) URL.
    pub fn validate(&self) -> CoreResult<()> {
        let url = self.api_base_url()?;
        match url.scheme() {
            "http" | "https" => Ok(()),
            other => Err(CoreError::Config(format!(
                "api_base must use http or https, got {other}"
            ))),
        }
    }

    /// The base URL, parsed.
    pub fn api_base_url(&self) -> CoreResult<Url> {
        Url::parse(self.api_base.trim()).map_err(CoreError::from)
    }

    /// Root every endpoint path is joined onto: `<api_base>/api`.
    pub fn api_root(&self) -> String {
        format!("{}{}", self.api_base.trim().trim_end_matches('/'), API_PREFIX)
    }
}
