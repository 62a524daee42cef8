//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all client settings.
//! Configuration is loaded from a TOML file; `JUSPREDICT_API_URL` in the
//! environment (or a `.env` file) overrides the backend URL.
//!
//! # Example
//!
//! ```no_run
//! use juspredict::infrastructure::config::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("config.toml")?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use url::Url;

use super::logging::LoggingConfig;
use crate::error::{ConfigError, Result};

/// Environment variable overriding [`ApiConfig::base_url`].
pub const API_URL_ENV: &str = "JUSPREDICT_API_URL";

pub const DEFAULT_API_URL: &str = "https://api.predictyourgame.com";

/// Backend connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL every endpoint path is appended to.
    pub base_url: String,
    /// Request timeout in milliseconds.
    pub timeout_ms: u64,
    /// Connect timeout in milliseconds.
    pub connect_timeout_ms: u64,
    /// Attempts for read requests. Order mutations always send once.
    pub retry_max_attempts: u32,
    /// Backoff between retries in milliseconds.
    pub retry_backoff_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.into(),
            timeout_ms: 10_000,
            connect_timeout_ms: 5_000,
            retry_max_attempts: 1,
            retry_backoff_ms: 500,
        }
    }
}

/// Refresh intervals for polled views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PollingConfig {
    /// Live prediction feed.
    pub live_feed_secs: u64,
    /// The other prediction tabs.
    pub tab_secs: u64,
}

impl PollingConfig {
    #[must_use]
    pub const fn live_feed(&self) -> Duration {
        Duration::from_secs(self.live_feed_secs)
    }

    #[must_use]
    pub const fn tab(&self) -> Duration {
        Duration::from_secs(self.tab_secs)
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            live_feed_secs: 30,
            tab_secs: 120,
        }
    }
}

/// Where the session (token and cached profile) is persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Session file. Defaults to `session.json` next to the config file.
    pub session_path: Option<PathBuf>,
}

/// Main client configuration.
///
/// Every section is optional; an empty file yields the defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub polling: PollingConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Parse configuration from TOML content and apply the environment
    /// override.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is malformed or validation fails.
    #[allow(clippy::result_large_err)]
    pub fn parse_toml(content: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is malformed or fails
    /// validation.
    #[allow(clippy::result_large_err)]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Load the file when it exists, otherwise start from defaults.
    ///
    /// # Errors
    ///
    /// Same as [`Config::load`] for an existing file; defaults are still
    /// validated after the environment override.
    #[allow(clippy::result_large_err)]
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            return Self::load(path);
        }
        Self::parse_toml("")
    }

    fn apply_env(&mut self) {
        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                self.api.base_url = url.trim().to_string();
            }
        }
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for an empty or unparsable base URL, zero
    /// poll intervals or zero retry attempts.
    #[allow(clippy::result_large_err)]
    pub fn validate(&self) -> Result<()> {
        if self.api.base_url.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "api.base_url",
            }
            .into());
        }
        let url = Url::parse(&self.api.base_url).map_err(|e| ConfigError::InvalidValue {
            field: "api.base_url",
            reason: e.to_string(),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidValue {
                field: "api.base_url",
                reason: format!("unsupported scheme {}", url.scheme()),
            }
            .into());
        }
        if self.api.retry_max_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                field: "api.retry_max_attempts",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.polling.live_feed_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "polling.live_feed_secs",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.polling.tab_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "polling.tab_secs",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// Initialize logging from the `[logging]` section.
    pub fn init_logging(&self) {
        self.logging.init();
    }
}
