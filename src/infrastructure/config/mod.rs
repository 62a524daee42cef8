//! Configuration: TOML settings and logging setup.

pub mod logging;
pub mod settings;

pub use logging::LoggingConfig;
pub use settings::{ApiConfig, Config, PollingConfig, StorageConfig, API_URL_ENV, DEFAULT_API_URL};
