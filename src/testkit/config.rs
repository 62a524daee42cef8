//! Canonical test configurations.
//!
//! Single source of truth for config structs used across tests.

use std::path::PathBuf;

use crate::infrastructure::config::{Config, PollingConfig};

/// Defaults pointed at a local backend, with the session at `session_path`.
pub fn local(session_path: PathBuf) -> Config {
    let mut config = Config::default();
    config.api.base_url = "http://127.0.0.1:9".to_string();
    config.storage.session_path = Some(session_path);
    config
}

/// One-second polling on every tab.
pub fn fast_polling() -> PollingConfig {
    PollingConfig {
        live_feed_secs: 1,
        tab_secs: 1,
    }
}
