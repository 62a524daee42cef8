//! Handler for the `config` command group.

use std::path::Path;

use serde_json::json;

use crate::adapter::inbound::cli::output;
use crate::error::Result;
use crate::infrastructure::config::{Config, API_URL_ENV};

/// Execute `config show`. A missing file shows the defaults.
pub fn execute_show(path: &Path) -> Result<()> {
    let config = Config::load_or_default(path)?;
    let source = if path.exists() {
        path.display().to_string()
    } else {
        "(defaults)".to_string()
    };

    if output::is_json() {
        output::json_output(json!({
            "command": "config show",
            "source": source,
            "api": {
                "base_url": config.api.base_url,
                "timeout_ms": config.api.timeout_ms,
                "connect_timeout_ms": config.api.connect_timeout_ms,
                "retry_max_attempts": config.api.retry_max_attempts,
                "retry_backoff_ms": config.api.retry_backoff_ms,
            },
            "polling": {
                "live_feed_secs": config.polling.live_feed_secs,
                "tab_secs": config.polling.tab_secs,
            },
            "storage": {
                "session_path": config.storage.session_path.as_ref().map(|p| p.display().to_string()),
            },
            "logging": {
                "level": config.logging.level,
                "format": config.logging.format,
            },
        }));
        return Ok(());
    }

    output::section("Effective Configuration");
    output::field("Source", source);

    output::section("API");
    output::field("Base URL", &config.api.base_url);
    if std::env::var(API_URL_ENV).is_ok_and(|v| !v.trim().is_empty()) {
        output::hint(&format!("base URL overridden by {API_URL_ENV}"));
    }
    output::field("Timeout", format!("{}ms", config.api.timeout_ms));
    output::field("Connect", format!("{}ms", config.api.connect_timeout_ms));
    output::field(
        "Retries",
        format!(
            "{} attempt(s), {}ms backoff",
            config.api.retry_max_attempts, config.api.retry_backoff_ms
        ),
    );

    output::section("Polling");
    output::field("Live feed", format!("{}s", config.polling.live_feed_secs));
    output::field("Other tabs", format!("{}s", config.polling.tab_secs));

    output::section("Storage");
    output::field(
        "Session",
        config
            .storage
            .session_path
            .as_ref()
            .map_or_else(|| "(next to config)".into(), |p| p.display().to_string()),
    );

    output::section("Logging");
    output::field("Level", &config.logging.level);
    output::field("Format", &config.logging.format);
    Ok(())
}

/// Execute `config validate`. The file must exist.
pub fn execute_validate(path: &Path) -> Result<()> {
    Config::load(path)?;

    if output::is_json() {
        output::json_output(json!({
            "command": "config validate",
            "path": path.display().to_string(),
            "valid": true,
        }));
        return Ok(());
    }

    output::success("Configuration valid");
    output::field("Path", path.display());
    Ok(())
}
