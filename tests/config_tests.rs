//! Loading configuration files from disk.

use std::fs;

use juspredict::error::{ConfigError, Error};
use juspredict::infrastructure::config::{Config, DEFAULT_API_URL};

#[test]
fn load_reads_every_section() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        r#"
[api]
timeout_ms = 4000
retry_max_attempts = 3

[polling]
live_feed_secs = 15

[storage]
session_path = "/tmp/juspredict-session.json"

[logging]
level = "debug"
format = "json"
"#,
    )
    .unwrap();

    let config = Config::load(&path).unwrap();

    assert_eq!(config.api.timeout_ms, 4000);
    assert_eq!(config.api.retry_max_attempts, 3);
    assert_eq!(config.polling.live_feed_secs, 15);
    assert_eq!(config.polling.tab_secs, 120);
    assert_eq!(
        config.storage.session_path.as_deref(),
        Some(std::path::Path::new("/tmp/juspredict-session.json"))
    );
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.logging.format, "json");
}

#[test]
fn missing_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::load_or_default(dir.path().join("absent.toml")).unwrap();

    assert_eq!(config.polling, Config::default().polling);
    assert!(config.api.base_url.starts_with("http"));
}

#[test]
fn load_requires_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = Config::load(dir.path().join("absent.toml")).unwrap_err();

    assert!(matches!(err, Error::Config(ConfigError::ReadFile(_))));
}

#[test]
fn malformed_toml_is_a_parse_error() {
    let err = Config::parse_toml("[api\nbase_url = ").unwrap_err();

    assert!(matches!(err, Error::Config(ConfigError::Parse(_))));
}

#[test]
fn zero_poll_interval_is_rejected() {
    let err = Config::parse_toml("[polling]\nlive_feed_secs = 0\n").unwrap_err();

    assert!(matches!(
        err,
        Error::Config(ConfigError::InvalidValue {
            field: "polling.live_feed_secs",
            ..
        })
    ));
}

#[test]
fn default_url_points_at_the_public_backend() {
    assert!(DEFAULT_API_URL.starts_with("https://"));
}
