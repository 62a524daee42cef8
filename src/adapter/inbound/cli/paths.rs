//! Path utilities for juspredict.
//!
//! All client state lives under `~/.juspredict/`:
//! - `~/.juspredict/config.toml` - configuration
//! - `~/.juspredict/session.json` - auth token and cached profile

use std::path::{Path, PathBuf};

const SESSION_FILE: &str = "session.json";

/// Returns the juspredict home directory (`~/.juspredict/`).
pub fn home_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".juspredict")
}

/// Returns the default config file path (`~/.juspredict/config.toml`).
pub fn default_config() -> PathBuf {
    home_dir().join("config.toml")
}

/// Session file kept next to the config file in use.
pub fn session_for(config_path: &Path) -> PathBuf {
    config_path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .map_or_else(|| PathBuf::from(SESSION_FILE), |dir| dir.join(SESSION_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_are_under_juspredict_home() {
        assert!(home_dir().to_string_lossy().contains(".juspredict"));
        assert!(default_config().to_string_lossy().contains(".juspredict"));
    }

    #[test]
    fn session_sits_next_to_config() {
        assert_eq!(
            session_for(Path::new("/tmp/x/config.toml")),
            PathBuf::from("/tmp/x/session.json")
        );
        assert_eq!(session_for(Path::new("config.toml")), PathBuf::from("session.json"));
    }
}
