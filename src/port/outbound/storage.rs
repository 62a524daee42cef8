//! Persisted client state port.

use crate::error::Result;

/// String key/value storage that survives restarts.
///
/// Reads never fail: unreadable state is reported as absent.
pub trait KeyValueStorage: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&self, key: &str, value: &str) -> Result<()>;

    fn remove(&self, key: &str) -> Result<()>;
}
