//! Observable session store.
//!
//! Wraps the persisted key/value storage that holds the auth token and the
//! cached profile. Every write publishes a fresh [`AuthState`] so in-process
//! observers (the header line of a watch view, for instance) react without
//! polling storage.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, warn};

use crate::domain::{LoginGrant, UserProfile};
use crate::error::Result;
use crate::port::KeyValueStorage;

pub const AUTH_TOKEN_KEY: &str = "auth_token";
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";
pub const TOKEN_EXPIRY_KEY: &str = "token_expiry";
pub const USER_PROFILE_KEY: &str = "user_profile";

/// Every key the session owns. Logout clears all of them.
pub const SESSION_KEYS: [&str; 4] = [
    AUTH_TOKEN_KEY,
    REFRESH_TOKEN_KEY,
    TOKEN_EXPIRY_KEY,
    USER_PROFILE_KEY,
];

/// Login state as seen by observers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthState {
    pub logged_in: bool,
    pub profile: Option<UserProfile>,
}

/// Persisted auth values plus a broadcast of their current state.
pub struct SessionStore {
    storage: Arc<dyn KeyValueStorage>,
    state: watch::Sender<AuthState>,
}

impl SessionStore {
    /// Build the store and infer the boot state from what is persisted.
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        let initial = read_state(storage.as_ref());
        debug!(logged_in = initial.logged_in, "Session restored");
        let (state, _) = watch::channel(initial);
        Self { storage, state }
    }

    /// Bearer token, if one is stored and non-blank.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        stored_token(self.storage.as_ref())
    }

    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        self.token().is_some()
    }

    #[must_use]
    pub fn profile(&self) -> Option<UserProfile> {
        stored_profile(self.storage.as_ref())
    }

    #[must_use]
    pub fn refresh_token(&self) -> Option<String> {
        self.storage.get(REFRESH_TOKEN_KEY)
    }

    #[must_use]
    pub fn token_expiry(&self) -> Option<String> {
        self.storage.get(TOKEN_EXPIRY_KEY)
    }

    /// Current state snapshot.
    #[must_use]
    pub fn state(&self) -> AuthState {
        self.state.borrow().clone()
    }

    /// Subscribe to state changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    /// Persist a successful login and notify observers.
    ///
    /// A failed write discards the partial session, so a login that did not
    /// reach storage leaves the store logged out.
    pub fn save_login(&self, grant: &LoginGrant) -> Result<()> {
        let result = self.write_login(grant);
        if let Err(err) = &result {
            warn!(error = %err, "Failed to persist login, discarding partial session");
            for key in SESSION_KEYS {
                let _ = self.storage.remove(key);
            }
        }
        self.publish();
        result
    }

    fn write_login(&self, grant: &LoginGrant) -> Result<()> {
        self.storage.set(AUTH_TOKEN_KEY, &grant.token)?;
        if let Some(refresh) = &grant.refresh_token {
            self.storage.set(REFRESH_TOKEN_KEY, refresh)?;
        }
        if let Some(expiry) = &grant.token_expiry {
            self.storage.set(TOKEN_EXPIRY_KEY, expiry)?;
        }
        if let Some(profile) = &grant.profile {
            self.storage
                .set(USER_PROFILE_KEY, &serde_json::to_string(profile)?)?;
        }
        Ok(())
    }

    /// Replace the cached profile and notify observers.
    pub fn set_profile(&self, profile: &UserProfile) -> Result<()> {
        let result = serde_json::to_string(profile)
            .map_err(Into::into)
            .and_then(|json| self.storage.set(USER_PROFILE_KEY, &json));
        self.publish();
        result
    }

    /// Remove every session key and publish the logged-out state.
    ///
    /// All keys are attempted even if one removal fails; the first failure
    /// is returned.
    pub fn clear(&self) -> Result<()> {
        let mut first_err = None;
        for key in SESSION_KEYS {
            if let Err(err) = self.storage.remove(key) {
                warn!(key, error = %err, "Failed to remove session key");
                first_err.get_or_insert(err);
            }
        }
        self.publish();
        first_err.map_or(Ok(()), Err)
    }

    fn publish(&self) {
        let next = read_state(self.storage.as_ref());
        debug!(logged_in = next.logged_in, "Session changed");
        self.state.send_replace(next);
    }
}

fn stored_token(storage: &dyn KeyValueStorage) -> Option<String> {
    storage
        .get(AUTH_TOKEN_KEY)
        .filter(|token| !token.trim().is_empty())
}

fn stored_profile(storage: &dyn KeyValueStorage) -> Option<UserProfile> {
    let raw = storage.get(USER_PROFILE_KEY)?;
    serde_json::from_str(&raw)
        .map_err(|err| warn!(error = %err, "Cached profile unreadable"))
        .ok()
}

fn read_state(storage: &dyn KeyValueStorage) -> AuthState {
    AuthState {
        logged_in: stored_token(storage).is_some(),
        profile: stored_profile(storage),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::outbound::storage::MemoryStorage;

    fn grant() -> LoginGrant {
        LoginGrant {
            token: "tok".into(),
            refresh_token: Some("ref".into()),
            token_expiry: Some("2030-01-01T00:00:00Z".into()),
            profile: Some(UserProfile {
                email: Some("a@b.c".into()),
                ..UserProfile::default()
            }),
        }
    }

    #[test]
    fn boot_state_reads_storage() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(AUTH_TOKEN_KEY, "tok").unwrap();
        let session = SessionStore::new(storage);
        assert!(session.state().logged_in);
        assert_eq!(session.token().as_deref(), Some("tok"));
    }

    #[test]
    fn blank_token_is_logged_out() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(AUTH_TOKEN_KEY, "  ").unwrap();
        let session = SessionStore::new(storage);
        assert!(!session.is_logged_in());
        assert_eq!(session.token(), None);
    }

    #[test]
    fn save_and_clear_publish() {
        let storage = Arc::new(MemoryStorage::new());
        let session = SessionStore::new(storage.clone());
        let mut rx = session.subscribe();

        session.save_login(&grant()).unwrap();
        assert!(rx.has_changed().unwrap());
        let state = rx.borrow_and_update().clone();
        assert!(state.logged_in);
        assert_eq!(state.profile.unwrap().email.as_deref(), Some("a@b.c"));
        assert_eq!(storage.len(), 4);

        session.clear().unwrap();
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), AuthState::default());
        assert!(storage.is_empty());
    }

    #[test]
    fn corrupt_profile_is_ignored() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(USER_PROFILE_KEY, "{oops").unwrap();
        let session = SessionStore::new(storage);
        assert_eq!(session.profile(), None);
    }
}
