//! Login, logout and account use cases.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::{FaqEntry, ProfileEdit, Reward, UserInfo, UserProfile};
use crate::error::{Result, ValidationError};
use crate::port::AccountGateway;

use super::session::SessionStore;

/// Account flows that read or write the session.
pub struct AccountService {
    gateway: Arc<dyn AccountGateway>,
    session: Arc<SessionStore>,
}

impl AccountService {
    pub fn new(gateway: Arc<dyn AccountGateway>, session: Arc<SessionStore>) -> Self {
        Self { gateway, session }
    }

    #[must_use]
    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    /// Sign in and persist the returned credentials.
    ///
    /// Empty inputs are rejected before any request is made.
    pub async fn login(&self, email: &str, password: &str) -> Result<Option<UserProfile>> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(ValidationError::MissingCredentials.into());
        }

        let grant = self.gateway.login(email, password).await?;
        self.session.save_login(&grant)?;
        info!(email, "Logged in");
        Ok(grant.profile)
    }

    /// Sign out. A backend failure is logged and the local session is
    /// cleared regardless.
    pub async fn logout(&self) -> Result<()> {
        if self.session.is_logged_in() {
            if let Err(err) = self.gateway.logout().await {
                warn!(error = %err, "Logout request failed, clearing session anyway");
            }
        }
        self.session.clear()?;
        info!("Logged out");
        Ok(())
    }

    pub async fn user_info(&self) -> Result<UserInfo> {
        self.require_login()?;
        self.gateway.user_info().await
    }

    /// Apply an edit on top of the current info and save it.
    ///
    /// The cached profile is updated so observers see the new name.
    pub async fn edit_profile(&self, edit: &ProfileEdit) -> Result<UserInfo> {
        self.require_login()?;
        if edit.is_empty() {
            return Err(ValidationError::Invalid("Nothing to update".into()).into());
        }

        let current = self.gateway.user_info().await?;
        let updated = edit.apply(current);
        self.gateway.edit_user_info(&updated).await?;

        let mut profile = self.session.profile().unwrap_or_default();
        profile.user_name = Some(updated.username.clone()).filter(|s| !s.is_empty());
        profile.first_name = Some(updated.first_name.clone()).filter(|s| !s.is_empty());
        profile.last_name = Some(updated.last_name.clone()).filter(|s| !s.is_empty());
        if profile.email.is_none() && !updated.email.is_empty() {
            profile.email = Some(updated.email.clone());
        }
        self.session.set_profile(&profile)?;

        info!(username = %updated.username, "Profile updated");
        Ok(updated)
    }

    pub async fn rewards(&self) -> Result<Vec<Reward>> {
        self.require_login()?;
        self.gateway.rewards().await
    }

    /// FAQ entries. Available without a login.
    pub async fn faq(&self) -> Result<Vec<FaqEntry>> {
        self.gateway.faq().await
    }

    fn require_login(&self) -> Result<()> {
        if self.session.is_logged_in() {
            Ok(())
        } else {
            Err(ValidationError::NotLoggedIn.into())
        }
    }
}
