//! Clan use cases.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::clan::normalize_emails;
use crate::domain::{ClanDetail, ClanSummary, GroupId, Invite, NewClan};
use crate::error::{Error, Result, ValidationError};
use crate::port::ClanGateway;

use super::session::SessionStore;

pub struct ClanService {
    gateway: Arc<dyn ClanGateway>,
    session: Arc<SessionStore>,
}

impl ClanService {
    pub fn new(gateway: Arc<dyn ClanGateway>, session: Arc<SessionStore>) -> Self {
        Self { gateway, session }
    }

    /// The user's clans, optionally narrowed by a case-insensitive search.
    pub async fn list(&self, search: Option<&str>) -> Result<Vec<ClanSummary>> {
        self.require_login()?;
        let clans = self.gateway.list_clans().await?;
        Ok(match search {
            Some(needle) => clans.into_iter().filter(|c| c.matches(needle)).collect(),
            None => clans,
        })
    }

    pub async fn detail(&self, group_id: &GroupId) -> Result<ClanDetail> {
        self.require_login()?;
        self.gateway.clan_detail(group_id).await
    }

    pub async fn create(&self, name: &str, alias: Option<&str>) -> Result<GroupId> {
        self.require_login()?;
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::Invalid("Enter a clan name".into()).into());
        }
        let clan = NewClan {
            name: name.to_string(),
            alias: alias.map(str::trim).filter(|a| !a.is_empty()).map(str::to_string),
        };
        let group_id = self.gateway.create_clan(&clan).await?;
        info!(group_id = %group_id, name, "Clan created");
        Ok(group_id)
    }

    /// Invite every address in a free-form list. Returns the invites sent.
    pub async fn invite(
        &self,
        group_id: &GroupId,
        group_name: Option<&str>,
        raw_emails: &str,
    ) -> Result<Vec<Invite>> {
        self.require_login()?;
        let emails = parse_emails(raw_emails)?;
        let invites: Vec<Invite> = emails.iter().map(|e| Invite::for_email(e)).collect();
        self.gateway
            .invite_members(group_id, group_name, &invites)
            .await?;
        info!(group_id = %group_id, count = invites.len(), "Invites sent");
        Ok(invites)
    }

    /// Cancel pending invites for every address in a free-form list, one
    /// request per address, stopping at the first failure.
    ///
    /// A failure after some cancellations went through is reported as
    /// [`Error::PartialCancel`] naming the addresses already cancelled.
    pub async fn cancel_invites(&self, group_id: &GroupId, raw_emails: &str) -> Result<Vec<String>> {
        self.require_login()?;
        let emails = parse_emails(raw_emails)?;
        let mut cancelled = Vec::with_capacity(emails.len());
        for email in &emails {
            if let Err(err) = self.gateway.cancel_invite(group_id, email).await {
                warn!(group_id = %group_id, email = %email, cancelled = ?cancelled, error = %err, "Invite cancellation failed");
                if cancelled.is_empty() {
                    return Err(err);
                }
                return Err(Error::PartialCancel {
                    cancelled,
                    failed: email.clone(),
                    source: Box::new(err),
                });
            }
            cancelled.push(email.clone());
        }
        info!(group_id = %group_id, count = cancelled.len(), "Invitations cancelled");
        Ok(cancelled)
    }

    fn require_login(&self) -> Result<()> {
        if self.session.is_logged_in() {
            Ok(())
        } else {
            Err(ValidationError::NotLoggedIn.into())
        }
    }
}

fn parse_emails(raw: &str) -> Result<Vec<String>> {
    let emails = normalize_emails(raw);
    if emails.is_empty() {
        return Err(ValidationError::Invalid("Enter at least one email".into()).into());
    }
    if let Some(bad) = emails.iter().find(|e| !looks_like_email(e)) {
        return Err(ValidationError::Invalid(format!("Not an email address: {bad}")).into());
    }
    Ok(emails)
}

fn looks_like_email(candidate: &str) -> bool {
    match candidate.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.contains('@'),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_list_validation() {
        assert_eq!(parse_emails("a@x.com; B@y.org").unwrap(), vec!["a@x.com", "b@y.org"]);
        assert!(parse_emails(" , ;").is_err());
        assert!(parse_emails("a@x.com, nope").is_err());
        assert!(!looks_like_email("@x.com"));
        assert!(!looks_like_email("a@b@c.com"));
    }
}
