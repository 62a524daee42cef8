//! Clans: user-created social groups.

use rust_decimal::Decimal;
use serde::Serialize;

use super::id::GroupId;

/// One row of the clan list.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClanSummary {
    pub group_id: Option<GroupId>,
    pub name: String,
    pub alias: Option<String>,
    pub top_first_name: Option<String>,
    pub top_last_name: Option<String>,
    pub top_total_earnings: Decimal,
    pub last_activity: Option<String>,
}

impl ClanSummary {
    /// Top performer's full name; empty when the clan has none yet.
    #[must_use]
    pub fn top_performer(&self) -> String {
        [self.top_first_name.as_deref(), self.top_last_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Case-insensitive match over name, alias and top performer.
    #[must_use]
    pub fn matches(&self, search: &str) -> bool {
        let needle = search.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        [
            self.name.as_str(),
            self.alias.as_deref().unwrap_or_default(),
            self.top_performer().as_str(),
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
    }
}

/// A clan member as listed in the clan detail.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClanMember {
    pub user_id: Option<String>,
    pub name: String,
    pub email: Option<String>,
    pub total_earnings: Decimal,
}

/// Clan detail with its members and pending invites.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClanDetail {
    pub summary: ClanSummary,
    pub members: Vec<ClanMember>,
    pub pending_invites: Vec<String>,
}

/// Request to create a clan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewClan {
    pub name: String,
    pub alias: Option<String>,
}

/// One invitation to send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Invite {
    pub invitee_email: String,
    pub invitee_name: String,
}

impl Invite {
    #[must_use]
    pub fn for_email(email: &str) -> Self {
        Self {
            invitee_email: email.to_string(),
            invitee_name: invitee_name(email),
        }
    }
}

/// Split a free-form list of emails on newlines, commas and semicolons.
///
/// Entries are trimmed and lowercased; blanks are dropped.
#[must_use]
pub fn normalize_emails(raw: &str) -> Vec<String> {
    raw.split(['\n', ',', ';'])
        .map(|entry| entry.trim().to_lowercase())
        .filter(|entry| !entry.is_empty())
        .collect()
}

/// Friendly name from an email's local part: `"jane.doe@x"` → `"jane doe"`.
#[must_use]
pub fn invitee_name(email: &str) -> String {
    let local = email.split('@').next().unwrap_or_default();
    let pretty = local
        .split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    if pretty.is_empty() {
        "Player".to_string()
    } else {
        pretty
    }
}
