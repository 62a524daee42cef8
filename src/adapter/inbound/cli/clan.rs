//! Handler for the `clan` command group.

use serde_json::json;
use tabled::Tabled;

use crate::adapter::inbound::cli::command::ClanCommand;
use crate::adapter::inbound::cli::output;
use crate::domain::format::format_currency;
use crate::domain::{ClanMember, ClanSummary};
use crate::error::Result;
use crate::infrastructure::bootstrap::App;

#[derive(Tabled)]
struct ClanRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Clan")]
    name: String,
    #[tabled(rename = "Alias")]
    alias: String,
    #[tabled(rename = "Top performer")]
    top: String,
    #[tabled(rename = "Earnings")]
    earnings: String,
}

impl From<&ClanSummary> for ClanRow {
    fn from(clan: &ClanSummary) -> Self {
        let top = clan.top_performer();
        Self {
            id: clan
                .group_id
                .as_ref()
                .map_or_else(|| "--".into(), ToString::to_string),
            name: clan.name.clone(),
            alias: clan.alias.clone().unwrap_or_default(),
            top: if top.is_empty() { "--".into() } else { top },
            earnings: format_currency(clan.top_total_earnings),
        }
    }
}

#[derive(Tabled)]
struct MemberRow {
    #[tabled(rename = "Member")]
    name: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Earnings")]
    earnings: String,
}

impl From<&ClanMember> for MemberRow {
    fn from(member: &ClanMember) -> Self {
        Self {
            name: member.name.clone(),
            email: member.email.clone().unwrap_or_default(),
            earnings: format_currency(member.total_earnings),
        }
    }
}

/// Execute a `clan` subcommand.
pub async fn execute(app: &App, command: ClanCommand) -> Result<()> {
    let clans = app.clans();
    match command {
        ClanCommand::List { search } => {
            let list = clans.list(search.as_deref()).await?;
            if output::is_json() {
                output::json_output(json!({ "command": "clan list", "clans": list }));
                return Ok(());
            }
            output::section("Clans");
            if list.is_empty() {
                output::note("No clans found");
            } else {
                output::table(list.iter().map(ClanRow::from));
            }
        }
        ClanCommand::Show { group_id } => {
            let detail = clans.detail(&group_id).await?;
            if output::is_json() {
                output::json_output(json!({ "command": "clan show", "clan": detail }));
                return Ok(());
            }
            output::section(&detail.summary.name);
            if let Some(alias) = detail.summary.alias.as_deref() {
                output::field("Alias", alias);
            }
            output::field("Members", detail.members.len());
            if !detail.members.is_empty() {
                output::table(detail.members.iter().map(MemberRow::from));
            }
            if !detail.pending_invites.is_empty() {
                output::section("Pending invites");
                for email in &detail.pending_invites {
                    output::note(email);
                }
            }
        }
        ClanCommand::Create { name, alias } => {
            let group_id = clans.create(&name, alias.as_deref()).await?;
            if output::is_json() {
                output::json_output(json!({
                    "command": "clan create",
                    "group_id": group_id,
                    "name": name,
                }));
                return Ok(());
            }
            output::success(&format!("Created clan {name}"));
            output::field("ID", group_id);
        }
        ClanCommand::Invite {
            group_id,
            name,
            emails,
        } => {
            let invites = clans
                .invite(&group_id, name.as_deref(), &emails.join(","))
                .await?;
            if output::is_json() {
                output::json_output(json!({ "command": "clan invite", "invites": invites }));
                return Ok(());
            }
            output::success(&format!("Sent {} invite(s)", invites.len()));
            for invite in &invites {
                output::field(&invite.invitee_name, &invite.invitee_email);
            }
        }
        ClanCommand::CancelInvite { group_id, emails } => {
            let cancelled = clans.cancel_invites(&group_id, &emails.join(",")).await?;
            if output::is_json() {
                output::json_output(json!({
                    "command": "clan cancel-invite",
                    "cancelled": cancelled,
                }));
                return Ok(());
            }
            output::success(&format!("Cancelled {} invite(s)", cancelled.len()));
        }
    }
    Ok(())
}
