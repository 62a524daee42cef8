//! Handlers for the account commands: `profile`, `rewards`, `balance` and
//! `faq`.

use serde_json::json;
use tabled::Tabled;

use crate::adapter::inbound::cli::command::{ProfileCommand, ProfileEditArgs};
use crate::adapter::inbound::cli::output;
use crate::domain::format::format_currency;
use crate::domain::{ProfileEdit, Reward, UserInfo};
use crate::error::Result;
use crate::infrastructure::bootstrap::App;

#[derive(Tabled)]
struct RewardRow {
    #[tabled(rename = "Reward")]
    category: &'static str,
    #[tabled(rename = "Base")]
    base: String,
    #[tabled(rename = "Multiplier")]
    multiplier: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Last rewarded")]
    last: String,
}

impl From<&Reward> for RewardRow {
    fn from(reward: &Reward) -> Self {
        Self {
            category: reward.category.label(),
            base: format_currency(reward.base_amt),
            multiplier: format!("x{}", reward.multiplier.normalize()),
            amount: format_currency(reward.amount()),
            last: reward
                .last_rewarded_at
                .clone()
                .unwrap_or_else(|| "--".into()),
        }
    }
}

/// Execute a `profile` subcommand.
pub async fn execute_profile(app: &App, command: ProfileCommand) -> Result<()> {
    match command {
        ProfileCommand::Show => {
            let info = app.account().user_info().await?;
            render_profile(&info, "profile show");
        }
        ProfileCommand::Edit(args) => {
            let info = app.account().edit_profile(&profile_edit(args)).await?;
            output::success("Profile updated");
            render_profile(&info, "profile edit");
        }
    }
    Ok(())
}

fn profile_edit(args: ProfileEditArgs) -> ProfileEdit {
    ProfileEdit {
        username: args.username,
        first_name: args.first_name,
        last_name: args.last_name,
    }
}

fn render_profile(info: &UserInfo, command: &str) {
    if output::is_json() {
        output::json_output(json!({
            "command": command,
            "profile": info,
        }));
        return;
    }

    output::section("Profile");
    output::field("Username", &info.username);
    output::field("Email", &info.email);
    output::field(
        "Name",
        format!("{} {}", info.first_name, info.last_name).trim(),
    );
    if let Some(dob) = info.date_of_birth {
        output::field(
            "Born",
            format!("{:04}-{:02}-{:02}", dob.year, dob.month, dob.day),
        );
    }
    if !info.user_status.is_empty() {
        output::field("Status", output::muted(&info.user_status));
    }
}

/// Execute `rewards`.
pub async fn execute_rewards(app: &App) -> Result<()> {
    let rewards = app.account().rewards().await?;

    if output::is_json() {
        output::json_output(json!({
            "command": "rewards",
            "rewards": rewards,
        }));
        return Ok(());
    }

    output::section("Rewards");
    if rewards.is_empty() {
        output::note("No rewards yet");
        return Ok(());
    }
    output::table(rewards.iter().map(RewardRow::from));
    Ok(())
}

/// Execute `balance`.
pub async fn execute_balance(app: &App) -> Result<()> {
    let balance = app.balances().available().await?;

    if output::is_json() {
        output::json_output(json!({
            "command": "balance",
            "balance": balance,
        }));
        return Ok(());
    }

    output::field(
        "Available",
        output::positive(format_currency(balance.available_balance)),
    );
    Ok(())
}

/// Execute `faq`.
pub async fn execute_faq(app: &App) -> Result<()> {
    let entries = app.account().faq().await?;

    if output::is_json() {
        output::json_output(json!({
            "command": "faq",
            "faqs": entries,
        }));
        return Ok(());
    }

    output::section("Frequently Asked Questions");
    if entries.is_empty() {
        output::note("Nothing here yet");
        return Ok(());
    }
    for entry in &entries {
        output::section(&entry.question);
        output::lines(&entry.answer);
    }
    Ok(())
}
