//! Command-line interface definitions.
//!
//! Defines the CLI structure for the juspredict terminal client using
//! `clap`: account commands, event browsing, prediction lists and the
//! order actions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;

use super::paths;
use crate::application::QuestionTab;
use crate::domain::{CompletedPeriod, EventId, GroupId, ListView, QuestionId};

/// Terminal client for the JusPredict sports prediction backend
#[derive(Parser, Debug)]
#[command(name = "juspredict")]
#[command(version)]
pub struct Cli {
    /// Color output mode [auto, always, never]
    #[arg(
        long,
        global = true,
        default_value = "auto",
        hide_possible_values = true
    )]
    pub color: ColorChoice,

    /// JSON output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Decrease output verbosity
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase output verbosity
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to the configuration file
    #[arg(short, long, global = true, default_value_os_t = paths::default_config())]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

/// Color output mode for terminal rendering.
#[derive(Clone, Debug, Default, clap::ValueEnum)]
pub enum ColorChoice {
    /// Detect automatically
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sign in and store the session token
    Login(LoginArgs),

    /// Sign out and clear the stored session
    Logout,

    /// Show who is signed in
    Whoami,

    /// View or edit the account profile
    #[command(subcommand)]
    Profile(ProfileCommand),

    /// Show reward multipliers
    Rewards,

    /// Show the available balance
    Balance,

    /// Show frequently asked questions
    Faq,

    /// List sports events
    Events(EventsArgs),

    /// Show one event with its questions
    Event(EventArgs),

    /// Show one question with its market data
    Question(QuestionArgs),

    /// List your predictions
    Predictions(PredictionsArgs),

    /// Place a prediction
    Predict(PredictArgs),

    /// Cancel an accepted prediction
    Cancel(OrderTargetArgs),

    /// Exit a matched prediction early
    Exit(OrderTargetArgs),

    /// Manage clans
    #[command(subcommand)]
    Clan(ClanCommand),

    /// Inspect configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Account email (prompted when omitted)
    #[arg(long)]
    pub email: Option<String>,

    /// Password (prompted when omitted)
    #[arg(long)]
    pub password: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum ProfileCommand {
    /// Show account details
    Show,
    /// Change name fields
    Edit(ProfileEditArgs),
}

#[derive(Args, Debug)]
pub struct ProfileEditArgs {
    #[arg(long)]
    pub username: Option<String>,

    #[arg(long)]
    pub first_name: Option<String>,

    #[arg(long)]
    pub last_name: Option<String>,
}

#[derive(Args, Debug)]
pub struct EventsArgs {
    /// Page number
    #[arg(long, default_value = "1")]
    pub page: u32,

    /// Events per page
    #[arg(long, default_value = "50")]
    pub page_size: u32,

    /// Event status filter; repeat for several (defaults to upcoming, active and completed)
    #[arg(long = "status")]
    pub statuses: Vec<String>,

    /// Event hierarchy filter
    #[arg(long)]
    pub hierarchy: Option<String>,
}

#[derive(Args, Debug)]
pub struct EventArgs {
    pub event_id: EventId,

    /// Question tab: all, others, live, open, completed, cancelled, exited
    #[arg(long, default_value = "all")]
    pub tab: QuestionTab,

    /// Selected question, used by the `others` tab
    #[arg(long)]
    pub question: Option<QuestionId>,
}

#[derive(Args, Debug)]
pub struct QuestionArgs {
    pub event_id: EventId,

    /// Question id (defaults to the latest question)
    pub question_id: Option<QuestionId>,
}

#[derive(Args, Debug)]
pub struct PredictionsArgs {
    /// List view: all, live, open, completed, cancelled, exited
    #[arg(default_value = "all")]
    pub view: ListView,

    /// Period for the completed view: today, yesterday, lastweek, thismonth, lastmonth, alltime
    #[arg(long)]
    pub period: Option<CompletedPeriod>,

    /// Only predictions on this event
    #[arg(long)]
    pub event: Option<EventId>,

    /// Keep refreshing until interrupted
    #[arg(long)]
    pub watch: bool,
}

impl PredictionsArgs {
    /// The view with `--period` applied to the completed list.
    #[must_use]
    pub fn resolved_view(&self) -> ListView {
        match (self.view, self.period) {
            (ListView::Completed(_), Some(period)) => ListView::Completed(period),
            (view, _) => view,
        }
    }
}

#[derive(Args, Debug)]
pub struct PredictArgs {
    pub event_id: EventId,

    /// Question id (defaults to the latest question)
    #[arg(long)]
    pub question: Option<QuestionId>,

    /// Outcome to predict
    #[arg(long)]
    pub outcome: String,

    /// Amount to stake
    #[arg(long)]
    pub amount: Decimal,

    /// Confidence percentage (defaults to the outcome's implied probability)
    #[arg(long)]
    pub confidence: Option<Decimal>,
}

#[derive(Args, Debug)]
pub struct OrderTargetArgs {
    pub event_id: EventId,

    /// Question id (defaults to the latest question)
    #[arg(long)]
    pub question: Option<QuestionId>,
}

#[derive(Subcommand, Debug)]
pub enum ClanCommand {
    /// List your clans
    List {
        /// Filter by name, alias or top performer
        #[arg(long)]
        search: Option<String>,
    },
    /// Show members and pending invites
    Show { group_id: GroupId },
    /// Create a clan
    Create {
        name: String,
        #[arg(long)]
        alias: Option<String>,
    },
    /// Invite members by email
    Invite {
        group_id: GroupId,
        /// Clan name shown in the invitation
        #[arg(long)]
        name: Option<String>,
        /// Emails; an argument may also hold a comma or semicolon separated list
        #[arg(required = true)]
        emails: Vec<String>,
    },
    /// Withdraw pending invitations
    CancelInvite {
        group_id: GroupId,
        #[arg(required = true)]
        emails: Vec<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Display the effective configuration with defaults applied.
    Show,
    /// Validate the configuration file.
    Validate,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn cli_has_version() {
        assert!(Cli::command().get_version().is_some());
    }

    #[test]
    fn parse_global_flags() {
        let cli = Cli::try_parse_from(["juspredict", "-vv", "--json", "--color", "never", "faq"])
            .unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(cli.json);
        assert!(matches!(cli.color, ColorChoice::Never));
        assert!(matches!(cli.command, Commands::Faq));
    }

    #[test]
    fn predictions_view_and_period() {
        let cli = Cli::try_parse_from([
            "juspredict",
            "predictions",
            "completed",
            "--period",
            "lastweek",
            "--watch",
        ])
        .unwrap();
        let Commands::Predictions(args) = cli.command else {
            panic!("expected predictions");
        };
        assert!(args.watch);
        assert_eq!(
            args.resolved_view(),
            ListView::Completed(CompletedPeriod::LastWeek)
        );
    }

    #[test]
    fn period_ignored_outside_completed() {
        let cli =
            Cli::try_parse_from(["juspredict", "predictions", "live", "--period", "today"]).unwrap();
        let Commands::Predictions(args) = cli.command else {
            panic!("expected predictions");
        };
        assert_eq!(args.resolved_view(), ListView::Live);
    }

    #[test]
    fn rejects_unknown_view() {
        assert!(Cli::try_parse_from(["juspredict", "predictions", "weekly"]).is_err());
    }

    #[test]
    fn predict_requires_outcome_and_amount() {
        assert!(Cli::try_parse_from(["juspredict", "predict", "e1", "--outcome", "Yes"]).is_err());
        let cli = Cli::try_parse_from([
            "juspredict", "predict", "e1", "--outcome", "Yes", "--amount", "25.5",
        ])
        .unwrap();
        let Commands::Predict(args) = cli.command else {
            panic!("expected predict");
        };
        assert_eq!(args.amount, Decimal::new(255, 1));
        assert_eq!(args.event_id.as_str(), "e1");
    }

    #[test]
    fn event_tab_parses_others() {
        let cli = Cli::try_parse_from(["juspredict", "event", "e1", "--tab", "others"]).unwrap();
        let Commands::Event(args) = cli.command else {
            panic!("expected event");
        };
        assert_eq!(args.tab, QuestionTab::Others);
    }
}
