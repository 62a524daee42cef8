//! Terminal front end: argument parsing, command dispatch and rendering.

pub mod account;
pub mod auth;
pub mod clan;
pub mod command;
pub mod config;
pub mod diagnostic;
pub mod event;
pub mod order;
pub mod output;
pub mod paths;
pub mod prediction;

use std::path::Path;

use tracing::debug;

use crate::application::OrderAction;
use crate::error::{Error, Result};
use crate::infrastructure::bootstrap::App;
use crate::infrastructure::config::Config;
use command::{Cli, ColorChoice, Commands, ConfigCommand};
use diagnostic::{ConfigDiagnostic, RequestDiagnostic};
use output::OutputConfig;

/// Run a parsed command line and return the process exit code.
pub async fn run(cli: Cli) -> i32 {
    output::configure(OutputConfig::new(cli.json, cli.quiet, cli.verbose));
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {}
    }

    let config_path = cli.config.clone();
    match dispatch(cli).await {
        Ok(()) => 0,
        Err(err) => {
            report(&err, &config_path);
            1
        }
    }
}

async fn dispatch(cli: Cli) -> Result<()> {
    if let Commands::Config(command) = &cli.command {
        return match command {
            ConfigCommand::Show => config::execute_show(&cli.config),
            ConfigCommand::Validate => config::execute_validate(&cli.config),
        };
    }

    let config = Config::load_or_default(&cli.config)?;
    config.logging.init_with_verbosity(cli.verbose);
    debug!(config = %cli.config.display(), "Configuration loaded");
    let app = App::build(config, &paths::session_for(&cli.config));

    match cli.command {
        Commands::Login(args) => auth::execute_login(&app, args).await,
        Commands::Logout => auth::execute_logout(&app).await,
        Commands::Whoami => {
            auth::execute_whoami(&app);
            Ok(())
        }
        Commands::Profile(command) => account::execute_profile(&app, command).await,
        Commands::Rewards => account::execute_rewards(&app).await,
        Commands::Balance => account::execute_balance(&app).await,
        Commands::Faq => account::execute_faq(&app).await,
        Commands::Events(args) => event::execute_events(&app, args).await,
        Commands::Event(args) => event::execute_event(&app, args).await,
        Commands::Question(args) => event::execute_question(&app, args).await,
        Commands::Predictions(args) => prediction::execute(&app, args).await,
        Commands::Predict(args) => order::execute_predict(&app, args).await,
        Commands::Cancel(args) => order::execute_target(&app, args, OrderAction::Cancel).await,
        Commands::Exit(args) => order::execute_target(&app, args, OrderAction::Exit).await,
        Commands::Clan(command) => clan::execute(&app, command).await,
        Commands::Config(_) => Ok(()),
    }
}

fn report(err: &Error, config_path: &Path) {
    if output::is_json() {
        output::error(&err.to_string());
        return;
    }
    match err {
        Error::Config(config_err) => {
            let diagnostic = ConfigDiagnostic::from_error(config_err, config_path);
            eprintln!("{:?}", miette::Report::new(diagnostic));
        }
        Error::Validation(_) | Error::Domain(_) => output::error(&err.to_string()),
        _ => {
            let diagnostic = RequestDiagnostic::from_error(err);
            eprintln!("{:?}", miette::Report::new(diagnostic));
        }
    }
}
