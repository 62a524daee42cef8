//! Handler for `predictions`.

use chrono::Utc;
use serde_json::json;
use tabled::Tabled;
use tracing::debug;

use crate::adapter::inbound::cli::command::PredictionsArgs;
use crate::adapter::inbound::cli::output;
use crate::application::prediction::PredictionRow;
use crate::application::PredictionFeed;
use crate::domain::format::format_currency;
use crate::domain::ListView;
use crate::error::{Result, ValidationError};
use crate::infrastructure::bootstrap::App;

#[derive(Tabled)]
struct FeedRow {
    #[tabled(rename = "Event")]
    title: String,
    #[tabled(rename = "Question")]
    question: String,
    #[tabled(rename = "Pick")]
    pick: String,
    #[tabled(rename = "Conf.")]
    percent: String,
    #[tabled(rename = "Matched")]
    matched: String,
    #[tabled(rename = "Starts")]
    starts_in: String,
    #[tabled(rename = "Status")]
    status: String,
}

impl From<&PredictionRow> for FeedRow {
    fn from(row: &PredictionRow) -> Self {
        let status = if row.can_exit {
            output::positive(&row.status_text)
        } else {
            row.status_text.clone()
        };
        Self {
            title: row.title.clone(),
            question: row.question.clone(),
            pick: row.predicted_outcome.clone(),
            percent: row.percent.clone(),
            matched: if row.matched_amt.is_zero() {
                row.matched.clone()
            } else {
                format_currency(row.matched_amt)
            },
            starts_in: row.starts_in.clone(),
            status,
        }
    }
}

/// Execute `predictions`; with `--watch` the list is redrawn on every poll
/// until Ctrl-C.
pub async fn execute(app: &App, args: PredictionsArgs) -> Result<()> {
    if !app.session().is_logged_in() {
        return Err(ValidationError::NotLoggedIn.into());
    }

    let view = args.resolved_view();
    let feed = app.feed(view, args.event.clone());

    if !args.watch {
        let pb = output::spinner("Loading predictions...");
        feed.refresh().await;
        if feed.state().error.is_some() {
            output::spinner_fail(&pb);
        } else {
            output::spinner_success(&pb, "Loaded");
        }
        render(&feed, view);
        return Ok(());
    }

    let poller = app.poller(&feed);
    let handle = feed.start(&poller);
    let mut rx = feed.subscribe();
    output::note(&format!(
        "Refreshing every {}s, Ctrl-C to stop",
        poller.interval().as_secs()
    ));

    loop {
        tokio::select! {
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
                if rx.borrow_and_update().loading {
                    continue;
                }
                render(&feed, view);
            }
            _ = tokio::signal::ctrl_c() => {
                debug!("Interrupted, stopping prediction watch");
                break;
            }
        }
    }

    handle.deactivate();
    Ok(())
}

fn render(feed: &PredictionFeed, view: ListView) {
    let state = feed.state();
    let rows = feed.rows(Utc::now());

    if output::is_json() {
        output::json_output(json!({
            "command": "predictions",
            "view": view.title(),
            "updated_at": state.updated_at,
            "error": state.error,
            "predictions": rows,
        }));
        return;
    }

    output::section(&format!("{} predictions", view.title()));
    if let Some(error) = state.error.as_deref() {
        output::warning(error);
        return;
    }
    if rows.is_empty() {
        output::note(view.empty_message());
        return;
    }
    output::table(rows.iter().map(FeedRow::from));
    if let Some(at) = state.updated_at {
        output::note(&format!("Updated {}", at.format("%H:%M:%S")));
    }
}
