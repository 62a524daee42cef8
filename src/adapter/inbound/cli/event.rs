//! Handlers for `events`, `event` and `question`.

use chrono::Utc;
use serde_json::json;
use tabled::Tabled;

use crate::adapter::inbound::cli::command::{EventArgs, EventsArgs, QuestionArgs};
use crate::adapter::inbound::cli::output;
use crate::application::event::question_rows;
use crate::application::{EventCard, OrderAction, QuestionRow, QuestionView};
use crate::domain::format::{format_currency, percent_text};
use crate::domain::view::status_text;
use crate::error::Result;
use crate::infrastructure::bootstrap::App;
use crate::port::EventQuery;

const STATUS_PREFIX: &str = "EVENT_STATUS_";

#[derive(Tabled)]
struct EventRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Event")]
    name: String,
    #[tabled(rename = "Starts")]
    start: String,
    #[tabled(rename = "")]
    countdown: String,
    #[tabled(rename = "Win %")]
    odds: String,
}

impl From<&EventCard> for EventRow {
    fn from(card: &EventCard) -> Self {
        let (first, second) = card.win_probability;
        Self {
            id: card.event_id.to_string(),
            name: card.name.clone(),
            start: card.start.clone(),
            countdown: card.countdown.clone(),
            odds: format!(
                "{} {} / {} {}",
                card.teams.first().map_or("--", |t| t.tag.as_str()),
                percent_text(first),
                card.teams.get(1).map_or("--", |t| t.tag.as_str()),
                percent_text(second),
            ),
        }
    }
}

#[derive(Tabled)]
struct QuestionTableRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Question")]
    title: String,
    #[tabled(rename = "Volume")]
    volume: String,
    #[tabled(rename = "Your pick")]
    pick: String,
    #[tabled(rename = "Status")]
    status: String,
}

impl From<&QuestionRow> for QuestionTableRow {
    fn from(row: &QuestionRow) -> Self {
        let volume = row
            .question
            .activity
            .as_ref()
            .and_then(|a| a.question_volume)
            .unwrap_or_default();
        let prediction = row.prediction.as_ref();
        Self {
            id: row.question.question_id.to_string(),
            title: row.question.title().to_string(),
            volume: format_currency(volume),
            pick: prediction
                .and_then(|p| p.predicted_outcome.clone())
                .unwrap_or_else(|| "--".into()),
            status: prediction
                .and_then(|p| p.status().ok().flatten())
                .map_or_else(|| "--".into(), status_text),
        }
    }
}

fn event_query(args: &EventsArgs) -> EventQuery {
    let mut query = EventQuery {
        page_number: args.page.max(1),
        page_size: args.page_size.max(1),
        event_hierarchy: args.hierarchy.clone(),
        ..EventQuery::default()
    };
    if !args.statuses.is_empty() {
        query.statuses = args
            .statuses
            .iter()
            .map(|s| {
                let upper = s.trim().to_uppercase();
                if upper.starts_with(STATUS_PREFIX) {
                    upper
                } else {
                    format!("{STATUS_PREFIX}{upper}")
                }
            })
            .collect();
    }
    query
}

/// Execute `events`.
pub async fn execute_events(app: &App, args: EventsArgs) -> Result<()> {
    let query = event_query(&args);
    let pb = output::spinner("Loading events...");
    let cards = match app.catalog().cards(&query, Utc::now()).await {
        Ok(cards) => cards,
        Err(err) => {
            output::spinner_fail(&pb);
            return Err(err);
        }
    };
    output::spinner_success(&pb, &format!("{} events", cards.len()));

    if output::is_json() {
        output::json_output(json!({
            "command": "events",
            "page": query.page_number,
            "events": cards,
        }));
        return Ok(());
    }

    if cards.is_empty() {
        output::note("No events found");
        return Ok(());
    }
    output::table(cards.iter().map(EventRow::from));
    Ok(())
}

/// Execute `event`: the event card and its questions filtered by tab.
pub async fn execute_event(app: &App, args: EventArgs) -> Result<()> {
    let detail = app.catalog().event(&args.event_id).await?;
    let grouped = app
        .grouper()
        .fetch_grouped(args.tab.time_in_force(), Some(&args.event_id))
        .await;
    let rows = question_rows(
        &detail.questions,
        &grouped,
        args.tab,
        args.question.as_ref(),
    );
    let card = EventCard::from_event(&detail.event, Utc::now());

    if output::is_json() {
        output::json_output(json!({
            "command": "event",
            "event": card,
            "tab": args.tab.to_string(),
            "questions": rows,
        }));
        return Ok(());
    }

    render_card(&card);
    if let Some(description) = detail.event.description.as_deref() {
        output::note(description);
    }

    output::section(&format!("Questions ({})", args.tab));
    if rows.is_empty() {
        output::note("No questions in this tab");
        return Ok(());
    }
    output::table(rows.iter().map(QuestionTableRow::from));
    Ok(())
}

fn render_card(card: &EventCard) {
    output::section(&card.name);
    output::field("Starts", &card.start);
    if !card.countdown.is_empty() {
        output::field("", output::highlight(&card.countdown));
    }
    let (left, right) = card.bar_widths();
    output::field(
        &card.team_name(0),
        format!("{} {}", output::bar(left), percent_text(left)),
    );
    output::field(
        &card.team_name(1),
        format!("{} {}", output::bar(right), percent_text(right)),
    );
}

/// Execute `question`: market data and the user's prediction.
pub async fn execute_question(app: &App, args: QuestionArgs) -> Result<()> {
    let view = app
        .catalog()
        .question(&args.event_id, args.question_id.as_ref())
        .await?;

    if output::is_json() {
        output::json_output(json!({
            "command": "question",
            "question": view,
        }));
        return Ok(());
    }

    render_question(&view);
    Ok(())
}

pub(super) fn render_question(view: &QuestionView) {
    output::section(&view.title);
    output::field("Question", &view.question_id);
    output::field("Volume", format_currency(view.volume));
    output::field("Traders", view.traders);
    if let Some(text) = view.probability_text.as_deref() {
        output::field("Probability", text);
    }

    output::section("Outcomes");
    for row in &view.outcomes {
        let pct = row
            .probability
            .map_or_else(|| "--".into(), |p| format!("{}%", p.normalize()));
        let label = if row.chosen {
            output::highlight(format!("{} *", row.outcome))
        } else {
            row.outcome.clone()
        };
        output::field(&label, format!("{} {}", output::bar(row.bar_width), pct));
    }

    if let Some(mine) = &view.my_prediction {
        output::section("Your prediction");
        output::field(
            "Outcome",
            mine.predicted_outcome.as_deref().unwrap_or("--"),
        );
        if let Some(amount) = mine.investment_amt {
            output::field("Stake", format_currency(amount));
        }
        let status = mine
            .status()
            .ok()
            .flatten()
            .map_or_else(|| mine.prediction_status.clone(), status_text);
        output::field("Status", status);
    }
    output::field("Action", output::highlight(action_text(view)));
}

/// The one button the question offers, or "None" when nothing can be done.
fn action_text(view: &QuestionView) -> &'static str {
    view.action.map_or("None", OrderAction::label)
}
