//! Event catalog: event cards, event detail and question views.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use tracing::{debug, error, warn};

use crate::application::order::OrderAction;
use crate::application::prediction::GroupedPredictions;
use crate::application::session::SessionStore;
use crate::domain::format::{
    clamp_percent, countdown_label, result_prediction, start_label, team_image_url, team_name,
    team_tag, TeamBadge,
};
use crate::domain::{
    Event, EventDetail, EventId, ListView, Prediction, Question, QuestionId, TimeInForce,
};
use crate::error::{DomainError, Result, ValidationError};
use crate::port::{EventQuery, TradingGateway};

/// A team as drawn on an event card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamView {
    pub name: String,
    pub tag: String,
    pub image_url: Option<String>,
}

impl TeamView {
    fn from_value(team: &serde_json::Value) -> Self {
        let name = team_name(team);
        Self {
            tag: team_tag(&name),
            name,
            image_url: team_image_url(team),
        }
    }

    /// Badge to draw; the placeholder when the image is absent or failed.
    #[must_use]
    pub fn badge(&self, load_failed: bool) -> TeamBadge {
        TeamBadge::resolve(self.image_url.clone(), load_failed)
    }
}

/// Card projection of an event in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventCard {
    pub event_id: EventId,
    pub name: String,
    pub status: Option<String>,
    pub teams: Vec<TeamView>,
    /// Win probability for the first and second team, in `[0, 100]`.
    pub win_probability: (Decimal, Decimal),
    pub start: String,
    pub countdown: String,
}

impl EventCard {
    #[must_use]
    pub fn from_event(event: &Event, now: DateTime<Utc>) -> Self {
        Self {
            event_id: event.id.clone(),
            name: event.display_name(),
            status: event.status.clone(),
            teams: event.teams().iter().map(TeamView::from_value).collect(),
            win_probability: result_prediction(event.stats.as_deref()),
            start: start_label(event.start_date),
            countdown: countdown_label(event.start_date, event.status.as_deref(), now),
        }
    }

    /// Bar widths in percent of the full bar, one per side.
    #[must_use]
    pub fn bar_widths(&self) -> (Decimal, Decimal) {
        (
            clamp_percent(self.win_probability.0),
            clamp_percent(self.win_probability.1),
        )
    }

    /// Team name for side `index`, or the default when the event lists fewer
    /// teams.
    #[must_use]
    pub fn team_name(&self, index: usize) -> String {
        self.teams
            .get(index)
            .map_or_else(|| team_name(&serde_json::Value::Null), |t| t.name.clone())
    }
}

/// One market outcome of a question.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutcomeRow {
    pub outcome: String,
    /// Implied probability to one decimal place.
    pub probability: Option<Decimal>,
    pub bar_width: Decimal,
    /// The signed-in user predicted this outcome.
    pub chosen: bool,
}

/// Question detail with market data and the user's own prediction.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionView {
    pub event_id: EventId,
    pub question_id: QuestionId,
    pub title: String,
    /// Volume in whole dollars.
    pub volume: Decimal,
    pub traders: u64,
    pub probability_text: Option<String>,
    pub outcomes: Vec<OutcomeRow>,
    pub my_prediction: Option<Prediction>,
    /// The order action the user's prediction state offers; `None` once
    /// settled or when the status is unknown.
    pub action: Option<OrderAction>,
}

impl QuestionView {
    #[must_use]
    pub fn build(event_id: &EventId, question: &Question, mine: Option<Prediction>) -> Self {
        let chosen = mine
            .as_ref()
            .and_then(|p| p.predicted_outcome.as_deref())
            .map(str::trim)
            .unwrap_or_default();
        let activity = question.activity.clone().unwrap_or_default();
        let outcomes = activity
            .market_data_details
            .iter()
            .map(|detail| {
                let probability = detail.implied_probability.map(|p| {
                    clamp_percent(p).round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
                });
                OutcomeRow {
                    outcome: detail.outcome.clone(),
                    probability,
                    bar_width: probability.unwrap_or_default(),
                    chosen: !chosen.is_empty() && detail.outcome.trim() == chosen,
                }
            })
            .collect();

        let action = OrderAction::for_prediction(mine.as_ref()).unwrap_or_else(|err| {
            error!(question_id = %question.question_id, error = %err, "No action for prediction");
            None
        });

        Self {
            event_id: event_id.clone(),
            question_id: question.question_id.clone(),
            title: question.title().to_string(),
            volume: activity
                .question_volume
                .unwrap_or_default()
                .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero),
            traders: activity.question_users.unwrap_or_default(),
            probability_text: activity.question_probability,
            outcomes,
            my_prediction: mine,
            action,
        }
    }
}

/// Tab filter over an event's questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionTab {
    /// A prediction list view applied to the question rows.
    View(ListView),
    /// Every question except the selected one.
    Others,
}

impl QuestionTab {
    /// Filter used when loading the user's predictions for this tab.
    #[must_use]
    pub const fn time_in_force(self) -> TimeInForce {
        match self {
            Self::View(view) => view.time_in_force(),
            Self::Others => TimeInForce::Upcoming,
        }
    }

    fn admits(self, row: &QuestionRow, selected: Option<&QuestionId>) -> bool {
        match self {
            Self::Others => selected != Some(&row.question.question_id),
            Self::View(ListView::All) => true,
            Self::View(view) => {
                let status = row.prediction.as_ref().and_then(|p| p.status().ok().flatten());
                status.is_some() && view.admits(status)
            }
        }
    }
}

impl Default for QuestionTab {
    fn default() -> Self {
        Self::View(ListView::All)
    }
}

impl fmt::Display for QuestionTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::View(view) => fmt::Display::fmt(view, f),
            Self::Others => f.write_str("Others"),
        }
    }
}

impl FromStr for QuestionTab {
    type Err = DomainError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("others") {
            return Ok(Self::Others);
        }
        s.parse().map(Self::View)
    }
}

/// A question paired with one of the user's predictions on it, if any.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionRow {
    pub question: Question,
    pub prediction: Option<Prediction>,
}

/// Expand questions into rows (one per prediction, or one bare row when the
/// user has none) and keep the rows `tab` admits.
#[must_use]
pub fn question_rows(
    questions: &[Question],
    grouped: &GroupedPredictions,
    tab: QuestionTab,
    selected: Option<&QuestionId>,
) -> Vec<QuestionRow> {
    questions
        .iter()
        .flat_map(|question| {
            let preds = grouped.get(&question.question_id).unwrap_or_default();
            if preds.is_empty() {
                vec![QuestionRow {
                    question: question.clone(),
                    prediction: None,
                }]
            } else {
                preds
                    .iter()
                    .map(|p| QuestionRow {
                        question: question.clone(),
                        prediction: Some(p.clone()),
                    })
                    .collect()
            }
        })
        .filter(|row| tab.admits(row, selected))
        .collect()
}

/// Event listing and detail use cases.
pub struct EventCatalog {
    gateway: Arc<dyn TradingGateway>,
    session: Arc<SessionStore>,
}

impl EventCatalog {
    pub fn new(gateway: Arc<dyn TradingGateway>, session: Arc<SessionStore>) -> Self {
        Self { gateway, session }
    }

    pub async fn cards(&self, query: &EventQuery, now: DateTime<Utc>) -> Result<Vec<EventCard>> {
        let events = self.gateway.list_events(query).await?;
        debug!(count = events.len(), "Listed events");
        Ok(events.iter().map(|e| EventCard::from_event(e, now)).collect())
    }

    pub async fn event(&self, event_id: &EventId) -> Result<EventDetail> {
        self.gateway.get_event(event_id).await
    }

    /// Question detail. `question_id` of `None` picks the latest question.
    ///
    /// The user's prediction is looked up when signed in; a failed lookup
    /// leaves it empty.
    pub async fn question(
        &self,
        event_id: &EventId,
        question_id: Option<&QuestionId>,
    ) -> Result<QuestionView> {
        let question = self.find_question(event_id, question_id).await?;
        let mine = if self.session.is_logged_in() {
            self.my_prediction(&question.question_id).await
        } else {
            None
        };
        Ok(QuestionView::build(event_id, &question, mine))
    }

    /// One question of an event; `None` picks the latest.
    pub async fn find_question(
        &self,
        event_id: &EventId,
        question_id: Option<&QuestionId>,
    ) -> Result<Question> {
        let detail = self.gateway.get_event(event_id).await?;
        match question_id {
            Some(id) => detail.question(id),
            None => detail.latest_question(),
        }
        .cloned()
        .ok_or_else(|| {
            ValidationError::Invalid(format!("Question not found on event {event_id}")).into()
        })
    }

    /// The user's prediction on a question, by the single-result lookup.
    pub async fn my_prediction(&self, question_id: &QuestionId) -> Option<Prediction> {
        match self
            .gateway
            .predictions_by_question(question_id, TimeInForce::Upcoming)
            .await
        {
            Ok(preds) => preds.into_iter().next(),
            Err(err) => {
                warn!(question_id = %question_id, error = %err, "Prediction lookup failed");
                None
            }
        }
    }
}
