//! Sports events, their prediction questions and market data.

use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;

use super::id::{EventId, QuestionId};

/// Nested `sportEvent` block some list responses carry instead of top-level
/// name and team fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SportEvent {
    pub name: Option<String>,
    pub event_name: Option<String>,
    pub sport_type: Option<String>,
    pub event_format: Option<String>,
    pub teams: Vec<Value>,
}

/// A sports event as returned by the event endpoints.
///
/// Team entries stay as raw JSON because their field names vary between
/// responses; [`crate::domain::format`] normalizes them for display.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: EventId,
    pub name: Option<String>,
    pub event_name: Option<String>,
    pub description: Option<String>,
    /// Start time in unix seconds.
    pub start_date: Option<i64>,
    pub status: Option<String>,
    pub teams: Vec<Value>,
    /// JSON-encoded stats blob. Holds the `result_prediction` pair.
    pub stats: Option<String>,
    pub sport_event: Option<SportEvent>,
}

impl Event {
    /// Display name, preferring explicit names over the sport/format fallback.
    #[must_use]
    pub fn display_name(&self) -> String {
        let sport = self.sport_event.as_ref();
        let explicit = [
            self.name.as_deref(),
            self.event_name.as_deref(),
            sport.and_then(|s| s.name.as_deref()),
            sport.and_then(|s| s.event_name.as_deref()),
        ]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|name| !name.is_empty());

        if let Some(name) = explicit {
            return name.to_string();
        }

        sport
            .map(|s| {
                [
                    s.sport_type
                        .as_deref()
                        .map(|t| t.replace("SPORT_TYPE_", "")),
                    s.event_format.clone(),
                ]
                .into_iter()
                .flatten()
                .filter(|part| !part.is_empty())
                .collect::<Vec<_>>()
                .join(" • ")
            })
            .unwrap_or_default()
    }

    /// Teams from the top level, falling back to the nested sport event.
    #[must_use]
    pub fn teams(&self) -> &[Value] {
        if !self.teams.is_empty() {
            return &self.teams;
        }
        self.sport_event
            .as_ref()
            .map(|s| s.teams.as_slice())
            .unwrap_or_default()
    }
}

/// One outcome row of a question's market data.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketDataDetail {
    pub outcome: String,
    /// Percentage in `[0, 100]` when the backend sent a parsable value.
    pub implied_probability: Option<Decimal>,
}

/// Trading activity attached to a question.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionActivity {
    pub question_volume: Option<Decimal>,
    pub question_users: Option<u64>,
    /// Free text such as "62% likely".
    pub question_probability: Option<String>,
    pub market_data_details: Vec<MarketDataDetail>,
}

/// A prediction question on an event.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub question_id: QuestionId,
    pub name: String,
    pub description: Option<String>,
    pub activity: Option<QuestionActivity>,
}

impl Question {
    /// Title shown for the question: description, then name.
    #[must_use]
    pub fn title(&self) -> &str {
        self.description
            .as_deref()
            .filter(|d| !d.trim().is_empty())
            .unwrap_or(&self.name)
    }

    /// Market data row for the given outcome label.
    #[must_use]
    pub fn outcome(&self, outcome: &str) -> Option<&MarketDataDetail> {
        self.activity
            .as_ref()?
            .market_data_details
            .iter()
            .find(|detail| detail.outcome.trim() == outcome.trim())
    }
}

/// Event detail together with its questions.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EventDetail {
    pub event: Event,
    pub questions: Vec<Question>,
}

impl EventDetail {
    /// The most recently added question (last in the list).
    #[must_use]
    pub fn latest_question(&self) -> Option<&Question> {
        self.questions.last()
    }

    #[must_use]
    pub fn question(&self, id: &QuestionId) -> Option<&Question> {
        self.questions.iter().find(|q| &q.question_id == id)
    }
}
