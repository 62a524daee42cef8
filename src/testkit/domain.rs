//! Builders for domain records used across tests.
//!
//! Short factory functions for events, questions, predictions and login
//! grants so tests focus on assertions rather than construction.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde_json::json;

use crate::adapter::outbound::storage::MemoryStorage;
use crate::application::SessionStore;
use crate::domain::{
    Event, EventDetail, LoginGrant, MarketDataDetail, Prediction, Question, QuestionActivity,
    UserProfile,
};

/// An event between two teams with the given win probabilities.
pub fn event(id: &str, teams: (&str, &str), odds: (u32, u32)) -> Event {
    Event {
        id: id.into(),
        name: Some(format!("{} vs {}", teams.0, teams.1)),
        teams: vec![json!({ "name": teams.0 }), json!({ "name": teams.1 })],
        stats: Some(
            json!({
                "result_prediction": [{ "value": odds.0 }, { "value": odds.1 }]
            })
            .to_string(),
        ),
        status: Some("EVENT_STATUS_UPCOMING".to_string()),
        ..Event::default()
    }
}

/// A question with one market row per `(outcome, implied probability)`.
pub fn question(id: &str, outcomes: &[(&str, Decimal)]) -> Question {
    Question {
        question_id: id.into(),
        name: format!("Question {id}"),
        description: None,
        activity: Some(QuestionActivity {
            question_volume: Some(Decimal::from(1000)),
            question_users: Some(12),
            question_probability: None,
            market_data_details: outcomes
                .iter()
                .map(|(outcome, p)| MarketDataDetail {
                    outcome: (*outcome).to_string(),
                    implied_probability: Some(*p),
                })
                .collect(),
        }),
    }
}

/// Event detail holding `questions`.
pub fn detail(event: Event, questions: Vec<Question>) -> EventDetail {
    EventDetail { event, questions }
}

/// A prediction with the given status label and order id.
pub fn prediction(id: &str, question_id: &str, event_id: &str, status: &str) -> Prediction {
    Prediction {
        prediction_id: id.into(),
        question_id: question_id.into(),
        event_id: event_id.into(),
        question: Some(format!("Question {question_id}")),
        predicted_outcome: Some("Yes".to_string()),
        prediction_status: status.to_string(),
        investment_amt: Some(Decimal::from(10)),
        percentage: Some(Decimal::from(60)),
        order_id: Some(format!("order-{id}").into()),
        ..Prediction::default()
    }
}

/// A login grant for `token` with a named profile.
pub fn grant(token: &str) -> LoginGrant {
    LoginGrant {
        token: token.to_string(),
        refresh_token: Some(format!("{token}-refresh")),
        token_expiry: Some("1767225600".to_string()),
        profile: Some(UserProfile {
            email: Some("fan@example.com".to_string()),
            first_name: Some("Sam".to_string()),
            last_name: Some("Fan".to_string()),
            ..UserProfile::default()
        }),
    }
}

/// A session over in-memory storage, signed in when `token` is given.
pub fn session(token: Option<&str>) -> (Arc<MemoryStorage>, Arc<SessionStore>) {
    let storage = Arc::new(MemoryStorage::new());
    let session = Arc::new(SessionStore::new(storage.clone()));
    if let Some(token) = token {
        if let Err(err) = session.save_login(&grant(token)) {
            panic!("in-memory login failed: {err}");
        }
    }
    (storage, session)
}
