//! Polled prediction list for one view.
//!
//! One feed replaces the per-tab list components: the [`ListView`] picks
//! the time-in-force filter and the row labels, the feed owns the
//! loading/error/data flags observers render from.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, warn};

use super::group::{GroupedPredictions, PredictionGrouper};
use super::poller::{PollHandle, Poller};
use crate::domain::format::{
    clamp_percent, matched_text, percent_text, round_percent, starts_in_label, UNPARSABLE_PERCENT,
};
use crate::domain::{EventId, ListView, Prediction, PredictionId, PredictionStatus};

/// What an observer renders for a feed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedState {
    /// True while a fetch is outstanding.
    pub loading: bool,
    /// Set when the last fetch failed. The data is empty in that case.
    pub error: Option<String>,
    pub data: GroupedPredictions,
    pub updated_at: Option<DateTime<Utc>>,
}

impl FeedState {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Display projection of one prediction in a list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionRow {
    pub prediction_id: PredictionId,
    pub event_id: EventId,
    pub title: String,
    pub outcome: String,
    pub description: Option<String>,
    pub starts_in: String,
    pub question: String,
    pub status: Option<PredictionStatus>,
    pub status_text: String,
    pub predicted_outcome: String,
    pub percent: String,
    pub matched_amt: Decimal,
    pub matched: String,
    /// Only matched predictions offer an exit from the list.
    pub can_exit: bool,
}

impl PredictionRow {
    /// Project a prediction for `view`. Unknown statuses are logged and
    /// shown by their raw label.
    #[must_use]
    pub fn project(
        view: ListView,
        prediction: &Prediction,
        grouped: &GroupedPredictions,
        now: DateTime<Utc>,
    ) -> Self {
        let status = prediction.status().unwrap_or_else(|err| {
            warn!(prediction_id = %prediction.prediction_id, error = %err, "Unrecognized status in list");
            None
        });
        let status_text = match status {
            Some(_) => view.badge(status),
            None if prediction.prediction_status.trim().is_empty() => view.badge(None),
            None => prediction
                .prediction_status
                .trim_start_matches("PREDICTION_STATUS_")
                .to_lowercase(),
        };

        let title = grouped
            .event(&prediction.event_id)
            .map(|detail| detail.event.display_name())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| format!("Event {}", prediction.event_id));

        let percent = prediction
            .percentage
            .or(prediction.exit_percentage)
            .map_or_else(
                || UNPARSABLE_PERCENT.to_string(),
                |pct| percent_text(round_percent(clamp_percent(pct))),
            );

        Self {
            prediction_id: prediction.prediction_id.clone(),
            event_id: prediction.event_id.clone(),
            title,
            outcome: prediction
                .event_short_name
                .clone()
                .or_else(|| prediction.predicted_outcome.clone())
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| "--".to_string()),
            description: prediction.event_description.clone(),
            starts_in: starts_in_label(prediction.event_start_date.as_deref(), now),
            question: prediction
                .question
                .clone()
                .filter(|q| !q.trim().is_empty())
                .unwrap_or_else(|| "Prediction".to_string()),
            status,
            status_text,
            predicted_outcome: prediction.predicted_outcome.clone().unwrap_or_default(),
            percent,
            matched_amt: prediction.matched_amt.unwrap_or_default(),
            matched: matched_text(prediction.matched_amt, prediction.investment_amt),
            can_exit: status == Some(PredictionStatus::Matched),
        }
    }
}

/// A polled, observable prediction list.
pub struct PredictionFeed {
    grouper: Arc<PredictionGrouper>,
    view: ListView,
    event_filter: Option<EventId>,
    state: watch::Sender<FeedState>,
}

impl PredictionFeed {
    pub fn new(grouper: Arc<PredictionGrouper>, view: ListView) -> Self {
        let (state, _) = watch::channel(FeedState {
            loading: true,
            ..FeedState::default()
        });
        Self {
            grouper,
            view,
            event_filter: None,
            state,
        }
    }

    /// Restrict the feed to one event's predictions.
    #[must_use]
    pub fn with_event(mut self, event_id: EventId) -> Self {
        self.event_filter = Some(event_id);
        self
    }

    #[must_use]
    pub const fn view(&self) -> ListView {
        self.view
    }

    #[must_use]
    pub fn event_filter(&self) -> Option<&EventId> {
        self.event_filter.as_ref()
    }

    #[must_use]
    pub fn state(&self) -> FeedState {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<FeedState> {
        self.state.subscribe()
    }

    /// Fetch once and publish the result.
    pub async fn refresh(&self) {
        self.state.send_modify(|state| state.loading = true);
        let result = self.load().await;
        self.apply(result);
    }

    /// Rows for the current data, in group order.
    #[must_use]
    pub fn rows(&self, now: DateTime<Utc>) -> Vec<PredictionRow> {
        let state = self.state.borrow();
        state
            .data
            .predictions()
            .map(|p| PredictionRow::project(self.view, p, &state.data, now))
            .collect()
    }

    /// Start polling at the poller's interval. Results arriving after the
    /// handle is dropped are discarded.
    ///
    /// Only applied results touch the published state, so nothing changes
    /// after teardown.
    pub fn start(self: &Arc<Self>, poller: &Poller) -> PollHandle {
        let fetcher = Arc::clone(self);
        let sink = Arc::clone(self);
        poller.spawn(
            move || {
                let feed = Arc::clone(&fetcher);
                async move { feed.load().await }
            },
            move |result| sink.apply(result),
        )
    }

    async fn load(&self) -> Result<GroupedPredictions, String> {
        self.grouper
            .try_fetch_grouped(self.view.time_in_force(), self.event_filter.as_ref())
            .await
            .map_err(|err| err.to_string())
    }

    fn apply(&self, result: Result<GroupedPredictions, String>) {
        let next = match result {
            Ok(data) => {
                debug!(view = %self.view, questions = data.len(), "Feed updated");
                FeedState {
                    loading: false,
                    error: None,
                    data,
                    updated_at: Some(Utc::now()),
                }
            }
            Err(error) => {
                warn!(view = %self.view, %error, "Feed refresh failed");
                FeedState {
                    loading: false,
                    error: Some(error),
                    data: GroupedPredictions::default(),
                    updated_at: Some(Utc::now()),
                }
            }
        };
        self.state.send_replace(next);
    }
}
