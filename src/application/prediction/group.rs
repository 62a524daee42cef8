//! Fetch-and-group: the user's predictions keyed by question.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use futures_util::future::join_all;
use tracing::{debug, warn};

use crate::application::session::SessionStore;
use crate::domain::{EventDetail, EventId, Prediction, QuestionId, TimeInForce};
use crate::error::Result;
use crate::port::TradingGateway;

/// Predictions grouped by question in first-seen order, together with the
/// events they reference.
///
/// Event details are only as fresh as the fetch that built this value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupedPredictions {
    order: Vec<QuestionId>,
    groups: HashMap<QuestionId, Vec<Prediction>>,
    events: HashMap<EventId, EventDetail>,
}

impl GroupedPredictions {
    /// Group predictions by question id. Predictions with a blank question
    /// id are dropped.
    #[must_use]
    pub fn from_predictions(
        predictions: impl IntoIterator<Item = Prediction>,
        events: HashMap<EventId, EventDetail>,
    ) -> Self {
        let mut order = Vec::new();
        let mut groups: HashMap<QuestionId, Vec<Prediction>> = HashMap::new();
        for prediction in predictions {
            if prediction.question_id.is_empty() {
                continue;
            }
            let qid = prediction.question_id.clone();
            groups
                .entry(qid.clone())
                .or_insert_with(|| {
                    order.push(qid);
                    Vec::new()
                })
                .push(prediction);
        }
        Self {
            order,
            groups,
            events,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Number of questions with at least one prediction.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Total predictions across all questions.
    #[must_use]
    pub fn prediction_count(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    #[must_use]
    pub fn question_ids(&self) -> &[QuestionId] {
        &self.order
    }

    #[must_use]
    pub fn get(&self, question_id: &QuestionId) -> Option<&[Prediction]> {
        self.groups.get(question_id).map(Vec::as_slice)
    }

    /// Groups in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&QuestionId, &[Prediction])> {
        self.order
            .iter()
            .filter_map(|qid| self.groups.get(qid).map(|preds| (qid, preds.as_slice())))
    }

    /// Every prediction in group order.
    pub fn predictions(&self) -> impl Iterator<Item = &Prediction> {
        self.iter().flat_map(|(_, preds)| preds.iter())
    }

    #[must_use]
    pub fn event(&self, event_id: &EventId) -> Option<&EventDetail> {
        self.events.get(event_id)
    }

    #[must_use]
    pub fn events(&self) -> &HashMap<EventId, EventDetail> {
        &self.events
    }
}

/// Loads the signed-in user's predictions and the events they reference.
pub struct PredictionGrouper {
    gateway: Arc<dyn TradingGateway>,
    session: Arc<SessionStore>,
}

impl PredictionGrouper {
    pub fn new(gateway: Arc<dyn TradingGateway>, session: Arc<SessionStore>) -> Self {
        Self { gateway, session }
    }

    /// Fetch and group, reporting a list failure to the caller.
    ///
    /// Without a token the result is empty and no request is made.
    /// Failures loading individual events are logged and the event is left
    /// out.
    pub async fn try_fetch_grouped(
        &self,
        time_in_force: TimeInForce,
        event_filter: Option<&EventId>,
    ) -> Result<GroupedPredictions> {
        if self.session.token().is_none() {
            debug!(%time_in_force, "No session, skipping prediction fetch");
            return Ok(GroupedPredictions::default());
        }

        let mut predictions = self.gateway.list_predictions(time_in_force).await?;
        if let Some(event_id) = event_filter {
            predictions.retain(|p| &p.event_id == event_id);
        }

        let mut seen = HashSet::new();
        let event_ids: Vec<EventId> = predictions
            .iter()
            .map(|p| p.event_id.clone())
            .filter(|id| !id.is_empty() && seen.insert(id.clone()))
            .collect();

        let fetches = event_ids.iter().map(|id| async move {
            match self.gateway.get_event(id).await {
                Ok(detail) => Some((id.clone(), detail)),
                Err(err) => {
                    warn!(event_id = %id, error = %err, "Event fetch failed, leaving it out");
                    None
                }
            }
        });
        let events: HashMap<_, _> = join_all(fetches).await.into_iter().flatten().collect();

        let grouped = GroupedPredictions::from_predictions(predictions, events);
        debug!(
            %time_in_force,
            questions = grouped.len(),
            predictions = grouped.prediction_count(),
            events = grouped.events().len(),
            "Grouped predictions"
        );
        Ok(grouped)
    }

    /// Fetch and group; any list failure yields an empty grouping.
    pub async fn fetch_grouped(
        &self,
        time_in_force: TimeInForce,
        event_filter: Option<&EventId>,
    ) -> GroupedPredictions {
        self.try_fetch_grouped(time_in_force, event_filter)
            .await
            .unwrap_or_else(|err| {
                warn!(%time_in_force, error = %err, "Prediction fetch failed");
                GroupedPredictions::default()
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prediction(pid: &str, qid: &str) -> Prediction {
        Prediction {
            prediction_id: pid.into(),
            question_id: qid.into(),
            ..Prediction::default()
        }
    }

    #[test]
    fn groups_keep_first_seen_order() {
        let grouped = GroupedPredictions::from_predictions(
            vec![
                prediction("p1", "q2"),
                prediction("p2", "q1"),
                prediction("p3", "q2"),
                prediction("p4", ""),
            ],
            HashMap::new(),
        );
        assert_eq!(grouped.question_ids(), &[QuestionId::from("q2"), QuestionId::from("q1")]);
        assert_eq!(grouped.get(&"q2".into()).map(<[_]>::len), Some(2));
        assert_eq!(grouped.prediction_count(), 3);
        let ids: Vec<_> = grouped.predictions().map(|p| p.prediction_id.as_str()).collect();
        assert_eq!(ids, ["p1", "p3", "p2"]);
    }

    #[test]
    fn no_empty_groups() {
        let grouped = GroupedPredictions::from_predictions(vec![prediction("p", " ")], HashMap::new());
        assert!(grouped.is_empty());
        assert_eq!(grouped.get(&" ".into()), None);
    }
}
