//! The prediction panel for one question.
//!
//! Holds the user's selection, the last fetched balance and their current
//! prediction, and dispatches the one order action the prediction's status
//! allows. Precondition failures set the panel error and never reach the
//! gateway.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use rust_decimal::Decimal;
use tracing::{debug, error, info, warn};

use super::action::OrderAction;
use crate::application::session::SessionStore;
use crate::domain::format::decimal_from_str;
use crate::domain::returns::{confidence, ReturnEstimate};
use crate::domain::{Balance, EventId, OrderId, Prediction, PredictionId, Question, TimeInForce};
use crate::error::{ApiError, Error, Result, ValidationError};
use crate::port::{CreateOrder, ExitOrder, TradingGateway};

/// Panel state as rendered.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PanelState {
    pub event_id: EventId,
    pub question: Question,
    pub outcome: Option<String>,
    pub amount: Option<Decimal>,
    pub confidence_override: Option<Decimal>,
    pub prediction: Option<Prediction>,
    /// Last fetched balance; `None` until the first successful fetch.
    pub balance: Option<Balance>,
    pub error: Option<String>,
    pub notice: Option<String>,
}

impl PanelState {
    /// Confidence percentage an order would be submitted with.
    #[must_use]
    pub fn confidence(&self) -> Decimal {
        let implied = self
            .outcome
            .as_deref()
            .and_then(|o| self.question.outcome(o))
            .and_then(|detail| detail.implied_probability);
        let text = self
            .question
            .activity
            .as_ref()
            .and_then(|a| a.question_probability.as_deref());
        confidence(self.confidence_override, implied, text)
    }

    #[must_use]
    pub fn estimate(&self) -> Option<ReturnEstimate> {
        ReturnEstimate::compute(self.amount?, self.confidence())
    }

    /// Balance left after staking the entered amount.
    #[must_use]
    pub fn remaining_balance(&self) -> Option<Decimal> {
        let balance = self.balance?;
        Some(balance.remaining_after(self.amount.unwrap_or_default()))
    }
}

/// Order action dispatcher bound to one question.
pub struct OrderPanel {
    gateway: Arc<dyn TradingGateway>,
    session: Arc<SessionStore>,
    state: Mutex<PanelState>,
    submitting: AtomicBool,
}

impl OrderPanel {
    pub fn new(
        gateway: Arc<dyn TradingGateway>,
        session: Arc<SessionStore>,
        event_id: EventId,
        question: Question,
    ) -> Self {
        Self {
            gateway,
            session,
            state: Mutex::new(PanelState {
                event_id,
                question,
                ..PanelState::default()
            }),
            submitting: AtomicBool::new(false),
        }
    }

    #[must_use]
    pub fn state(&self) -> PanelState {
        self.state.lock().clone()
    }

    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::Acquire)
    }

    pub fn select_outcome(&self, outcome: impl Into<String>) {
        let outcome = outcome.into();
        let mut state = self.state.lock();
        state.outcome = Some(outcome).filter(|o| !o.trim().is_empty());
        state.error = None;
    }

    pub fn set_amount(&self, amount: Decimal) {
        let mut state = self.state.lock();
        state.amount = Some(amount);
        state.error = None;
    }

    /// Set the amount from user input. Unparsable text clears it.
    pub fn set_amount_text(&self, raw: &str) {
        let mut state = self.state.lock();
        state.amount = decimal_from_str(raw);
        state.error = None;
    }

    pub fn set_confidence(&self, pct: Option<Decimal>) {
        self.state.lock().confidence_override = pct;
    }

    /// Seed the panel with a known prediction, e.g. one picked from a list.
    pub fn set_prediction(&self, prediction: Option<Prediction>) {
        self.state.lock().prediction = prediction;
    }

    /// The action the current prediction allows.
    pub fn available_action(&self) -> Result<Option<OrderAction>> {
        let state = self.state.lock();
        OrderAction::for_prediction(state.prediction.as_ref()).map_err(|err| {
            error!(question_id = %state.question.question_id, error = %err, "Cannot dispatch for unknown status");
            err.into()
        })
    }

    /// Load balance and the user's prediction for a freshly opened panel.
    /// Failures are logged and leave the previous values.
    pub async fn load(&self) {
        if !self.session.is_logged_in() {
            return;
        }
        self.refresh_balance().await;
        self.refresh_prediction(None).await;
    }

    /// Dispatch whatever action the current status allows.
    pub async fn submit(&self) -> Result<OrderAction> {
        let action = self
            .available_action()?
            .ok_or_else(|| self.unavailable("Order"))?;
        self.dispatch(action).await?;
        Ok(action)
    }

    /// Dispatch `action`, rejecting it locally when the status does not
    /// allow it or its preconditions fail.
    pub async fn dispatch(&self, action: OrderAction) -> Result<()> {
        if self.available_action()? != Some(action) {
            return Err(self.unavailable(action.label()));
        }

        if self
            .submitting
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(self.reject(ValidationError::SubmissionInFlight));
        }
        let result = self.run(action).await;
        self.submitting.store(false, Ordering::Release);
        result
    }

    async fn run(&self, action: OrderAction) -> Result<()> {
        match action {
            OrderAction::Create => {
                let order = self.create_request()?;
                debug!(question_id = %order.question_id, amount = %order.amount, "Creating order");
                let receipt = self
                    .gateway
                    .create_order(&order)
                    .await
                    .map_err(|err| self.failed(action, err))?;
                info!(
                    question_id = %order.question_id,
                    prediction_id = ?receipt.prediction_id,
                    "Prediction created"
                );
                {
                    let mut state = self.state.lock();
                    state.outcome = None;
                    state.amount = None;
                    state.notice = Some("Prediction placed".into());
                }
                self.refresh_balance().await;
                self.refresh_prediction(receipt.prediction_id).await;
            }
            OrderAction::Cancel => {
                let order_id = self.cancel_request()?;
                debug!(order_id = %order_id, "Cancelling order");
                self.gateway
                    .cancel_order(&order_id)
                    .await
                    .map_err(|err| self.failed(action, err))?;
                info!(order_id = %order_id, "Cancel requested");
                self.state.lock().notice = Some("Cancellation requested".into());
                self.refresh_balance().await;
                self.refresh_prediction(None).await;
            }
            OrderAction::Exit => {
                let order = self.exit_request()?;
                debug!(question_id = %order.question_id, amount = %order.amount, "Requesting exit");
                self.gateway
                    .exit_order(&order)
                    .await
                    .map_err(|err| self.failed(action, err))?;
                info!(question_id = %order.question_id, "Exit requested");
                self.state.lock().notice = Some("Exit requested".into());
                self.refresh_balance().await;
                self.refresh_prediction(None).await;
            }
        }
        Ok(())
    }

    fn create_request(&self) -> Result<CreateOrder> {
        if !self.session.is_logged_in() {
            return Err(self.reject(ValidationError::NotLoggedIn));
        }
        let state = self.state.lock().clone();
        let (Some(outcome), Some(amount)) = (state.outcome.clone(), state.amount) else {
            return Err(self.reject(ValidationError::InvalidSelection));
        };
        if amount <= Decimal::ZERO {
            return Err(self.reject(ValidationError::InvalidSelection));
        }
        if state.balance.is_some_and(|b| b.is_insufficient_for(amount)) {
            return Err(self.reject(ValidationError::InsufficientBalance));
        }
        self.state.lock().error = None;
        Ok(CreateOrder {
            event_id: state.event_id.clone(),
            question_id: state.question.question_id.clone(),
            outcome,
            amount,
            percentage: state.confidence(),
        })
    }

    fn cancel_request(&self) -> Result<OrderId> {
        let order_id = self
            .state
            .lock()
            .prediction
            .as_ref()
            .and_then(Prediction::order_id)
            .cloned();
        match order_id {
            Some(id) => {
                self.state.lock().error = None;
                Ok(id)
            }
            None => Err(self.reject(ValidationError::MissingOrderId)),
        }
    }

    fn exit_request(&self) -> Result<ExitOrder> {
        let mut state = self.state.lock();
        let Some(prediction) = state.prediction.clone() else {
            drop(state);
            return Err(self.unavailable(OrderAction::Exit.label()));
        };
        state.error = None;
        let positive = |v: Option<Decimal>| v.filter(|d| *d > Decimal::ZERO);
        Ok(ExitOrder {
            event_id: state.event_id.clone(),
            question_id: state.question.question_id.clone(),
            order_id: prediction.order_id().cloned(),
            amount: positive(prediction.matched_amt)
                .or_else(|| positive(prediction.investment_amt))
                .or_else(|| positive(state.amount))
                .unwrap_or_default(),
            percentage: positive(prediction.exit_percentage)
                .or_else(|| positive(prediction.percentage))
                .unwrap_or_default(),
        })
    }

    /// Refresh the balance. A failure is logged and keeps the old value.
    pub async fn refresh_balance(&self) {
        match self.gateway.balance().await {
            Ok(balance) => self.state.lock().balance = Some(balance),
            Err(err) => warn!(error = %err, "Balance refresh failed"),
        }
    }

    /// Re-read the user's prediction: by id when known, else by question.
    /// A failure is logged and keeps the old value.
    pub async fn refresh_prediction(&self, prediction_id: Option<PredictionId>) {
        let question_id = self.state.lock().question.question_id.clone();
        let fetched = match prediction_id.filter(|id| !id.is_empty()) {
            Some(id) => self.gateway.prediction_by_id(&id).await,
            None => self
                .gateway
                .predictions_by_question(&question_id, TimeInForce::Upcoming)
                .await
                .map(|preds| preds.into_iter().next()),
        };
        match fetched {
            Ok(prediction) => self.state.lock().prediction = prediction,
            Err(err) => warn!(question_id = %question_id, error = %err, "Prediction refresh failed"),
        }
    }

    fn reject(&self, err: ValidationError) -> Error {
        debug!(error = %err, "Order rejected locally");
        self.state.lock().error = Some(err.to_string());
        err.into()
    }

    fn unavailable(&self, action: &str) -> Error {
        let state = self
            .state
            .lock()
            .prediction
            .as_ref()
            .map_or_else(|| "not placed".to_string(), |p| p.prediction_status.clone());
        self.reject(ValidationError::ActionUnavailable {
            action: action.to_string(),
            state,
        })
    }

    fn failed(&self, action: OrderAction, err: Error) -> Error {
        let message = match &err {
            Error::Api(ApiError::Status { .. }) => action.rejected_message(),
            _ => action.failed_message(),
        };
        warn!(%action, error = %err, "Order request failed");
        self.state.lock().error = Some(message.to_string());
        err
    }
}
