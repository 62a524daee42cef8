//! Scripted in-process backend.
//!
//! [`ScriptedGateway`] implements every gateway port from canned data and
//! records each call, so tests can assert both what the application showed
//! and which requests it made (or, for rejected preconditions, did not make).
//!
//! A gate can hold `list_predictions` and `create_order` in flight until the
//! test releases them, for teardown and double-submit tests.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::Semaphore;

use crate::domain::{
    Balance, ClanDetail, ClanSummary, Event, EventDetail, EventId, FaqEntry, GroupId, Invite,
    LoginGrant, NewClan, OrderId, Prediction, PredictionId, QuestionId, Reward, TimeInForce,
    UserInfo,
};
use crate::error::{ApiError, Result};
use crate::port::{
    AccountGateway, ClanGateway, CreateOrder, EventGateway, EventQuery, ExitOrder, OrderGateway,
    OrderReceipt, PredictionGateway,
};

fn rejected(endpoint: &str) -> crate::error::Error {
    ApiError::Status {
        endpoint: endpoint.to_string(),
        status: "FAILURE".to_string(),
    }
    .into()
}

/// Canned backend responses.
#[derive(Default)]
struct Script {
    events: Vec<Event>,
    details: HashMap<EventId, EventDetail>,
    failing_events: HashSet<EventId>,
    predictions: Vec<Prediction>,
    predictions_fail: bool,
    balance: Option<Balance>,
    receipt: OrderReceipt,
    orders_fail: bool,
    grant: Option<LoginGrant>,
    logout_fail: bool,
    user_info: UserInfo,
    rewards: Vec<Reward>,
    faq: Vec<FaqEntry>,
    clans: Vec<ClanSummary>,
    clan_detail: ClanDetail,
    new_group_id: GroupId,
    failing_cancels: HashSet<String>,
}

/// Requests the gateway received, in order.
#[derive(Debug, Default, Clone)]
pub struct Recorded {
    pub event_queries: Vec<EventQuery>,
    pub prediction_filters: Vec<TimeInForce>,
    pub created: Vec<CreateOrder>,
    pub cancelled: Vec<OrderId>,
    pub exited: Vec<ExitOrder>,
    pub edited: Vec<UserInfo>,
    pub new_clans: Vec<NewClan>,
    pub invites: Vec<(GroupId, Vec<Invite>)>,
    pub cancelled_invites: Vec<(GroupId, String)>,
}

/// A backend that answers from a script and counts every call.
#[derive(Default)]
pub struct ScriptedGateway {
    script: Mutex<Script>,
    recorded: Mutex<Recorded>,
    calls: Mutex<HashMap<&'static str, u32>>,
    gate: Mutex<Option<Arc<Semaphore>>>,
}

impl ScriptedGateway {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_events(self, events: Vec<Event>) -> Self {
        self.script.lock().events = events;
        self
    }

    /// Serve `detail` from `get_event` for its event id.
    #[must_use]
    pub fn with_detail(self, detail: EventDetail) -> Self {
        self.script
            .lock()
            .details
            .insert(detail.event.id.clone(), detail);
        self
    }

    /// Make `get_event` fail for `event_id`.
    #[must_use]
    pub fn with_failing_event(self, event_id: impl Into<EventId>) -> Self {
        self.script.lock().failing_events.insert(event_id.into());
        self
    }

    #[must_use]
    pub fn with_predictions(self, predictions: Vec<Prediction>) -> Self {
        self.set_predictions(predictions);
        self
    }

    #[must_use]
    pub fn with_failing_predictions(self) -> Self {
        self.script.lock().predictions_fail = true;
        self
    }

    #[must_use]
    pub fn with_balance(self, balance: Balance) -> Self {
        self.script.lock().balance = Some(balance);
        self
    }

    #[must_use]
    pub fn with_receipt(self, receipt: OrderReceipt) -> Self {
        self.script.lock().receipt = receipt;
        self
    }

    /// Make every order mutation answer with a non-success status.
    #[must_use]
    pub fn with_failing_orders(self) -> Self {
        self.script.lock().orders_fail = true;
        self
    }

    #[must_use]
    pub fn with_login(self, grant: LoginGrant) -> Self {
        self.script.lock().grant = Some(grant);
        self
    }

    #[must_use]
    pub fn with_failing_logout(self) -> Self {
        self.script.lock().logout_fail = true;
        self
    }

    #[must_use]
    pub fn with_user_info(self, info: UserInfo) -> Self {
        self.script.lock().user_info = info;
        self
    }

    #[must_use]
    pub fn with_rewards(self, rewards: Vec<Reward>) -> Self {
        self.script.lock().rewards = rewards;
        self
    }

    #[must_use]
    pub fn with_faq(self, faq: Vec<FaqEntry>) -> Self {
        self.script.lock().faq = faq;
        self
    }

    #[must_use]
    pub fn with_clans(self, clans: Vec<ClanSummary>) -> Self {
        self.script.lock().clans = clans;
        self
    }

    #[must_use]
    pub fn with_clan_detail(self, detail: ClanDetail) -> Self {
        self.script.lock().clan_detail = detail;
        self
    }

    #[must_use]
    pub fn with_new_group_id(self, group_id: impl Into<GroupId>) -> Self {
        self.script.lock().new_group_id = group_id.into();
        self
    }

    /// Make cancelling the invite for `email` fail.
    #[must_use]
    pub fn with_failing_cancel(self, email: &str) -> Self {
        self.script.lock().failing_cancels.insert(email.to_string());
        self
    }

    /// Replace the scripted predictions, e.g. after an order changed them.
    pub fn set_predictions(&self, predictions: Vec<Prediction>) {
        self.script.lock().predictions = predictions;
    }

    /// Hold `list_predictions` and `create_order` until the returned
    /// semaphore gets permits; each held call consumes one.
    pub fn hold(&self) -> Arc<Semaphore> {
        let gate = Arc::new(Semaphore::new(0));
        *self.gate.lock() = Some(Arc::clone(&gate));
        gate
    }

    /// Number of calls made to `method`.
    #[must_use]
    pub fn calls(&self, method: &str) -> u32 {
        self.calls.lock().get(method).copied().unwrap_or_default()
    }

    /// Total calls across every method.
    #[must_use]
    pub fn total_calls(&self) -> u32 {
        self.calls.lock().values().sum()
    }

    #[must_use]
    pub fn recorded(&self) -> Recorded {
        self.recorded.lock().clone()
    }

    fn hit(&self, method: &'static str) {
        *self.calls.lock().entry(method).or_default() += 1;
    }

    async fn pass_gate(&self) {
        let gate = self.gate.lock().clone();
        if let Some(gate) = gate {
            if let Ok(permit) = gate.acquire().await {
                permit.forget();
            }
        }
    }
}

#[async_trait]
impl EventGateway for ScriptedGateway {
    async fn list_events(&self, query: &EventQuery) -> Result<Vec<Event>> {
        self.hit("list_events");
        self.recorded.lock().event_queries.push(query.clone());
        Ok(self.script.lock().events.clone())
    }

    async fn get_event(&self, event_id: &EventId) -> Result<EventDetail> {
        self.hit("get_event");
        let script = self.script.lock();
        if script.failing_events.contains(event_id) {
            return Err(rejected("/event/v1/getevent"));
        }
        script.details.get(event_id).cloned().ok_or_else(|| {
            ApiError::MissingField {
                endpoint: "/event/v1/getevent".to_string(),
                field: "event",
            }
            .into()
        })
    }
}

#[async_trait]
impl PredictionGateway for ScriptedGateway {
    async fn list_predictions(&self, time_in_force: TimeInForce) -> Result<Vec<Prediction>> {
        self.hit("list_predictions");
        self.recorded.lock().prediction_filters.push(time_in_force);
        self.pass_gate().await;
        let script = self.script.lock();
        if script.predictions_fail {
            return Err(rejected("/prediction/v1/get"));
        }
        Ok(script.predictions.clone())
    }

    async fn prediction_by_id(&self, prediction_id: &PredictionId) -> Result<Option<Prediction>> {
        self.hit("prediction_by_id");
        Ok(self
            .script
            .lock()
            .predictions
            .iter()
            .find(|p| &p.prediction_id == prediction_id)
            .cloned())
    }

    async fn predictions_by_question(
        &self,
        question_id: &QuestionId,
        _time_in_force: TimeInForce,
    ) -> Result<Vec<Prediction>> {
        self.hit("predictions_by_question");
        Ok(self
            .script
            .lock()
            .predictions
            .iter()
            .filter(|p| &p.question_id == question_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl OrderGateway for ScriptedGateway {
    async fn create_order(&self, order: &CreateOrder) -> Result<OrderReceipt> {
        self.hit("create_order");
        self.recorded.lock().created.push(order.clone());
        self.pass_gate().await;
        let script = self.script.lock();
        if script.orders_fail {
            return Err(rejected("/order/v1/createorder"));
        }
        Ok(script.receipt.clone())
    }

    async fn cancel_order(&self, order_id: &OrderId) -> Result<()> {
        self.hit("cancel_order");
        self.recorded.lock().cancelled.push(order_id.clone());
        if self.script.lock().orders_fail {
            return Err(rejected("/order/v1/cancelorder"));
        }
        Ok(())
    }

    async fn exit_order(&self, order: &ExitOrder) -> Result<()> {
        self.hit("exit_order");
        self.recorded.lock().exited.push(order.clone());
        if self.script.lock().orders_fail {
            return Err(rejected("/order/v1/exitorder"));
        }
        Ok(())
    }

    async fn balance(&self) -> Result<Balance> {
        self.hit("balance");
        self.script
            .lock()
            .balance
            .ok_or_else(|| rejected("/balances/v1/get"))
    }
}

#[async_trait]
impl AccountGateway for ScriptedGateway {
    async fn login(&self, _email: &str, _password: &str) -> Result<LoginGrant> {
        self.hit("login");
        self.script
            .lock()
            .grant
            .clone()
            .ok_or_else(|| rejected("/user/v1/login"))
    }

    async fn logout(&self) -> Result<()> {
        self.hit("logout");
        if self.script.lock().logout_fail {
            return Err(rejected("/user/v1/logout"));
        }
        Ok(())
    }

    async fn user_info(&self) -> Result<UserInfo> {
        self.hit("user_info");
        Ok(self.script.lock().user_info.clone())
    }

    async fn edit_user_info(&self, info: &UserInfo) -> Result<()> {
        self.hit("edit_user_info");
        self.recorded.lock().edited.push(info.clone());
        self.script.lock().user_info = info.clone();
        Ok(())
    }

    async fn rewards(&self) -> Result<Vec<Reward>> {
        self.hit("rewards");
        Ok(self.script.lock().rewards.clone())
    }

    async fn faq(&self) -> Result<Vec<FaqEntry>> {
        self.hit("faq");
        Ok(self.script.lock().faq.clone())
    }
}

#[async_trait]
impl ClanGateway for ScriptedGateway {
    async fn list_clans(&self) -> Result<Vec<ClanSummary>> {
        self.hit("list_clans");
        Ok(self.script.lock().clans.clone())
    }

    async fn clan_detail(&self, _group_id: &GroupId) -> Result<ClanDetail> {
        self.hit("clan_detail");
        Ok(self.script.lock().clan_detail.clone())
    }

    async fn create_clan(&self, clan: &NewClan) -> Result<GroupId> {
        self.hit("create_clan");
        self.recorded.lock().new_clans.push(clan.clone());
        Ok(self.script.lock().new_group_id.clone())
    }

    async fn invite_members(
        &self,
        group_id: &GroupId,
        _group_name: Option<&str>,
        invites: &[Invite],
    ) -> Result<()> {
        self.hit("invite_members");
        self.recorded
            .lock()
            .invites
            .push((group_id.clone(), invites.to_vec()));
        Ok(())
    }

    async fn cancel_invite(&self, group_id: &GroupId, email: &str) -> Result<()> {
        self.hit("cancel_invite");
        self.recorded
            .lock()
            .cancelled_invites
            .push((group_id.clone(), email.to_string()));
        if self.script.lock().failing_cancels.contains(email) {
            return Err(rejected("/group/v1/cancelinvite"));
        }
        Ok(())
    }
}
