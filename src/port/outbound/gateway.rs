//! Backend gateway ports.
//!
//! One trait per backend area. The REST adapter implements all of them;
//! tests substitute scripted implementations.

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::domain::{
    Balance, ClanDetail, ClanSummary, Event, EventDetail, EventId, FaqEntry, GroupId, Invite,
    LoginGrant, NewClan, OrderId, Prediction, PredictionId, QuestionId, Reward, TimeInForce,
    UserInfo,
};
use crate::error::Result;

/// Fixed page size for prediction lists. No further pages are requested.
pub const PREDICTION_PAGE_SIZE: u32 = 200;

/// Page size used when loading an event's questions.
pub const QUESTION_PAGE_SIZE: u32 = 50;

/// Filters for the event list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventQuery {
    pub category: String,
    pub statuses: Vec<String>,
    pub page_number: u32,
    pub page_size: u32,
    pub event_hierarchy: Option<String>,
}

impl Default for EventQuery {
    fn default() -> Self {
        Self {
            category: "EVENT_CATEGORY_SPORTS".into(),
            statuses: vec![
                "EVENT_STATUS_UPCOMING".into(),
                "EVENT_STATUS_ACTIVE".into(),
                "EVENT_STATUS_COMPLETED".into(),
            ],
            page_number: 1,
            page_size: 50,
            event_hierarchy: None,
        }
    }
}

/// A new prediction to place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateOrder {
    pub event_id: EventId,
    pub question_id: QuestionId,
    pub outcome: String,
    pub amount: Decimal,
    /// Confidence percentage submitted as the order modifier.
    pub percentage: Decimal,
}

/// Request to close a matched prediction early.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExitOrder {
    pub event_id: EventId,
    pub question_id: QuestionId,
    pub order_id: Option<OrderId>,
    pub amount: Decimal,
    pub percentage: Decimal,
}

/// Identifiers returned for an accepted order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderReceipt {
    pub order_id: Option<OrderId>,
    pub prediction_id: Option<PredictionId>,
}

/// Event listing and detail.
#[async_trait]
pub trait EventGateway: Send + Sync {
    async fn list_events(&self, query: &EventQuery) -> Result<Vec<Event>>;

    /// Event detail with up to [`QUESTION_PAGE_SIZE`] questions.
    async fn get_event(&self, event_id: &EventId) -> Result<EventDetail>;
}

/// The signed-in user's predictions.
#[async_trait]
pub trait PredictionGateway: Send + Sync {
    /// First page of [`PREDICTION_PAGE_SIZE`] predictions for a filter.
    async fn list_predictions(&self, time_in_force: TimeInForce) -> Result<Vec<Prediction>>;

    async fn prediction_by_id(&self, prediction_id: &PredictionId) -> Result<Option<Prediction>>;

    /// The user's predictions on one question. The backend keeps at most
    /// one actionable prediction per question, so callers read the first.
    async fn predictions_by_question(
        &self,
        question_id: &QuestionId,
        time_in_force: TimeInForce,
    ) -> Result<Vec<Prediction>>;
}

/// Order placement and the balance it draws on.
///
/// Requests carry no idempotency key: resubmitting after a timeout may
/// create a second order.
#[async_trait]
pub trait OrderGateway: Send + Sync {
    async fn create_order(&self, order: &CreateOrder) -> Result<OrderReceipt>;

    async fn cancel_order(&self, order_id: &OrderId) -> Result<()>;

    async fn exit_order(&self, order: &ExitOrder) -> Result<()>;

    async fn balance(&self) -> Result<Balance>;
}

/// Login, profile, rewards and help content.
#[async_trait]
pub trait AccountGateway: Send + Sync {
    async fn login(&self, email: &str, password: &str) -> Result<LoginGrant>;

    async fn logout(&self) -> Result<()>;

    async fn user_info(&self) -> Result<UserInfo>;

    async fn edit_user_info(&self, info: &UserInfo) -> Result<()>;

    async fn rewards(&self) -> Result<Vec<Reward>>;

    async fn faq(&self) -> Result<Vec<FaqEntry>>;
}

/// Clan management.
#[async_trait]
pub trait ClanGateway: Send + Sync {
    async fn list_clans(&self) -> Result<Vec<ClanSummary>>;

    async fn clan_detail(&self, group_id: &GroupId) -> Result<ClanDetail>;

    async fn create_clan(&self, clan: &NewClan) -> Result<GroupId>;

    async fn invite_members(
        &self,
        group_id: &GroupId,
        group_name: Option<&str>,
        invites: &[Invite],
    ) -> Result<()>;

    /// Withdraw the pending invitation sent to one address.
    async fn cancel_invite(&self, group_id: &GroupId, email: &str) -> Result<()>;
}

/// Everything the prediction panels need: predictions, events and orders.
pub trait TradingGateway: EventGateway + PredictionGateway + OrderGateway {}

impl<T: EventGateway + PredictionGateway + OrderGateway + ?Sized> TradingGateway for T {}

/// The full backend surface.
pub trait Backend: TradingGateway + AccountGateway + ClanGateway {}

impl<T: TradingGateway + AccountGateway + ClanGateway + ?Sized> Backend for T {}
