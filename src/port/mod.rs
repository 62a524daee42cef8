//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! # Available Ports
//!
//! - [`EventGateway`], [`PredictionGateway`], [`OrderGateway`] - trading surface
//! - [`AccountGateway`], [`ClanGateway`] - account and social features
//! - [`KeyValueStorage`] - persisted client state (auth token, cached profile)

pub mod outbound;

pub use outbound::gateway::{
    AccountGateway, Backend, ClanGateway, CreateOrder, EventGateway, EventQuery, ExitOrder,
    OrderGateway, OrderReceipt, PredictionGateway, TradingGateway, PREDICTION_PAGE_SIZE,
    QUESTION_PAGE_SIZE,
};
pub use outbound::storage::KeyValueStorage;
