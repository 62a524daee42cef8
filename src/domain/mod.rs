//! Backend-agnostic view projections of server-owned records.
//!
//! Nothing here is a system of record. Every type is rebuilt from backend
//! responses, and the formatting helpers are pure.

pub mod account;
pub mod balance;
pub mod clan;
pub mod event;
pub mod format;
pub mod id;
pub mod prediction;
pub mod returns;
pub mod view;

pub use account::{FaqEntry, LoginGrant, ProfileEdit, Reward, RewardCategory, UserInfo, UserProfile};
pub use balance::Balance;
pub use clan::{ClanDetail, ClanMember, ClanSummary, Invite, NewClan};
pub use event::{Event, EventDetail, MarketDataDetail, Question, QuestionActivity, SportEvent};
pub use id::{EventId, GroupId, OrderId, PredictionId, QuestionId};
pub use prediction::{CompletedPeriod, Prediction, PredictionStatus, TimeInForce};
pub use returns::ReturnEstimate;
pub use view::ListView;
