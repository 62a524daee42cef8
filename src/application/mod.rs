//! Application services (use cases).
//!
//! These services sit between the gateways and the front end: they own
//! view state, polling and order dispatch, and never render anything.

pub mod auth;
pub mod balance;
pub mod clan;
pub mod event;
pub mod order;
pub mod prediction;
pub mod session;

pub use auth::AccountService;
pub use balance::BalanceService;
pub use clan::ClanService;
pub use event::{EventCard, EventCatalog, QuestionRow, QuestionTab, QuestionView};
pub use order::{OrderAction, OrderPanel, PanelState};
pub use prediction::{FeedState, GroupedPredictions, PollHandle, Poller, PredictionFeed, PredictionGrouper};
pub use session::{AuthState, SessionStore};
