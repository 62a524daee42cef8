//! Prediction lists: fetch-and-group, polling and per-view feeds.

pub mod feed;
pub mod group;
pub mod poller;

pub use feed::{FeedState, PredictionFeed, PredictionRow};
pub use group::{GroupedPredictions, PredictionGrouper};
pub use poller::{PollHandle, Poller};
