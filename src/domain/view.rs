//! Prediction list views.
//!
//! One [`ListView`] value configures what used to be a separate list per
//! tab: which time-in-force filter to poll, which statuses belong in the
//! list, and how rows are labelled.

use std::fmt;
use std::str::FromStr;

use super::prediction::{CompletedPeriod, PredictionStatus, TimeInForce};
use crate::error::DomainError;

/// A prediction list tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListView {
    /// Every upcoming prediction, regardless of status.
    All,
    /// Matched predictions on running events.
    Live,
    /// Predictions still waiting for a match.
    Open,
    /// Settled predictions within a period.
    Completed(CompletedPeriod),
    Cancelled,
    Exited,
}

impl ListView {
    pub const TABS: [Self; 6] = [
        Self::All,
        Self::Live,
        Self::Open,
        Self::Completed(CompletedPeriod::AllTime),
        Self::Cancelled,
        Self::Exited,
    ];

    /// Filter sent to the predictions endpoint for this view.
    #[must_use]
    pub const fn time_in_force(self) -> TimeInForce {
        match self {
            Self::All => TimeInForce::Upcoming,
            Self::Live => TimeInForce::Live,
            Self::Open => TimeInForce::PendingLive,
            Self::Completed(period) => TimeInForce::Completed(period),
            Self::Cancelled => TimeInForce::Cancelled,
            Self::Exited => TimeInForce::Exited,
        }
    }

    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Live => "Live",
            Self::Open => "Open",
            Self::Completed(_) => "Completed",
            Self::Cancelled => "Cancelled",
            Self::Exited => "Exited",
        }
    }

    #[must_use]
    pub const fn empty_message(self) -> &'static str {
        match self {
            Self::All => "No predictions yet",
            Self::Live => "No live predictions",
            Self::Open => "No open predictions",
            Self::Completed(_) => "No completed predictions",
            Self::Cancelled => "No cancelled predictions",
            Self::Exited => "No exited predictions",
        }
    }

    /// Whether a prediction in `status` belongs in this view.
    ///
    /// `None` is a question the user has not predicted on; only `All`
    /// shows those.
    #[must_use]
    pub const fn admits(self, status: Option<PredictionStatus>) -> bool {
        let Some(status) = status else {
            return matches!(self, Self::All);
        };
        match self {
            Self::All => true,
            Self::Live => matches!(status, PredictionStatus::Matched),
            Self::Open => status.is_queued(),
            Self::Completed(_) => matches!(status, PredictionStatus::Settled),
            Self::Cancelled => matches!(status, PredictionStatus::Cancelled),
            Self::Exited => matches!(status, PredictionStatus::Exited),
        }
    }

    /// Row badge for a prediction shown in this view.
    #[must_use]
    pub fn badge(self, status: Option<PredictionStatus>) -> String {
        match (self, status) {
            (Self::Open, Some(s)) if s.is_queued() => "Open".to_string(),
            (_, Some(s)) => status_text(s),
            (_, None) => "Not predicted".to_string(),
        }
    }
}

impl fmt::Display for ListView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

impl FromStr for ListView {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" | "upcoming" => Ok(Self::All),
            "live" => Ok(Self::Live),
            "open" | "queued" => Ok(Self::Open),
            "completed" | "settled" => Ok(Self::Completed(CompletedPeriod::AllTime)),
            "cancelled" | "canceled" => Ok(Self::Cancelled),
            "exited" | "exit" => Ok(Self::Exited),
            _ => Err(DomainError::UnrecognizedFilter(s.to_string())),
        }
    }
}

/// Status text for list rows: queued predictions read "Accepted".
#[must_use]
pub fn status_text(status: PredictionStatus) -> String {
    match status {
        PredictionStatus::Matched => "Matched".to_string(),
        PredictionStatus::Accepted | PredictionStatus::CancelRequested => "Accepted".to_string(),
        other => other.label().to_lowercase(),
    }
}
