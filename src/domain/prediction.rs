//! User predictions and the server-side vocabulary around them.
//!
//! A [`Prediction`] is a transient projection of a server-owned record. The
//! client never computes the next [`PredictionStatus`]; it only mirrors the
//! label returned by the backend and requests transitions.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Serialize, Serializer};

use super::id::{EventId, OrderId, PredictionId, QuestionId};
use crate::error::DomainError;

const STATUS_PREFIX: &str = "PREDICTION_STATUS_";
const TIME_IN_FORCE_PREFIX: &str = "PREDICTIONTIMEINFORCE_";

/// Lifecycle state of a prediction as reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PredictionStatus {
    Accepted,
    CancelRequested,
    Matched,
    Settled,
    Cancelled,
    Exited,
}

impl PredictionStatus {
    /// Parse a status label, with or without the `PREDICTION_STATUS_` prefix.
    pub fn from_label(label: &str) -> Result<Self, DomainError> {
        let trimmed = label.trim();
        let bare = trimmed.strip_prefix(STATUS_PREFIX).unwrap_or(trimmed);
        match bare.to_ascii_uppercase().as_str() {
            "ACCEPTED" => Ok(Self::Accepted),
            "CANCEL_REQUESTED" => Ok(Self::CancelRequested),
            "MATCHED" => Ok(Self::Matched),
            "SETTLED" => Ok(Self::Settled),
            "CANCELLED" => Ok(Self::Cancelled),
            "EXITED" => Ok(Self::Exited),
            _ => Err(DomainError::UnrecognizedStatus(trimmed.to_string())),
        }
    }

    /// Wire label as sent by the backend.
    #[must_use]
    pub const fn as_wire(self) -> &'static str {
        match self {
            Self::Accepted => "PREDICTION_STATUS_ACCEPTED",
            Self::CancelRequested => "PREDICTION_STATUS_CANCEL_REQUESTED",
            Self::Matched => "PREDICTION_STATUS_MATCHED",
            Self::Settled => "PREDICTION_STATUS_SETTLED",
            Self::Cancelled => "PREDICTION_STATUS_CANCELLED",
            Self::Exited => "PREDICTION_STATUS_EXITED",
        }
    }

    /// Short label for list rows.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Accepted => "Accepted",
            Self::CancelRequested => "Cancel requested",
            Self::Matched => "Matched",
            Self::Settled => "Settled",
            Self::Cancelled => "Cancelled",
            Self::Exited => "Exited",
        }
    }

    /// Waiting for a counterparty: `ACCEPTED` or `CANCEL_REQUESTED`.
    #[must_use]
    pub const fn is_queued(self) -> bool {
        matches!(self, Self::Accepted | Self::CancelRequested)
    }

    /// A new prediction may be placed on the same question.
    #[must_use]
    pub const fn is_reenterable(self) -> bool {
        matches!(self, Self::Cancelled | Self::Exited)
    }
}

impl fmt::Display for PredictionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Period selector for the completed-predictions filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CompletedPeriod {
    Today,
    Yesterday,
    LastWeek,
    ThisMonth,
    LastMonth,
    #[default]
    AllTime,
}

impl CompletedPeriod {
    pub const ALL: [Self; 6] = [
        Self::Today,
        Self::Yesterday,
        Self::LastWeek,
        Self::ThisMonth,
        Self::LastMonth,
        Self::AllTime,
    ];

    const fn suffix(self) -> &'static str {
        match self {
            Self::Today => "TODAY",
            Self::Yesterday => "YESTERDAY",
            Self::LastWeek => "LASTWEEK",
            Self::ThisMonth => "THISMONTH",
            Self::LastMonth => "LASTMONTH",
            Self::AllTime => "ALLTIME",
        }
    }
}

impl FromStr for CompletedPeriod {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace(['-', '_', ' '], "");
        Self::ALL
            .into_iter()
            .find(|period| period.suffix() == normalized)
            .ok_or_else(|| DomainError::UnrecognizedFilter(s.to_string()))
    }
}

/// Time-in-force filter selecting a subset of the user's predictions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeInForce {
    Live,
    Upcoming,
    PendingLive,
    Completed(CompletedPeriod),
    Cancelled,
    Exited,
}

impl TimeInForce {
    /// Wire value for the `timeInForce` request field.
    #[must_use]
    pub fn as_wire(self) -> String {
        let tail = match self {
            Self::Live => "LIVE",
            Self::Upcoming => "UPCOMING",
            Self::PendingLive => "PENDING_LIVE",
            Self::Completed(period) => {
                return format!("{TIME_IN_FORCE_PREFIX}COMPLETED_{}", period.suffix())
            }
            Self::Cancelled => "CANCELLED",
            Self::Exited => "EXITED",
        };
        format!("{TIME_IN_FORCE_PREFIX}{tail}")
    }
}

impl fmt::Display for TimeInForce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_wire())
    }
}

impl FromStr for TimeInForce {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        let bare = upper.strip_prefix(TIME_IN_FORCE_PREFIX).unwrap_or(&upper);
        match bare {
            "LIVE" => Ok(Self::Live),
            "UPCOMING" => Ok(Self::Upcoming),
            "PENDING_LIVE" => Ok(Self::PendingLive),
            "CANCELLED" => Ok(Self::Cancelled),
            "EXITED" => Ok(Self::Exited),
            other => other
                .strip_prefix("COMPLETED_")
                .and_then(|period| period.parse().ok())
                .map(Self::Completed)
                .ok_or_else(|| DomainError::UnrecognizedFilter(s.to_string())),
        }
    }
}

impl Serialize for TimeInForce {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.as_wire())
    }
}

/// One user prediction, as last reported by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Prediction {
    pub prediction_id: PredictionId,
    pub question_id: QuestionId,
    pub event_id: EventId,
    pub question: Option<String>,
    pub event_name: Option<String>,
    pub event_short_name: Option<String>,
    pub event_description: Option<String>,
    pub event_start_date: Option<String>,
    pub predicted_outcome: Option<String>,
    /// Raw status label. Interpret with [`Prediction::status`].
    pub prediction_status: String,
    pub investment_amt: Option<Decimal>,
    pub matched_amt: Option<Decimal>,
    pub percentage: Option<Decimal>,
    pub exit_percentage: Option<Decimal>,
    pub potential_returns: Option<Decimal>,
    pub earnings: Option<Decimal>,
    pub order_id: Option<OrderId>,
}

impl Prediction {
    /// Parsed status. `Ok(None)` when the backend sent no status at all.
    pub fn status(&self) -> Result<Option<PredictionStatus>, DomainError> {
        if self.prediction_status.trim().is_empty() {
            return Ok(None);
        }
        PredictionStatus::from_label(&self.prediction_status).map(Some)
    }

    /// The order id, if present and non-blank.
    #[must_use]
    pub fn order_id(&self) -> Option<&OrderId> {
        self.order_id.as_ref().filter(|id| !id.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_accepts_prefixed_and_bare_labels() {
        assert_eq!(
            PredictionStatus::from_label("PREDICTION_STATUS_MATCHED"),
            Ok(PredictionStatus::Matched)
        );
        assert_eq!(
            PredictionStatus::from_label("cancel_requested"),
            Ok(PredictionStatus::CancelRequested)
        );
    }

    #[test]
    fn unknown_status_is_an_error() {
        let err = PredictionStatus::from_label("PREDICTION_STATUS_VOIDED").unwrap_err();
        assert_eq!(
            err,
            DomainError::UnrecognizedStatus("PREDICTION_STATUS_VOIDED".into())
        );
    }

    #[test]
    fn empty_status_means_no_state() {
        let prediction = Prediction::default();
        assert_eq!(prediction.status(), Ok(None));
    }

    #[test]
    fn time_in_force_wire_names() {
        assert_eq!(TimeInForce::Live.as_wire(), "PREDICTIONTIMEINFORCE_LIVE");
        assert_eq!(
            TimeInForce::PendingLive.as_wire(),
            "PREDICTIONTIMEINFORCE_PENDING_LIVE"
        );
        assert_eq!(
            TimeInForce::Completed(CompletedPeriod::LastWeek).as_wire(),
            "PREDICTIONTIMEINFORCE_COMPLETED_LASTWEEK"
        );
    }

    #[test]
    fn time_in_force_parses_wire_and_short_forms() {
        assert_eq!(
            "PREDICTIONTIMEINFORCE_COMPLETED_THISMONTH".parse(),
            Ok(TimeInForce::Completed(CompletedPeriod::ThisMonth))
        );
        assert_eq!("exited".parse(), Ok(TimeInForce::Exited));
        assert!("sometime".parse::<TimeInForce>().is_err());
    }

    #[test]
    fn completed_period_parses_loose_spellings() {
        assert_eq!("last-week".parse(), Ok(CompletedPeriod::LastWeek));
        assert_eq!("all_time".parse(), Ok(CompletedPeriod::AllTime));
    }

    #[test]
    fn blank_order_id_is_treated_as_missing() {
        let prediction = Prediction {
            order_id: Some(OrderId::new("")),
            ..Prediction::default()
        };
        assert!(prediction.order_id().is_none());
    }
}
