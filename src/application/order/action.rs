//! Which order action a prediction state offers.

use std::fmt;

use serde::Serialize;

use crate::domain::{Prediction, PredictionStatus};
use crate::error::DomainError;

/// An order request the user may make from the prediction panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderAction {
    /// Place a new prediction.
    Create,
    /// Cancel a prediction that is still waiting for a match.
    Cancel,
    /// Ask to close a matched prediction before settlement.
    Exit,
}

impl OrderAction {
    /// Button label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Create => "Predict",
            Self::Cancel => "Cancel",
            Self::Exit => "Exit",
        }
    }

    /// Message shown when the backend answers with a non-success status.
    #[must_use]
    pub const fn rejected_message(self) -> &'static str {
        match self {
            Self::Create => "Failed to create prediction",
            Self::Cancel => "Failed to cancel prediction",
            Self::Exit => "Failed to request exit",
        }
    }

    /// Message shown when the request itself failed.
    #[must_use]
    pub const fn failed_message(self) -> &'static str {
        match self {
            Self::Create => "Failed to add prediction. Please try again.",
            Self::Cancel => "Failed to cancel prediction",
            Self::Exit => "Failed to request exit",
        }
    }

    /// The action offered for a status; `None` status means the user has
    /// no prediction on the question yet.
    ///
    /// Settled predictions are terminal and offer nothing.
    #[must_use]
    pub const fn for_status(status: Option<PredictionStatus>) -> Option<Self> {
        let Some(status) = status else {
            return Some(Self::Create);
        };
        match status {
            PredictionStatus::Accepted | PredictionStatus::CancelRequested => Some(Self::Cancel),
            PredictionStatus::Matched => Some(Self::Exit),
            PredictionStatus::Settled => None,
            PredictionStatus::Cancelled | PredictionStatus::Exited => Some(Self::Create),
        }
    }

    /// The action offered for the user's current prediction, if any.
    ///
    /// Fails on a status label this client does not know.
    pub fn for_prediction(prediction: Option<&Prediction>) -> Result<Option<Self>, DomainError> {
        let status = match prediction {
            Some(p) => p.status()?,
            None => None,
        };
        Ok(Self::for_status(status))
    }
}

impl fmt::Display for OrderAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
