//! Identifier newtypes for server-owned records.
//!
//! The backend uses opaque strings for every identifier; the newtypes keep
//! an event id from being passed where a question id is expected.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            #[doc = concat!("Create a new `", stringify!($name), "` from a string.")]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            #[doc = concat!("Get the ", stringify!($name), " as a string slice.")]
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// True when the backend sent an empty identifier.
            #[must_use]
            pub fn is_empty(&self) -> bool {
                self.0.trim().is_empty()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self::new(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self::new(s)
            }
        }
    };
}

string_id!(
    /// Sports event identifier.
    EventId
);

string_id!(
    /// Prediction question identifier. A question belongs to one event.
    QuestionId
);

string_id!(
    /// Identifier of one user prediction.
    PredictionId
);

string_id!(
    /// Order identifier attached to a prediction once the backend accepts it.
    OrderId
);

string_id!(
    /// Clan (social group) identifier.
    GroupId
);
