use thiserror::Error;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Errors reported by the backend or raised before a request can be made.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The backend answered with a non-success status envelope.
    #[error("{endpoint} returned status {status}")]
    Status { endpoint: String, status: String },

    /// An authenticated endpoint was called without a stored token.
    #[error("not logged in")]
    MissingToken,

    /// The response body lacked a field the caller cannot work without.
    #[error("{endpoint} response missing {field}")]
    MissingField {
        endpoint: String,
        field: &'static str,
    },
}

/// Local precondition failures. These never reach the network layer.
///
/// The display strings are shown to the user verbatim.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Select an outcome and enter a valid amount")]
    InvalidSelection,

    #[error("Insufficient balance")]
    InsufficientBalance,

    #[error("Missing order ID")]
    MissingOrderId,

    #[error("Enter email and password")]
    MissingCredentials,

    #[error("Log in to trade")]
    NotLoggedIn,

    #[error("A submission is already in progress")]
    SubmissionInFlight,

    #[error("{action} is not available while the prediction is {state}")]
    ActionUnavailable { action: String, state: String },

    #[error("{0}")]
    Invalid(String),
}

/// Errors raised while interpreting server-owned records.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("unrecognized prediction status: {0}")]
    UnrecognizedStatus(String),

    #[error("unrecognized time-in-force filter: {0}")]
    UnrecognizedFilter(String),
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    #[error("storage error: {0}")]
    Storage(String),

    /// Some invitations were withdrawn before one request failed.
    #[error("cancelled {} before {failed} failed: {source}", .cancelled.join(", "))]
    PartialCancel {
        cancelled: Vec<String>,
        failed: String,
        source: Box<Error>,
    },
}

impl Error {
    /// True for failures that were rejected locally before any request.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<dialoguer::Error> for Error {
    fn from(err: dialoguer::Error) -> Self {
        // dialoguer::Error wraps an IO error
        Error::Io(std::io::Error::other(err.to_string()))
    }
}
