//! Miette-based error diagnostics for CLI error presentation.
//!
//! Configuration errors are rendered with the offending file and a labelled
//! span when the TOML parser reports one.

use std::path::Path;

use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

use crate::error::{ApiError, ConfigError, Error};

/// Configuration error with source location context.
#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
#[diagnostic(code(juspredict::config))]
pub struct ConfigDiagnostic {
    pub message: String,

    #[source_code]
    pub src: String,

    #[label("here")]
    pub span: Option<SourceSpan>,

    #[help]
    pub help: Option<String>,
}

impl ConfigDiagnostic {
    /// Build from a config error, reading `path` for context.
    #[must_use]
    pub fn from_error(err: &ConfigError, path: &Path) -> Self {
        let src = std::fs::read_to_string(path).unwrap_or_default();
        let span = match err {
            ConfigError::Parse(parse) => parse.span().map(SourceSpan::from),
            _ => None,
        };
        let help = match err {
            ConfigError::ReadFile(_) => Some(format!("check that {} exists", path.display())),
            ConfigError::InvalidValue { field, .. } | ConfigError::MissingField { field } => {
                Some(format!("fix `{field}` in {}", path.display()))
            }
            ConfigError::Parse(_) => None,
        };
        Self {
            message: err.to_string(),
            src,
            span,
            help,
        }
    }
}

/// Backend request failure.
#[derive(Debug, Error, Diagnostic)]
#[error("request failed: {message}")]
#[diagnostic(code(juspredict::request))]
pub struct RequestDiagnostic {
    pub message: String,

    #[help]
    pub help: Option<String>,
}

impl RequestDiagnostic {
    #[must_use]
    pub fn from_error(err: &Error) -> Self {
        let help = match err {
            Error::Http(_) => {
                Some("check your network connection and JUSPREDICT_API_URL".to_string())
            }
            Error::Api(ApiError::MissingToken) => Some("run `juspredict login` first".to_string()),
            _ => None,
        };
        Self {
            message: err.to_string(),
            help,
        }
    }
}
