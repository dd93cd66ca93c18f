//! Error types for the league import pipeline.
//!
//! Every failure that leaves an adapter is one of the kinds below. Raw
//! `reqwest`/`serde_json` errors and platform error pages are classified here
//! and never surfaced verbatim.

use reqwest::StatusCode;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

use crate::types::Platform;


pub type Result<T> = std::result::Result<T, ImportError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImportError {
    #[error("Invalid import configuration: {message}")]
    Configuration { message: String },

    #[error("{platform} rejected the session: {message}")]
    Authentication { platform: Platform, message: String },

    #[error("{platform} league not found: {message}")]
    NotFound { platform: Platform, message: String },

    #[error("Transient {platform} failure: {message}")]
    Transient { platform: Platform, message: String },

    #[error("Import exceeded its {budget_ms}ms budget")]
    Timeout { budget_ms: u64 },
}

/// Stable category of an [`ImportError`], for callers that only branch on kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Configuration,
    Authentication,
    NotFound,
    Transient,
    Timeout,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorKind::Configuration => "configuration",
            ErrorKind::Authentication => "authentication",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Transient => "transient",
            ErrorKind::Timeout => "timeout",
        };
        write!(f, "{}", s)
    }
}

impl ImportError {
    pub fn config(message: impl Into<String>) -> Self {
        ImportError::Configuration {
            message: message.into(),
        }
    }

    pub fn auth(platform: Platform, message: impl Into<String>) -> Self {
        ImportError::Authentication {
            platform,
            message: message.into(),
        }
    }

    pub fn not_found(platform: Platform, message: impl Into<String>) -> Self {
        ImportError::NotFound {
            platform,
            message: message.into(),
        }
    }

    pub fn transient(platform: Platform, message: impl Into<String>) -> Self {
        ImportError::Transient {
            platform,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ImportError::Configuration { .. } => ErrorKind::Configuration,
            ImportError::Authentication { .. } => ErrorKind::Authentication,
            ImportError::NotFound { .. } => ErrorKind::NotFound,
            ImportError::Transient { .. } => ErrorKind::Transient,
            ImportError::Timeout { .. } => ErrorKind::Timeout,
        }
    }

    /// Only transient failures are worth another attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ImportError::Transient { .. })
    }

    /// Classify an HTTP status returned by `platform` while fetching `what`.
    pub fn from_status(platform: Platform, status: StatusCode, what: &str) -> Self {
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Self::auth(platform, format!("{what} returned HTTP {}", status.as_u16()))
            }
            StatusCode::NOT_FOUND | StatusCode::GONE => {
                Self::not_found(platform, format!("{what} returned HTTP {}", status.as_u16()))
            }
            StatusCode::REQUEST_TIMEOUT | StatusCode::TOO_MANY_REQUESTS => {
                Self::transient(platform, format!("{what} returned HTTP {}", status.as_u16()))
            }
            s if s.is_server_error() => {
                Self::transient(platform, format!("{what} returned HTTP {}", s.as_u16()))
            }
            s => Self::config(format!(
                "{platform} refused the request for {what} (HTTP {})",
                s.as_u16()
            )),
        }
    }

    /// Classify a transport-level `reqwest` failure.
    ///
    /// The URL and the underlying error text are dropped; they can echo query
    /// strings and server HTML back to the caller.
    pub fn from_http(platform: Platform, err: &reqwest::Error, what: &str) -> Self {
        if let Some(status) = err.status() {
            return Self::from_status(platform, status, what);
        }
        let cause = if err.is_timeout() {
            "timed out"
        } else if err.is_connect() {
            "connection failed"
        } else if err.is_redirect() {
            "too many redirects"
        } else if err.is_decode() || err.is_body() {
            "response body could not be read"
        } else {
            "request failed"
        };
        Self::transient(platform, format!("{what}: {cause}"))
    }

    /// A body that is not the documented JSON shape is usually a maintenance
    /// or error page served with a 200.
    pub fn from_json(platform: Platform, err: &serde_json::Error, what: &str) -> Self {
        Self::transient(
            platform,
            format!(
                "{what}: unexpected response shape (line {}, column {})",
                err.line(),
                err.column()
            ),
        )
    }
}
