//! Error types for price fetch operations.

use pricebot_core::InvalidDecimal;
use thiserror::Error;

/// Errors that can occur while fetching a quote from one endpoint.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("HTTP client could not be built: {0}")]
    ClientBuild(String),

    #[error("Request failed: {0}")]
    ConnectionFailed(String),

    #[error("Unexpected HTTP status {0}")]
    Status(u16),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Failed to parse response: {0}")]
    ParseError(String),

    #[error("Missing field: {0}")]
    MissingField(String),

    #[error("Invalid decimal in {field}: {value}")]
    InvalidDecimal { field: String, value: String },

    #[error("Zero reference price in {0}")]
    ZeroReference(String),

    #[error("Arithmetic overflow in {0}")]
    Overflow(String),
}

impl From<reqwest::Error> for FeedError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FeedError::Timeout(err.to_string())
        } else if err.is_decode() {
            FeedError::ParseError(err.to_string())
        } else if let Some(status) = err.status() {
            FeedError::Status(status.as_u16())
        } else {
            FeedError::ConnectionFailed(err.to_string())
        }
    }
}

impl From<serde_json::Error> for FeedError {
    fn from(err: serde_json::Error) -> Self {
        FeedError::ParseError(err.to_string())
    }
}

impl FeedError {
    pub(crate) fn invalid_decimal(field: &str, err: InvalidDecimal) -> Self {
        FeedError::InvalidDecimal {
            field: field.to_string(),
            value: err.0,
        }
    }

    /// Returns true if this error is transient and likely to succeed on retry.
    pub fn is_transient(&self) -> bool {
        match self {
            FeedError::ConnectionFailed(_) | FeedError::Timeout(_) => true,
            FeedError::Status(code) => *code == 429 || *code >= 500,
            _ => false,
        }
    }
}
