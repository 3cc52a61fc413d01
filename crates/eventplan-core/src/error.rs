//! Error types
//!
//! `AppError` is the crate-wide error type. `ApiError` is the uniform error
//! contract of the HTTP client: every failed request surfaces as exactly one
//! `ApiError`, carrying a message, an optional HTTP status, and details.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

use crate::normalize::is_truthy;

/// Status reported for requests cancelled by the client-side timeout
pub const TIMEOUT_STATUS: u16 = 408;

/// Application-wide error type
#[derive(Debug, Clone, Error, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum AppError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Storage/database error
    #[error("Storage error: {0}")]
    StorageError(String),

    /// JSON serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AppError>;

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}

/// Error returned by [`crate::client::ApiClient::request`]
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// The request never produced a response (connection refused, DNS, TLS, ...)
    #[error("{0}")]
    Transport(String),

    /// The request was cancelled after `timeout_ms` elapsed
    #[error("Request timed out")]
    Timeout { timeout_ms: u64 },

    /// The backend answered with a non-2xx status
    #[error("{message}")]
    Status {
        status: u16,
        message: String,
        details: Value,
    },

    /// The request could not be built (bad header, unencodable body)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The backend declared JSON but sent something undecodable
    #[error("Failed to decode response body: {0}")]
    Decode(String),
}

impl ApiError {
    /// Build a status error from a parsed error body.
    ///
    /// The message is taken from `body.message`, then `body.error`, then a
    /// generic fallback naming the status.
    pub fn from_status(status: u16, body: Value) -> Self {
        let message = ["message", "error"]
            .iter()
            .filter_map(|key| body.get(key))
            .find_map(message_text)
            .unwrap_or_else(|| format!("Request failed with status {status}"));

        Self::Status {
            status,
            message,
            details: body,
        }
    }

    /// HTTP status, if the failure has one (408 for timeouts)
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Timeout { .. } => Some(TIMEOUT_STATUS),
            ApiError::Transport(_) | ApiError::InvalidRequest(_) | ApiError::Decode(_) => None,
        }
    }

    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Raw parsed error body, or timeout metadata
    pub fn details(&self) -> Value {
        match self {
            ApiError::Status { details, .. } => details.clone(),
            ApiError::Timeout { timeout_ms } => json!({ "timeoutMs": timeout_ms }),
            ApiError::Transport(_) | ApiError::InvalidRequest(_) | ApiError::Decode(_) => {
                Value::Null
            }
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, ApiError::Timeout { .. })
    }
}

fn message_text(value: &Value) -> Option<String> {
    if !is_truthy(value) {
        return None;
    }
    match value {
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
