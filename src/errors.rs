//! Typed error hierarchy for the TaskDeck client.
//!
//! Three top-level enums cover the three failure families:
//! - `DecodeError`: malformed bearer tokens (always fail closed)
//! - `ApiError`: transport and backend failures from the HTTP pipeline
//! - `SessionError`: login failures, wrapping `ApiError`

use thiserror::Error;

/// Errors from decoding a bearer token's claims.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Token must have exactly 3 segments, found {found}")]
    SegmentCount { found: usize },

    #[error("Token payload is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Token payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Token payload is not a JSON object")]
    NotAnObject,
}

/// Errors from a single HTTP call.
///
/// The pipeline has already classified and notified the failure by the time
/// a caller sees one of these; callers only record or inspect it.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    #[error("Request failed with status {status}{}", message_suffix(.message))]
    Status {
        status: u16,
        /// Human-readable message from the response body, if the backend sent one.
        message: Option<String>,
    },

    #[error("Could not reach the server: {0}")]
    Transport(String),

    #[error("Failed to decode response body: {0}")]
    Decode(String),
}

impl ApiError {
    /// HTTP status of the failure; 0 when no response was received.
    pub fn status(&self) -> u16 {
        match self {
            ApiError::Status { status, .. } => *status,
            ApiError::Transport(_) | ApiError::Decode(_) => 0,
        }
    }

    /// The message supplied by the backend, if any.
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            ApiError::Status { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// Backend message, or `fallback` when the backend supplied none.
    pub fn message_or(&self, fallback: &str) -> String {
        self.backend_message().unwrap_or(fallback).to_string()
    }
}

fn message_suffix(message: &Option<String>) -> String {
    message.as_deref().map(|m| format!(": {m}")).unwrap_or_default()
}

/// Errors from session transitions that talk to the backend.
#[derive(Debug, Clone, Error)]
pub enum SessionError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Login response carried no usable expiry")]
    MissingExpiry,
}
