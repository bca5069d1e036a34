//! Error types for model service operations

use thiserror::Error;

/// Errors raised by the model service client.
///
/// Every variant belongs to the same "connection/generation failure" category:
/// callers can match on the variant for diagnostics, but none of them is retried
/// by this crate.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ClientError {
    #[error("Not connected to model service")]
    NotConnected,

    #[error("Failed to connect to model service: {0}")]
    ConnectionFailed(String),

    #[error("Failed to {operation} (status {status}): {body}")]
    HttpStatus {
        operation: &'static str,
        status: u16,
        body: String,
    },

    #[error("Failed to {operation}: {reason}")]
    Transport {
        operation: &'static str,
        reason: String,
    },

    #[error("Invalid response payload: {0}")]
    InvalidPayload(String),

    #[error("Model not found: {0}")]
    ModelNotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ClientError {
    pub(crate) fn transport(operation: &'static str, err: reqwest::Error) -> Self {
        let reason = if err.is_timeout() {
            format!("request timed out: {}", err)
        } else if err.is_connect() {
            format!("connection refused or unreachable: {}", err)
        } else {
            err.to_string()
        };
        ClientError::Transport { operation, reason }
    }

    /// True when the failure happened because no successful `connect` preceded the call
    pub fn is_not_connected(&self) -> bool {
        matches!(self, ClientError::NotConnected)
    }
}
