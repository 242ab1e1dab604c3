//! Error types for agent operations.

use thiserror::Error;

/// Errors that can occur while calling a hosted language model.
#[derive(Error, Debug)]
pub enum AgentError {
    /// Network connectivity error (DNS, connection refused, etc.).
    #[error("Network error: {0}")]
    Network(String),

    /// Request exceeded deadline.
    #[error("Request timeout after {0}ms")]
    Timeout(u64),

    /// Provider returned an error response (4xx, 5xx).
    #[error("Provider error {status}: {message}")]
    Upstream { status: u16, message: String },

    /// Provider response doesn't match the expected format.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Agent configuration error (missing API key, bad URL).
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl AgentError {
    /// Map a reqwest send error, distinguishing timeouts.
    pub(crate) fn from_send(error: reqwest::Error, timeout_ms: u64) -> Self {
        if error.is_timeout() {
            AgentError::Timeout(timeout_ms)
        } else {
            AgentError::Network(error.to_string())
        }
    }
}
