//! Error types for LLM completion operations

use thiserror::Error;

/// Errors that can occur while requesting a chat completion.
#[derive(Error, Debug)]
pub enum CompletionError {
    /// Failed to reach the completion service
    #[error("failed to connect to completion service: {0}")]
    Connection(String),

    /// Request timeout
    #[error("completion request timed out after {0} seconds")]
    Timeout(u64),

    /// The service answered with something other than a completion
    #[error("invalid completion response: {0}")]
    InvalidResponse(String),

    /// Failed to parse the service payload
    #[error("failed to parse completion payload: {0}")]
    Parse(String),
}

impl From<serde_json::Error> for CompletionError {
    fn from(err: serde_json::Error) -> Self {
        CompletionError::Parse(err.to_string())
    }
}

impl CompletionError {
    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(self, CompletionError::Connection(_) | CompletionError::Timeout(_))
    }
}

/// Result type for completion operations.
pub type CompletionResult<T> = Result<T, CompletionError>;
