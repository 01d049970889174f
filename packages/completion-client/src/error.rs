//! Error types for the completion client.

use thiserror::Error;

/// Result type for completion client operations.
pub type Result<T> = std::result::Result<T, CompletionError>;

/// Completion client errors.
#[derive(Debug, Error)]
pub enum CompletionError {
    /// Configuration error (missing endpoint, missing auth token)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Network error (connection failed, timeout)
    #[error("Network error: {0}")]
    Network(String),

    /// API error (non-2xx response from the completion service)
    #[error("API error: {0}")]
    Api(String),

    /// Parse error (invalid JSON, unexpected response format)
    #[error("Parse error: {0}")]
    Parse(String),
}
