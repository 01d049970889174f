//! Typed errors for the flashcard generation pipeline.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to provide
//! strongly-typed, composable error handling.

use thiserror::Error;

/// Errors that can occur during flashcard generation and persistence.
#[derive(Debug, Error)]
pub enum FlashcardError {
    /// Client-caused error: missing field, unsupported type tag, bad input.
    /// Never retried; surfaced with a 4xx classification.
    #[error("validation error: {reason}")]
    Validation { reason: String },

    /// A section document is missing from the knowledge base.
    #[error("section not found: {topic_code}/{section_code}")]
    SectionNotFound {
        topic_code: String,
        section_code: String,
    },

    /// Completion service failure or a malformed/empty model response.
    /// Fatal to the enclosing generation unit; not retried.
    #[error("completion error: {0}")]
    Completion(String),

    /// Programming or data-integrity fault: attaching questions to a graph
    /// with no root event, an unknown stored type tag, a duplicate node code.
    #[error("structural error: {reason}")]
    Structural { reason: String },

    /// Storage operation failed.
    #[error("storage error: {0}")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Publishing the completion event failed.
    #[error("publish error: {0}")]
    Publish(String),
}

impl FlashcardError {
    /// Shorthand for a validation error.
    pub fn validation(reason: impl Into<String>) -> Self {
        Self::Validation {
            reason: reason.into(),
        }
    }

    /// Shorthand for a completion error.
    pub fn completion(reason: impl Into<String>) -> Self {
        Self::Completion(reason.into())
    }

    /// Shorthand for a structural error.
    pub fn structural(reason: impl Into<String>) -> Self {
        Self::Structural {
            reason: reason.into(),
        }
    }

    /// Whether the error was caused by the caller (4xx) rather than the
    /// system (5xx).
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            FlashcardError::Validation { .. } | FlashcardError::SectionNotFound { .. }
        )
    }
}

/// Result type alias for flashcard operations.
pub type Result<T> = std::result::Result<T, FlashcardError>;
