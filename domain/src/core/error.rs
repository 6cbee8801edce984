//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid model: {0}")]
    InvalidModel(String),

    #[error("Model is disabled: {0}")]
    DisabledModel(String),

    #[error("Message cannot be empty")]
    EmptyMessage,

    #[error("Thread {0} is a note, not a chat thread")]
    NotAChatThread(String),
}

impl DomainError {
    /// Check if this error comes from a model lookup
    pub fn is_model_error(&self) -> bool {
        matches!(
            self,
            DomainError::InvalidModel(_) | DomainError::DisabledModel(_)
        )
    }
}
