//! Inputs, outcomes and errors of the conversation orchestrator.

use crate::ports::model_client::ProviderError;
use parley_domain::{DiscussionStatus, DomainError, Message, ThreadId};
use thiserror::Error;

/// Errors returned synchronously by orchestrator operations.
///
/// Every variant is raised before anything is appended to the thread.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OrchestratorError {
    #[error("Thread {0} is busy with another operation")]
    Busy(ThreadId),

    #[error("Invalid model: {0}")]
    InvalidModel(String),

    #[error("Thread not found: {0}")]
    ThreadNotFound(ThreadId),

    #[error("Thread {0} is a note, not a chat thread")]
    NotAChatThread(ThreadId),

    #[error("Message cannot be empty")]
    EmptyMessage,
}

impl From<DomainError> for OrchestratorError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::InvalidModel(id) | DomainError::DisabledModel(id) => {
                OrchestratorError::InvalidModel(id)
            }
            DomainError::EmptyMessage => OrchestratorError::EmptyMessage,
            DomainError::NotAChatThread(id) => OrchestratorError::NotAChatThread(ThreadId::from(id)),
        }
    }
}

/// Result of [`send_single`](super::ConversationOrchestrator::send_single)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// The assistant message that was appended
    Replied(Message),
    /// The model failed; an error message was appended
    Failed { message: Message, error: ProviderError },
    /// The thread was deleted while the call was in flight; nothing landed
    Discarded,
}

/// Result of [`compare`](super::ConversationOrchestrator::compare)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompareOutcome {
    /// Both models answered; holds the appended comparison message
    Compared(Message),
    /// A model failed; holds the appended error message
    Failed {
        message: Message,
        model_id: String,
        error: ProviderError,
    },
    Discarded,
}

/// Result of a discussion run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiscussOutcome {
    pub status: DiscussionStatus,
    /// Completed rounds, including rounds from before a pause
    pub round: u32,
    /// Model calls dispatched during this run
    pub calls: u32,
}

/// Result of [`stop`](super::ConversationOrchestrator::stop)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopOutcome {
    /// A running discussion was told to stop; it records the stop itself
    Requested,
    /// A stop is already pending for the running discussion
    AlreadyStopping,
    /// A paused discussion was stopped and the stop recorded
    Stopped,
    /// Nothing to stop
    NoDiscussion,
}

/// Result of [`pause`](super::ConversationOrchestrator::pause)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PauseOutcome {
    /// The running discussion halts at its next turn boundary
    Requested,
    /// No running discussion, or a pause or stop is already pending
    NotRunning,
}
