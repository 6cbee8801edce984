//! Application layer for parley
//!
//! This crate contains the conversation orchestrator, the ports it talks
//! through, and its configuration. It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{DeletionPolicy, OrchestratorConfig};
pub use ports::{
    composite_progress::CompositeProgressNotifier,
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    model_client::{ModelClient, ModelReply, ModelRequest, ProviderError, ProviderErrorKind},
    progress::{NoProgress, ProgressNotifier},
};
pub use use_cases::orchestrator::{
    CompareOutcome, ConversationOrchestrator, DiscussOutcome, OrchestratorError, PauseOutcome,
    SendOutcome, StopOutcome,
};
pub use use_cases::pacing::{DelayOutcome, cancellable_delay};
