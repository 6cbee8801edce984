//! Conversation orchestrator.
//!
//! Turns a user intent into model calls and appends the results to a
//! thread's message log:
//!
//! - [`send_single`](ConversationOrchestrator::send_single): one prompt, one model
//! - [`compare`](ConversationOrchestrator::compare): one prompt, two models in parallel
//! - [`discuss`](ConversationOrchestrator::discuss): two models answering each
//!   other for a bounded number of rounds, paced and cancellable
//!
//! At most one of these runs per thread at a time. A second request for the
//! same thread fails with [`OrchestratorError::Busy`] before touching the log.
//! Different threads never wait on each other.
//!
//! ```text
//! send / compare / discuss
//!        │  validate (thread, text, models), claim writer slot
//!        ▼
//!   ModelClient::send ──► append Assistant / Error / Comparison
//!        │                       │
//!        │                       └─► ProgressNotifier, ConversationLogger
//!        ▼
//!   (discuss) cancellable_delay ──► next turn, or stop / pause
//! ```

mod compare;
mod discuss;
mod registry;
mod send;
mod threads;
mod types;


pub use types::{
    CompareOutcome, DiscussOutcome, OrchestratorError, PauseOutcome, SendOutcome, StopOutcome,
};

use crate::config::OrchestratorConfig;
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::model_client::{ModelClient, ModelReply, ModelRequest, ProviderError};
use crate::ports::progress::{NoProgress, ProgressNotifier};
use parley_domain::{Message, MessageBody, ModelCatalog, ModelDescriptor, ThreadId};
use registry::{ThreadRegistry, ThreadSlot, WriterGuard};
use std::sync::Arc;
use tracing::debug;

/// Sequences model calls and owns every thread's message log.
///
/// Shared behind an `Arc` by the front-end; all operations take `&self`.
pub struct ConversationOrchestrator {
    client: Arc<dyn ModelClient>,
    catalog: Arc<ModelCatalog>,
    config: OrchestratorConfig,
    progress: Arc<dyn ProgressNotifier>,
    conversation_logger: Arc<dyn ConversationLogger>,
    registry: ThreadRegistry,
}

impl ConversationOrchestrator {
    pub fn new(client: Arc<dyn ModelClient>, catalog: Arc<ModelCatalog>) -> Self {
        Self {
            client,
            catalog,
            config: OrchestratorConfig::default(),
            progress: Arc::new(NoProgress),
            conversation_logger: Arc::new(NoConversationLogger),
            registry: ThreadRegistry::default(),
        }
    }

    pub fn with_config(mut self, config: OrchestratorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_progress(mut self, progress: Arc<dyn ProgressNotifier>) -> Self {
        self.progress = progress;
        self
    }

    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    pub fn catalog(&self) -> &ModelCatalog {
        &self.catalog
    }

    // ==================== Shared helpers ====================

    fn slot(&self, thread_id: &ThreadId) -> Result<Arc<ThreadSlot>, OrchestratorError> {
        self.registry
            .get(thread_id)
            .ok_or_else(|| OrchestratorError::ThreadNotFound(thread_id.clone()))
    }

    /// Look up a chat thread and claim its writer slot.
    ///
    /// Validation happens first so that a rejected request never takes the
    /// slot away from a legitimate one.
    fn acquire_chat(&self, thread_id: &ThreadId) -> Result<WriterGuard, OrchestratorError> {
        let slot = self.slot(thread_id)?;
        if !slot.lock().thread.is_chat() {
            return Err(OrchestratorError::NotAChatThread(thread_id.clone()));
        }
        slot.try_acquire()
            .ok_or_else(|| OrchestratorError::Busy(thread_id.clone()))
    }

    fn resolve_model(&self, model_id: &str) -> Result<ModelDescriptor, OrchestratorError> {
        Ok(self.catalog.resolve(model_id)?.clone())
    }

    /// Append under the thread lock, then notify observers with the lock
    /// released. Returns `None` if the thread was deleted meanwhile.
    fn commit(
        &self,
        guard: &WriterGuard,
        thread_id: &ThreadId,
        body: MessageBody,
    ) -> Option<Message> {
        let message = guard.lock().append(body)?;
        self.progress.on_message_appended(thread_id, &message);
        Some(message)
    }

    /// One model call with progress callbacks around it. Never retried.
    async fn call_model(
        &self,
        thread_id: &ThreadId,
        model: &ModelDescriptor,
        message: &str,
    ) -> Result<ModelReply, ProviderError> {
        self.progress.on_model_call_start(thread_id, &model.id);
        debug!(thread = %thread_id, model = %model.id, "Dispatching model call");
        let result = self.client.send(ModelRequest::new(message, model)).await;
        self.progress
            .on_model_call_complete(thread_id, &model.id, result.is_ok());
        result
    }

    fn log_event(&self, event_type: &'static str, payload: serde_json::Value) {
        self.conversation_logger
            .log(ConversationEvent::new(event_type, payload));
    }
}

/// Reject blank prompts before anything else happens.
fn ensure_text(text: &str) -> Result<(), OrchestratorError> {
    if text.trim().is_empty() {
        Err(OrchestratorError::EmptyMessage)
    } else {
        Ok(())
    }
}
