//! Single-model send.

use super::{ConversationOrchestrator, OrchestratorError, SendOutcome, ensure_text};
use parley_domain::{MessageBody, ThreadId};
use tracing::{info, warn};

impl ConversationOrchestrator {
    /// Send `text` to one model and append the reply (or the failure).
    ///
    /// Appends `User{text, model_id}` first, then exactly one of
    /// `Assistant{reply, model_id}` or `Error{detail, model_id}`. On success
    /// the thread remembers `model_id` as its last used model.
    pub async fn send_single(
        &self,
        thread_id: &ThreadId,
        text: &str,
        model_id: &str,
    ) -> Result<SendOutcome, OrchestratorError> {
        ensure_text(text)?;
        let model = self.resolve_model(model_id)?;
        let guard = self.acquire_chat(thread_id)?;

        info!(thread = %thread_id, model = %model.id, "Sending message");
        if self
            .commit(
                &guard,
                thread_id,
                MessageBody::user(text, Some(model.id.clone())),
            )
            .is_none()
        {
            return Ok(SendOutcome::Discarded);
        }
        self.log_event(
            "user_message",
            serde_json::json!({
                "thread_id": thread_id.as_str(),
                "model": model.id,
                "content": text,
            }),
        );

        match self.call_model(thread_id, &model, text).await {
            Ok(reply) => {
                self.log_event(
                    "model_response",
                    serde_json::json!({
                        "thread_id": thread_id.as_str(),
                        "model": model.id,
                        "content": reply.content,
                    }),
                );
                let body = MessageBody::assistant(reply.content, model.id.clone());
                let Some(message) = self.commit(&guard, thread_id, body) else {
                    return Ok(SendOutcome::Discarded);
                };
                guard.lock().thread.last_used_model_id = Some(model.id.clone());
                Ok(SendOutcome::Replied(message))
            }
            Err(error) => {
                warn!(thread = %thread_id, model = %model.id, kind = %error.kind, "Model call failed: {}", error);
                self.log_event(
                    "model_error",
                    serde_json::json!({
                        "thread_id": thread_id.as_str(),
                        "model": model.id,
                        "kind": error.kind.as_str(),
                        "detail": error.detail,
                    }),
                );
                let body = MessageBody::error(error.to_string(), Some(model.id.clone()));
                match self.commit(&guard, thread_id, body) {
                    Some(message) => Ok(SendOutcome::Failed { message, error }),
                    None => Ok(SendOutcome::Discarded),
                }
            }
        }
    }
}
