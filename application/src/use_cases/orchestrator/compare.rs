//! Side-by-side comparison of two models.

use super::{CompareOutcome, ConversationOrchestrator, OrchestratorError, ensure_text};
use parley_domain::{MessageBody, ThreadId};
use tracing::{info, warn};

impl ConversationOrchestrator {
    /// Ask two models the same question concurrently.
    ///
    /// Appends one `User{text, model_id: model1}`, then either a single
    /// `Comparison` (both answered) or a single `Error` carrying the first
    /// failure in model1, model2 order. The other result is discarded.
    pub async fn compare(
        &self,
        thread_id: &ThreadId,
        text: &str,
        model1_id: &str,
        model2_id: &str,
    ) -> Result<CompareOutcome, OrchestratorError> {
        ensure_text(text)?;
        let model1 = self.resolve_model(model1_id)?;
        let model2 = self.resolve_model(model2_id)?;
        let guard = self.acquire_chat(thread_id)?;

        info!(thread = %thread_id, model1 = %model1.id, model2 = %model2.id, "Comparing models");
        if self
            .commit(
                &guard,
                thread_id,
                MessageBody::user(text, Some(model1.id.clone())),
            )
            .is_none()
        {
            return Ok(CompareOutcome::Discarded);
        }
        self.log_event(
            "user_message",
            serde_json::json!({
                "thread_id": thread_id.as_str(),
                "model": model1.id,
                "compare_with": model2.id,
                "content": text,
            }),
        );

        let (first, second) = tokio::join!(
            self.call_model(thread_id, &model1, text),
            self.call_model(thread_id, &model2, text),
        );

        let (failed_model, error) = match (first, second) {
            (Ok(reply1), Ok(reply2)) => {
                self.log_event(
                    "comparison",
                    serde_json::json!({
                        "thread_id": thread_id.as_str(),
                        "prompt": text,
                        "model1": { "id": model1.id, "response": reply1.content },
                        "model2": { "id": model2.id, "response": reply2.content },
                    }),
                );
                let body = MessageBody::comparison(
                    text,
                    (model1.id.clone(), reply1.content),
                    (model2.id.clone(), reply2.content),
                );
                return Ok(match self.commit(&guard, thread_id, body) {
                    Some(message) => CompareOutcome::Compared(message),
                    None => CompareOutcome::Discarded,
                });
            }
            (Err(error), _) => (model1, error),
            (Ok(_), Err(error)) => (model2, error),
        };

        warn!(thread = %thread_id, model = %failed_model.id, kind = %error.kind, "Comparison failed: {}", error);
        self.log_event(
            "model_error",
            serde_json::json!({
                "thread_id": thread_id.as_str(),
                "model": failed_model.id,
                "kind": error.kind.as_str(),
                "detail": error.detail,
            }),
        );
        let body = MessageBody::error(error.to_string(), Some(failed_model.id.clone()));
        Ok(match self.commit(&guard, thread_id, body) {
            Some(message) => CompareOutcome::Failed {
                message,
                model_id: failed_model.id,
                error,
            },
            None => CompareOutcome::Discarded,
        })
    }
}
