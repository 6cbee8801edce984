//! Unattended two-model discussion, plus stop and pause.
//!
//! One run walks this loop until it halts:
//!
//! ```text
//! ┌─► boundary ─► model1(pending) ─► append ─► boundary ─► delay
//! │                                                        │
//! │   delay ◄─ boundary ◄─ append, round += 1 ◄─ model2 ◄─ boundary
//! └────┘
//! ```
//!
//! At every boundary the run checks, in order: thread deleted, stop
//! requested, finished (model failure or rounds exhausted), pause requested.
//! A stop therefore always wins over natural completion, and the stop
//! notice is appended exactly once, after whatever the in-flight call
//! produced.

use super::registry::{DiscussionControl, WriterGuard};
use super::{
    ConversationOrchestrator, DiscussOutcome, OrchestratorError, PauseOutcome, StopOutcome,
    ensure_text,
};
use crate::ports::model_client::ProviderError;
use crate::use_cases::pacing::cancellable_delay;
use parley_domain::{
    DiscussionSession, DiscussionStatus, MessageBody, ModelDescriptor, Participant,
    STOPPED_BY_USER, ThreadId,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// The descriptor of whichever model the session seats as `participant`.
/// `None` once the session is gone.
fn seat<'a>(
    guard: &WriterGuard,
    participant: Participant,
    models: [&'a ModelDescriptor; 2],
) -> Option<&'a ModelDescriptor> {
    let state = guard.lock();
    let id = state.discussion.as_ref()?.session.model_for(participant);
    models.into_iter().find(|model| model.id == id)
}

/// Why a run left its loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Halt {
    Stopped,
    Completed,
    Paused,
    Deleted,
}

impl ConversationOrchestrator {
    /// Let two models talk to each other, starting from `text`.
    ///
    /// Appends `User{text}`, then alternates model1 and model2 turns with
    /// the configured delay in between. A round is both turns succeeding;
    /// the run completes after `max_rounds` rounds or at the first model
    /// failure, stops on [`stop`](Self::stop) and halts on
    /// [`pause`](Self::pause).
    ///
    /// If the thread holds a paused session for the same two models, that
    /// session resumes with `text` as the next prompt and keeps its round
    /// count. Any other existing session is replaced.
    pub async fn discuss(
        &self,
        thread_id: &ThreadId,
        text: &str,
        model1_id: &str,
        model2_id: &str,
    ) -> Result<DiscussOutcome, OrchestratorError> {
        ensure_text(text)?;
        let model1 = self.resolve_model(model1_id)?;
        let model2 = self.resolve_model(model2_id)?;
        let guard = self.acquire_chat(thread_id)?;

        let cancel = CancellationToken::new();
        let resumed = self.install_session(&guard, thread_id, text, &model1, &model2, &cancel);
        if resumed {
            info!(thread = %thread_id, model1 = %model1.id, model2 = %model2.id, "Resuming discussion");
        } else {
            info!(thread = %thread_id, model1 = %model1.id, model2 = %model2.id, "Starting discussion");
        }

        self.commit(&guard, thread_id, MessageBody::user(text, None));
        self.log_event(
            "user_message",
            serde_json::json!({
                "thread_id": thread_id.as_str(),
                "discussion": [model1.id, model2.id],
                "resumed": resumed,
                "content": text,
            }),
        );

        let mut calls = 0u32;
        let halt = self
            .run_rounds(&guard, thread_id, &model1, &model2, &cancel, &mut calls)
            .await;

        let status = match halt {
            Halt::Stopped => {
                self.record_stop_notice(&guard, thread_id);
                DiscussionStatus::Stopped
            }
            Halt::Completed => DiscussionStatus::Completed,
            Halt::Paused => DiscussionStatus::Paused,
            Halt::Deleted => DiscussionStatus::Stopped,
        };
        let (round, max_rounds) = guard
            .lock()
            .discussion
            .as_ref()
            .map_or((0, 0), |control| {
                (control.session.round(), control.session.max_rounds())
            });

        info!(thread = %thread_id, status = %status, round, max_rounds, calls, "Discussion finished");
        self.log_event(
            "discussion_finished",
            serde_json::json!({
                "thread_id": thread_id.as_str(),
                "status": status.as_str(),
                "round": round,
                "calls": calls,
            }),
        );
        self.progress.on_discussion_finished(thread_id, status, round);

        Ok(DiscussOutcome {
            status,
            round,
            calls,
        })
    }

    /// Put a session in place for this run. Returns `true` when a paused
    /// session was resumed.
    fn install_session(
        &self,
        guard: &WriterGuard,
        thread_id: &ThreadId,
        text: &str,
        model1: &ModelDescriptor,
        model2: &ModelDescriptor,
        cancel: &CancellationToken,
    ) -> bool {
        let mut state = guard.lock();
        let resumable = state.discussion.as_ref().is_some_and(|control| {
            control.session.status() == DiscussionStatus::Paused
                && control.session.thread_id() == thread_id
                && control.session.involves(&model1.id, &model2.id)
        });

        if resumable && let Some(control) = state.discussion.as_mut() {
            control.session.resume(text);
            control.cancel = cancel.clone();
            return true;
        }

        state.discussion = Some(DiscussionControl {
            session: DiscussionSession::new(
                thread_id.clone(),
                model1.id.clone(),
                model2.id.clone(),
                self.config.max_rounds,
                text,
            ),
            cancel: cancel.clone(),
        });
        false
    }

    async fn run_rounds(
        &self,
        guard: &WriterGuard,
        thread_id: &ThreadId,
        model1: &ModelDescriptor,
        model2: &ModelDescriptor,
        cancel: &CancellationToken,
        calls: &mut u32,
    ) -> Halt {
        loop {
            if let Some(halt) = self.boundary(guard, false) {
                return halt;
            }

            // Turn 1: the first participant answers the running prompt
            let Some(prompt) = guard
                .lock()
                .discussion
                .as_ref()
                .map(|control| control.session.pending_message().to_string())
            else {
                return Halt::Deleted;
            };
            let Some(speaker) = seat(guard, Participant::First, [model1, model2]) else {
                return Halt::Deleted;
            };
            *calls += 1;
            let first = match self.call_model(thread_id, speaker, &prompt).await {
                Ok(reply) => {
                    self.commit(
                        guard,
                        thread_id,
                        MessageBody::assistant(reply.content.clone(), speaker.id.clone()),
                    );
                    reply.content
                }
                Err(error) => {
                    self.record_turn_failure(guard, thread_id, speaker, &error);
                    return self.boundary(guard, true).unwrap_or(Halt::Completed);
                }
            };
            if let Some(halt) = self.boundary(guard, false) {
                return halt;
            }

            self.pace(thread_id, cancel).await;
            if let Some(halt) = self.boundary(guard, false) {
                return halt;
            }

            // Turn 2: the second participant answers the first; its reply
            // seeds the next round
            let Some(speaker) = seat(guard, Participant::Second, [model1, model2]) else {
                return Halt::Deleted;
            };
            *calls += 1;
            match self.call_model(thread_id, speaker, &first).await {
                Ok(reply) => {
                    self.commit(
                        guard,
                        thread_id,
                        MessageBody::assistant(reply.content.clone(), speaker.id.clone()),
                    );
                    let round = {
                        let mut state = guard.lock();
                        state.discussion.as_mut().map(|control| {
                            control.session.complete_round(reply.content);
                            control.session.round()
                        })
                    };
                    if let Some(round) = round {
                        debug!(thread = %thread_id, round, "Discussion round complete");
                        self.log_event(
                            "discussion_round",
                            serde_json::json!({
                                "thread_id": thread_id.as_str(),
                                "round": round,
                                "model1": model1.id,
                                "model2": model2.id,
                            }),
                        );
                    }
                }
                Err(error) => {
                    self.record_turn_failure(guard, thread_id, speaker, &error);
                    return self.boundary(guard, true).unwrap_or(Halt::Completed);
                }
            }
            if let Some(halt) = self.boundary(guard, false) {
                return halt;
            }

            self.pace(thread_id, cancel).await;
        }
    }

    /// Decide whether the run halts here. `failed` marks a boundary right
    /// after a model failure; exhausted rounds count as finished too.
    fn boundary(&self, guard: &WriterGuard, failed: bool) -> Option<Halt> {
        let mut state = guard.lock();
        if state.deleted {
            return Some(Halt::Deleted);
        }
        let Some(control) = state.discussion.as_mut() else {
            return Some(Halt::Deleted);
        };
        let session = &mut control.session;

        if session.is_stop_requested() {
            Some(Halt::Stopped)
        } else if failed || session.is_exhausted() {
            session.mark_completed();
            Some(Halt::Completed)
        } else if session.is_pause_requested() {
            session.mark_paused();
            Some(Halt::Paused)
        } else {
            None
        }
    }

    async fn pace(&self, thread_id: &ThreadId, cancel: &CancellationToken) {
        let delay = self.config.turn_delay;
        if delay.is_zero() {
            return;
        }
        self.progress.on_pacing_delay(thread_id, delay);
        if cancellable_delay(delay, cancel).await.is_interrupted() {
            debug!(thread = %thread_id, "Turn delay interrupted");
        }
    }

    fn record_turn_failure(
        &self,
        guard: &WriterGuard,
        thread_id: &ThreadId,
        model: &ModelDescriptor,
        error: &ProviderError,
    ) {
        warn!(thread = %thread_id, model = %model.id, kind = %error.kind, "Discussion turn failed: {}", error);
        self.log_event(
            "model_error",
            serde_json::json!({
                "thread_id": thread_id.as_str(),
                "model": model.id,
                "kind": error.kind.as_str(),
                "detail": error.detail,
            }),
        );
        self.commit(
            guard,
            thread_id,
            MessageBody::error(error.to_string(), Some(model.id.clone())),
        );
    }

    /// Append the stop notice if nobody has yet.
    fn record_stop_notice(&self, guard: &WriterGuard, thread_id: &ThreadId) {
        let notice = {
            let mut state = guard.lock();
            let first = state
                .discussion
                .as_mut()
                .is_some_and(|control| control.session.take_stop_notice());
            if first {
                state.append(MessageBody::system(STOPPED_BY_USER))
            } else {
                None
            }
        };
        if let Some(message) = notice {
            self.progress.on_message_appended(thread_id, &message);
        }
    }

    /// Stop the discussion on a thread. Safe to call any number of times.
    ///
    /// A running discussion is told to stop and woken from its delay; it
    /// appends the stop notice itself after its in-flight call settles. A
    /// paused discussion is stopped here, which needs the thread's writer
    /// slot.
    pub fn stop(&self, thread_id: &ThreadId) -> Result<StopOutcome, OrchestratorError> {
        let slot = self.slot(thread_id)?;
        {
            let mut state = slot.lock();
            let Some(control) = state.discussion.as_mut() else {
                return Ok(StopOutcome::NoDiscussion);
            };
            match control.session.status() {
                DiscussionStatus::Running => {
                    control.session.request_stop();
                    control.cancel.cancel();
                    info!(thread = %thread_id, round = control.session.round(), "Discussion stop requested");
                    return Ok(StopOutcome::Requested);
                }
                DiscussionStatus::Stopped if !control.session.is_stop_recorded() => {
                    return Ok(StopOutcome::AlreadyStopping);
                }
                DiscussionStatus::Stopped | DiscussionStatus::Completed => {
                    return Ok(StopOutcome::NoDiscussion);
                }
                DiscussionStatus::Paused => {}
            }
        }

        let guard = slot
            .try_acquire()
            .ok_or_else(|| OrchestratorError::Busy(thread_id.clone()))?;
        let notice = {
            let mut state = guard.lock();
            let stopped = state.discussion.as_mut().is_some_and(|control| {
                control.session.status() == DiscussionStatus::Paused
                    && control.session.request_stop()
                    && control.session.take_stop_notice()
            });
            if !stopped {
                return Ok(StopOutcome::NoDiscussion);
            }
            state.append(MessageBody::system(STOPPED_BY_USER))
        };
        if let Some(message) = notice {
            self.progress.on_message_appended(thread_id, &message);
        }
        info!(thread = %thread_id, "Paused discussion stopped");
        Ok(StopOutcome::Stopped)
    }

    /// Ask a running discussion to halt at its next turn boundary.
    ///
    /// The session is kept; calling [`discuss`](Self::discuss) with the same
    /// two models resumes it.
    pub fn pause(&self, thread_id: &ThreadId) -> Result<PauseOutcome, OrchestratorError> {
        let slot = self.slot(thread_id)?;
        let mut state = slot.lock();
        let Some(control) = state.discussion.as_mut() else {
            return Ok(PauseOutcome::NotRunning);
        };
        if !control.session.request_pause() {
            return Ok(PauseOutcome::NotRunning);
        }
        control.cancel.cancel();
        info!(thread = %thread_id, round = control.session.round(), "Discussion pause requested");
        Ok(PauseOutcome::Requested)
    }

    /// Snapshot of the thread's discussion session, if it has one.
    pub fn discussion(
        &self,
        thread_id: &ThreadId,
    ) -> Result<Option<DiscussionSession>, OrchestratorError> {
        let slot = self.slot(thread_id)?;
        let state = slot.lock();
        Ok(state
            .discussion
            .as_ref()
            .map(|control| control.session.clone()))
    }
}
