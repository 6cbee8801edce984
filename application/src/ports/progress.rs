//! Progress notification port
//!
//! Defines the interface for observing the orchestrator while it works:
//! model calls, pacing delays, committed messages and finished discussions.

use parley_domain::{DiscussionStatus, Message, ThreadId};
use std::time::Duration;

/// Callback for progress updates during orchestration
///
/// Implementations live in the presentation layer (spinners, transcript
/// printing) or in the surrounding application (persisting a thread after
/// each append). Callbacks run after the orchestrator has released its
/// locks, so they may query the orchestrator.
pub trait ProgressNotifier: Send + Sync {
    /// Called after a message is committed to a thread's log
    fn on_message_appended(&self, thread_id: &ThreadId, message: &Message);

    /// Called right before a model call is dispatched
    fn on_model_call_start(&self, _thread_id: &ThreadId, _model_id: &str) {}

    /// Called when a model call settles
    fn on_model_call_complete(&self, _thread_id: &ThreadId, _model_id: &str, _success: bool) {}

    /// Called when a discussion starts waiting between turns
    fn on_pacing_delay(&self, _thread_id: &ThreadId, _delay: Duration) {}

    /// Called when a discussion run ends (completed, stopped or paused)
    fn on_discussion_finished(&self, _thread_id: &ThreadId, _status: DiscussionStatus, _round: u32) {
    }
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl ProgressNotifier for NoProgress {
    fn on_message_appended(&self, _thread_id: &ThreadId, _message: &Message) {}
}
