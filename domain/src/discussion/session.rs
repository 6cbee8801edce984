//! Discussion session entity
//!
//! State of an unattended two-model dialogue on one thread. The
//! orchestrator owns the session while the dialogue runs; this type only
//! enforces the transitions, it never performs I/O.

use crate::thread::entities::ThreadId;
use serde::{Deserialize, Serialize};

/// Rounds a discussion runs before it completes on its own
pub const DEFAULT_MAX_ROUNDS: u32 = 5;

/// Content of the system message recorded when the user stops a discussion
pub const STOPPED_BY_USER: &str = "Discussion stopped by user";

/// Lifecycle of a discussion session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscussionStatus {
    Running,
    /// Halted at a turn boundary; resumable with a new user message
    Paused,
    /// Stopped by the user; terminal
    Stopped,
    /// Ran out of rounds or hit a model failure; terminal
    Completed,
}

impl DiscussionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiscussionStatus::Running => "running",
            DiscussionStatus::Paused => "paused",
            DiscussionStatus::Stopped => "stopped",
            DiscussionStatus::Completed => "completed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, DiscussionStatus::Stopped | DiscussionStatus::Completed)
    }
}

impl std::fmt::Display for DiscussionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which side of the dialogue is speaking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Participant {
    /// Answers the running prompt
    First,
    /// Answers the first participant
    Second,
}

/// A bounded, resumable dialogue between two models (Entity)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscussionSession {
    thread_id: ThreadId,
    model1_id: String,
    model2_id: String,
    round: u32,
    max_rounds: u32,
    status: DiscussionStatus,
    pending_message: String,
    pause_requested: bool,
    stop_recorded: bool,
}

impl DiscussionSession {
    pub fn new(
        thread_id: ThreadId,
        model1_id: impl Into<String>,
        model2_id: impl Into<String>,
        max_rounds: u32,
        opening_message: impl Into<String>,
    ) -> Self {
        Self {
            thread_id,
            model1_id: model1_id.into(),
            model2_id: model2_id.into(),
            round: 0,
            max_rounds,
            status: DiscussionStatus::Running,
            pending_message: opening_message.into(),
            pause_requested: false,
            stop_recorded: false,
        }
    }

    pub fn thread_id(&self) -> &ThreadId {
        &self.thread_id
    }

    pub fn model1_id(&self) -> &str {
        &self.model1_id
    }

    pub fn model2_id(&self) -> &str {
        &self.model2_id
    }

    pub fn model_for(&self, participant: Participant) -> &str {
        match participant {
            Participant::First => &self.model1_id,
            Participant::Second => &self.model2_id,
        }
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn max_rounds(&self) -> u32 {
        self.max_rounds
    }

    pub fn status(&self) -> DiscussionStatus {
        self.status
    }

    /// Prompt the first participant answers next
    pub fn pending_message(&self) -> &str {
        &self.pending_message
    }

    pub fn involves(&self, model1_id: &str, model2_id: &str) -> bool {
        self.model1_id == model1_id && self.model2_id == model2_id
    }

    /// Record that both participants answered; the second answer seeds the
    /// next round. `round` never exceeds `max_rounds`.
    pub fn complete_round(&mut self, second_response: impl Into<String>) {
        self.pending_message = second_response.into();
        self.round = (self.round + 1).min(self.max_rounds);
    }

    pub fn is_exhausted(&self) -> bool {
        self.round >= self.max_rounds
    }

    /// Ask the session to stop. Returns `true` only on the first request
    /// for a live session; later calls and calls on a finished session do
    /// nothing.
    pub fn request_stop(&mut self) -> bool {
        if self.status.is_terminal() {
            return false;
        }
        self.status = DiscussionStatus::Stopped;
        self.pause_requested = false;
        true
    }

    pub fn is_stop_requested(&self) -> bool {
        self.status == DiscussionStatus::Stopped
    }

    /// Whether the stop notice has been handed out
    pub fn is_stop_recorded(&self) -> bool {
        self.stop_recorded
    }

    /// Returns `true` exactly once after a stop, for the caller that must
    /// append the stop notice.
    pub fn take_stop_notice(&mut self) -> bool {
        if self.status == DiscussionStatus::Stopped && !self.stop_recorded {
            self.stop_recorded = true;
            true
        } else {
            false
        }
    }

    /// Ask a running session to halt at the next turn boundary
    pub fn request_pause(&mut self) -> bool {
        if self.status != DiscussionStatus::Running || self.pause_requested {
            return false;
        }
        self.pause_requested = true;
        true
    }

    pub fn is_pause_requested(&self) -> bool {
        self.pause_requested
    }

    pub fn mark_paused(&mut self) {
        if self.status == DiscussionStatus::Running {
            self.status = DiscussionStatus::Paused;
        }
        self.pause_requested = false;
    }

    /// Natural end (rounds exhausted or a model failed). A stop that was
    /// already requested wins.
    pub fn mark_completed(&mut self) {
        if self.status != DiscussionStatus::Stopped {
            self.status = DiscussionStatus::Completed;
        }
        self.pause_requested = false;
    }

    /// Continue a paused session with a fresh user message. The round count
    /// is preserved.
    pub fn resume(&mut self, message: impl Into<String>) -> bool {
        if self.status != DiscussionStatus::Paused {
            return false;
        }
        self.status = DiscussionStatus::Running;
        self.pending_message = message.into();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(max_rounds: u32) -> DiscussionSession {
        DiscussionSession::new(ThreadId::from("t1"), "m1", "m2", max_rounds, "start")
    }

    #[test]
    fn test_new_session_is_running_at_round_zero() {
        let s = session(DEFAULT_MAX_ROUNDS);
        assert_eq!(s.status(), DiscussionStatus::Running);
        assert_eq!(s.round(), 0);
        assert_eq!(s.pending_message(), "start");
        assert_eq!(s.model_for(Participant::Second), "m2");
    }

    #[test]
    fn test_complete_round_is_bounded() {
        let mut s = session(2);
        s.complete_round("r1");
        s.complete_round("r2");
        assert!(s.is_exhausted());
        s.complete_round("r3");
        assert_eq!(s.round(), 2);
        assert_eq!(s.pending_message(), "r3");
    }

    #[test]
    fn test_stop_notice_is_taken_once() {
        let mut s = session(5);
        assert!(s.request_stop());
        assert!(!s.request_stop());
        assert!(s.take_stop_notice());
        assert!(!s.take_stop_notice());
        assert_eq!(s.status(), DiscussionStatus::Stopped);
    }

    #[test]
    fn test_stop_after_completion_is_ignored() {
        let mut s = session(5);
        s.mark_completed();
        assert!(!s.request_stop());
        assert!(!s.take_stop_notice());
        assert_eq!(s.status(), DiscussionStatus::Completed);
    }

    #[test]
    fn test_completion_does_not_override_stop() {
        let mut s = session(5);
        s.request_stop();
        s.mark_completed();
        assert_eq!(s.status(), DiscussionStatus::Stopped);
    }

    #[test]
    fn test_pause_and_resume_preserves_round() {
        let mut s = session(5);
        s.complete_round("r1");
        assert!(s.request_pause());
        assert!(!s.request_pause());
        s.mark_paused();
        assert_eq!(s.status(), DiscussionStatus::Paused);
        assert!(!s.is_pause_requested());

        assert!(s.resume("again"));
        assert_eq!(s.status(), DiscussionStatus::Running);
        assert_eq!(s.round(), 1);
        assert_eq!(s.pending_message(), "again");
    }

    #[test]
    fn test_resume_requires_paused() {
        let mut s = session(5);
        assert!(!s.resume("x"));
        s.request_stop();
        assert!(!s.resume("x"));
    }

    #[test]
    fn test_paused_session_can_still_be_stopped() {
        let mut s = session(5);
        s.request_pause();
        s.mark_paused();
        assert!(s.request_stop());
        assert!(s.take_stop_notice());
    }
}
