//! Composite progress notifier — delegates to multiple notifiers.
//!
//! Used to fan out orchestrator events to both the spinner and the
//! transcript printer of the terminal front-end.

use super::progress::ProgressNotifier;
use parley_domain::{DiscussionStatus, Message, ThreadId};
use std::sync::Arc;
use std::time::Duration;

/// A progress notifier that delegates to multiple inner notifiers, in order.
///
/// ```text
/// ConversationOrchestrator ──► CompositeProgressNotifier
///                                   │
///                   +───────────────+───────────────+
///                   │                               │
///          ProgressReporter (spinner)      TranscriptPrinter (stdout)
/// ```
#[derive(Clone, Default)]
pub struct CompositeProgressNotifier {
    delegates: Vec<Arc<dyn ProgressNotifier>>,
}

impl CompositeProgressNotifier {
    pub fn new(delegates: Vec<Arc<dyn ProgressNotifier>>) -> Self {
        Self { delegates }
    }

    pub fn with(mut self, delegate: Arc<dyn ProgressNotifier>) -> Self {
        self.delegates.push(delegate);
        self
    }

    pub fn len(&self) -> usize {
        self.delegates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.delegates.is_empty()
    }
}

/// Macro to delegate a method call to all inner notifiers.
macro_rules! delegate {
    ($self:ident, $method:ident $(, $arg:expr)*) => {
        for d in &$self.delegates {
            d.$method($($arg),*);
        }
    };
}

impl ProgressNotifier for CompositeProgressNotifier {
    fn on_message_appended(&self, thread_id: &ThreadId, message: &Message) {
        delegate!(self, on_message_appended, thread_id, message);
    }

    fn on_model_call_start(&self, thread_id: &ThreadId, model_id: &str) {
        delegate!(self, on_model_call_start, thread_id, model_id);
    }

    fn on_model_call_complete(&self, thread_id: &ThreadId, model_id: &str, success: bool) {
        delegate!(self, on_model_call_complete, thread_id, model_id, success);
    }

    fn on_pacing_delay(&self, thread_id: &ThreadId, delay: Duration) {
        delegate!(self, on_pacing_delay, thread_id, delay);
    }

    fn on_discussion_finished(&self, thread_id: &ThreadId, status: DiscussionStatus, round: u32) {
        delegate!(self, on_discussion_finished, thread_id, status, round);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_domain::{MessageBody, Timestamp};
    use std::sync::Mutex;

    #[derive(Default)]
    struct Counter {
        appended: Mutex<usize>,
        finished: Mutex<Vec<DiscussionStatus>>,
    }

    impl ProgressNotifier for Counter {
        fn on_message_appended(&self, _thread_id: &ThreadId, _message: &Message) {
            *self.appended.lock().unwrap() += 1;
        }

        fn on_discussion_finished(&self, _thread_id: &ThreadId, status: DiscussionStatus, _round: u32) {
            self.finished.lock().unwrap().push(status);
        }
    }

    #[test]
    fn test_delegates_to_every_notifier() {
        let a = Arc::new(Counter::default());
        let b = Arc::new(Counter::default());
        let composite = CompositeProgressNotifier::default()
            .with(a.clone())
            .with(b.clone());
        assert_eq!(composite.len(), 2);

        let thread_id = ThreadId::from("t1");
        let message = Message::new(Timestamp::from_millis(1), MessageBody::system("x"));
        composite.on_message_appended(&thread_id, &message);
        composite.on_discussion_finished(&thread_id, DiscussionStatus::Completed, 5);
        composite.on_pacing_delay(&thread_id, Duration::from_millis(5));

        for counter in [&a, &b] {
            assert_eq!(*counter.appended.lock().unwrap(), 1);
            assert_eq!(
                counter.finished.lock().unwrap().as_slice(),
                &[DiscussionStatus::Completed]
            );
        }
    }
}
