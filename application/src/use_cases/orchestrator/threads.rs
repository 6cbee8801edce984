//! Thread management: create, import, rename, clear, delete, inspect.

use super::{ConversationOrchestrator, OrchestratorError};
use crate::config::DeletionPolicy;
use parley_domain::{Message, Thread, ThreadId, ThreadKind, ThreadSummary, Timestamp};
use std::cmp::Reverse;
use tracing::info;

impl ConversationOrchestrator {
    /// Create an empty thread and return its id.
    pub fn create_thread(&self, kind: ThreadKind, name: impl Into<String>) -> ThreadId {
        let thread = Thread::new(ThreadId::generate(), name, kind, Timestamp::now());
        let id = thread.id.clone();
        self.registry.insert(thread);
        info!(thread = %id, kind = ?kind, "Thread created");
        id
    }

    /// Register a thread loaded from elsewhere (e.g. a saved session).
    ///
    /// Replaces a known thread with the same id unless an operation is in
    /// flight on it.
    pub fn import_thread(&self, thread: Thread) -> Result<ThreadId, OrchestratorError> {
        let id = thread.id.clone();
        if let Some(existing) = self.registry.get(&id)
            && existing.is_busy()
        {
            return Err(OrchestratorError::Busy(id));
        }
        self.registry.insert(thread);
        Ok(id)
    }

    pub fn rename_thread(
        &self,
        thread_id: &ThreadId,
        name: impl Into<String>,
    ) -> Result<(), OrchestratorError> {
        let slot = self.slot(thread_id)?;
        slot.lock().thread.rename(name, Timestamp::now());
        Ok(())
    }

    /// Drop the whole history of a chat thread.
    pub fn clear_thread(&self, thread_id: &ThreadId) -> Result<(), OrchestratorError> {
        let guard = self.acquire_chat(thread_id)?;
        guard.lock().thread.clear_messages(Timestamp::now())?;
        info!(thread = %thread_id, "Thread cleared");
        Ok(())
    }

    /// Remove one message. Returns `false` if no message has that timestamp.
    pub fn remove_message(
        &self,
        thread_id: &ThreadId,
        timestamp: Timestamp,
    ) -> Result<bool, OrchestratorError> {
        let slot = self.slot(thread_id)?;
        let guard = slot
            .try_acquire()
            .ok_or_else(|| OrchestratorError::Busy(thread_id.clone()))?;
        let removed = guard
            .lock()
            .thread
            .remove_message(timestamp, Timestamp::now());
        Ok(removed)
    }

    /// Forget a thread.
    ///
    /// If an operation is in flight, [`DeletionPolicy::ForceStop`] cancels
    /// its discussion and discards whatever it would still append, while
    /// [`DeletionPolicy::Reject`] refuses with `Busy`.
    pub fn delete_thread(&self, thread_id: &ThreadId) -> Result<(), OrchestratorError> {
        let slot = self.slot(thread_id)?;
        let busy = slot.is_busy();
        if busy && self.config.delete_policy == DeletionPolicy::Reject {
            return Err(OrchestratorError::Busy(thread_id.clone()));
        }

        // An operation that looked the slot up before the removal may still
        // claim it, so the slot is marked whether or not it was busy.
        self.registry.remove(thread_id);
        {
            let mut state = slot.lock();
            state.deleted = true;
            if let Some(control) = state.discussion.as_mut() {
                control.session.request_stop();
                control.cancel.cancel();
            }
        }
        if busy {
            info!(thread = %thread_id, "Deleting busy thread, in-flight results will be dropped");
        }
        info!(thread = %thread_id, "Thread deleted");
        Ok(())
    }

    /// Messages of a thread in timestamp order.
    pub fn messages(&self, thread_id: &ThreadId) -> Result<Vec<Message>, OrchestratorError> {
        let slot = self.slot(thread_id)?;
        let state = slot.lock();
        Ok(state.thread.messages.list().to_vec())
    }

    /// Snapshot of a whole thread.
    pub fn thread(&self, thread_id: &ThreadId) -> Result<Thread, OrchestratorError> {
        let slot = self.slot(thread_id)?;
        let state = slot.lock();
        Ok(state.thread.clone())
    }

    /// All known threads, most recently updated first.
    pub fn threads(&self) -> Vec<ThreadSummary> {
        let mut summaries: Vec<ThreadSummary> = self
            .registry
            .all()
            .iter()
            .map(|slot| slot.lock().thread.summary())
            .collect();
        summaries.sort_by_key(|s| Reverse(s.updated_at));
        summaries
    }

    pub fn is_busy(&self, thread_id: &ThreadId) -> bool {
        self.registry
            .get(thread_id)
            .is_some_and(|slot| slot.is_busy())
    }
}
