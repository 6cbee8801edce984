//! Per-thread state and the single-writer slot.
//!
//! Every thread the orchestrator knows about lives in a [`ThreadSlot`]. The
//! slot pairs the thread data (behind a short-lived `std::sync::Mutex`, never
//! held across an await) with an atomic writer flag. An operation that may
//! append to the thread must hold a [`WriterGuard`] for its whole duration;
//! the guard clears the flag on drop, so every exit path releases it,
//! including early returns, panics and dropped futures.

use parley_domain::{DiscussionSession, Message, MessageBody, Thread, ThreadId, Timestamp};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// A discussion session together with the token that interrupts its run.
pub(super) struct DiscussionControl {
    pub session: DiscussionSession,
    pub cancel: CancellationToken,
}

pub(super) struct ThreadState {
    pub thread: Thread,
    pub discussion: Option<DiscussionControl>,
    /// Set when the thread was deleted while an operation was in flight.
    /// Appends after this point are dropped.
    pub deleted: bool,
}

impl ThreadState {
    /// Append to the thread unless it has been deleted.
    pub fn append(&mut self, body: MessageBody) -> Option<Message> {
        if self.deleted {
            debug!(thread = %self.thread.id, "Thread deleted, dropping {} message", body.role());
            return None;
        }
        match self.thread.append(body, Timestamp::now()) {
            Ok(message) => Some(message),
            Err(e) => {
                warn!(thread = %self.thread.id, "Append rejected: {}", e);
                None
            }
        }
    }
}

pub(super) struct ThreadSlot {
    state: Mutex<ThreadState>,
    writer: AtomicBool,
}

impl ThreadSlot {
    fn new(thread: Thread) -> Self {
        Self {
            state: Mutex::new(ThreadState {
                thread,
                discussion: None,
                deleted: false,
            }),
            writer: AtomicBool::new(false),
        }
    }

    pub fn lock(&self) -> MutexGuard<'_, ThreadState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn is_busy(&self) -> bool {
        self.writer.load(Ordering::Acquire)
    }

    /// Claim the writer slot, or `None` if another operation holds it.
    pub fn try_acquire(self: &Arc<Self>) -> Option<WriterGuard> {
        self.writer
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| WriterGuard {
                slot: Arc::clone(self),
            })
    }
}

/// Exclusive right to append to one thread.
pub(super) struct WriterGuard {
    slot: Arc<ThreadSlot>,
}

impl WriterGuard {
    pub fn lock(&self) -> MutexGuard<'_, ThreadState> {
        self.slot.lock()
    }
}

impl Drop for WriterGuard {
    fn drop(&mut self) {
        self.slot.writer.store(false, Ordering::Release);
    }
}

/// Map of known threads. The map lock only covers lookups and inserts.
#[derive(Default)]
pub(super) struct ThreadRegistry {
    slots: Mutex<HashMap<ThreadId, Arc<ThreadSlot>>>,
}

impl ThreadRegistry {
    fn map(&self) -> MutexGuard<'_, HashMap<ThreadId, Arc<ThreadSlot>>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn get(&self, id: &ThreadId) -> Option<Arc<ThreadSlot>> {
        self.map().get(id).cloned()
    }

    /// Insert a thread, replacing any slot with the same id.
    pub fn insert(&self, thread: Thread) -> Arc<ThreadSlot> {
        let id = thread.id.clone();
        let slot = Arc::new(ThreadSlot::new(thread));
        self.map().insert(id, Arc::clone(&slot));
        slot
    }

    pub fn remove(&self, id: &ThreadId) -> Option<Arc<ThreadSlot>> {
        self.map().remove(id)
    }

    pub fn all(&self) -> Vec<Arc<ThreadSlot>> {
        self.map().values().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writer_slot_is_exclusive_and_released_on_drop() {
        let registry = ThreadRegistry::default();
        let slot = registry.insert(Thread::chat("t"));

        let guard = slot.try_acquire();
        assert!(guard.is_some());
        assert!(slot.is_busy());
        assert!(slot.try_acquire().is_none());

        drop(guard);
        assert!(!slot.is_busy());
        assert!(slot.try_acquire().is_some());
    }

    #[test]
    fn test_deleted_state_drops_appends() {
        let registry = ThreadRegistry::default();
        let slot = registry.insert(Thread::chat("t"));
        let mut state = slot.lock();
        assert!(state.append(MessageBody::system("kept")).is_some());
        state.deleted = true;
        assert!(state.append(MessageBody::system("dropped")).is_none());
        assert_eq!(state.thread.messages.len(), 1);
    }
}
