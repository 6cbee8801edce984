//! Append-only, timestamp-ordered message log of a chat thread
//!
//! The log never locks: callers guarantee a single writer per thread (the
//! orchestrator's operation guard) and readers go through the same
//! per-thread state lock as that writer, so a half-finished append is never
//! observable.

use super::message::{Message, MessageBody};
use super::timestamp::Timestamp;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Message>", into = "Vec<Message>")]
pub struct MessageLog {
    messages: Vec<Message>,
    /// Highest timestamp ever handed out; survives removals and `clear`.
    high_water: Option<Timestamp>,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hydrate a log from persisted messages.
    ///
    /// Messages are stably sorted by timestamp. Timestamps that collide with
    /// (or fall behind) their predecessor after sorting are bumped forward so
    /// the strictly-increasing invariant holds from here on.
    pub fn from_messages(mut messages: Vec<Message>) -> Self {
        messages.sort_by_key(|m| m.timestamp);
        let mut last: Option<Timestamp> = None;
        for message in &mut messages {
            if let Some(prev) = last
                && message.timestamp <= prev
            {
                message.timestamp = prev.next();
            }
            last = Some(message.timestamp);
        }
        Self {
            messages,
            high_water: last,
        }
    }

    /// Append a message, assigning it a timestamp strictly after every
    /// timestamp this log has handed out.
    ///
    /// `now` is used as-is when it is ahead of the log; otherwise the message
    /// gets `last + 1ms`, so a clock that stalls or steps backwards can never
    /// insert a message into the past. Removed messages still count.
    pub fn append(&mut self, body: MessageBody, now: Timestamp) -> Message {
        let timestamp = match self.high_water {
            Some(last) if now <= last => last.next(),
            _ => now,
        };
        self.high_water = Some(timestamp);
        let message = Message::new(timestamp, body);
        self.messages.push(message.clone());
        message
    }

    /// Remove the message with the given timestamp.
    ///
    /// Returns whether a message was removed; a missing timestamp is a no-op.
    pub fn remove_by_timestamp(&mut self, timestamp: Timestamp) -> bool {
        match self
            .messages
            .binary_search_by_key(&timestamp, |m| m.timestamp)
        {
            Ok(index) => {
                self.messages.remove(index);
                true
            }
            Err(_) => false,
        }
    }

    /// Messages in timestamp order
    pub fn list(&self) -> &[Message] {
        &self.messages
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn last_timestamp(&self) -> Option<Timestamp> {
        self.messages.last().map(|m| m.timestamp)
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl From<Vec<Message>> for MessageLog {
    fn from(messages: Vec<Message>) -> Self {
        Self::from_messages(messages)
    }
}

impl From<MessageLog> for Vec<Message> {
    fn from(log: MessageLog) -> Self {
        log.messages
    }
}
