//! Thread domain entities

use super::message::{Message, MessageBody};
use super::message_log::MessageLog;
use super::timestamp::Timestamp;
use crate::core::error::DomainError;
use crate::util::preview;
use serde::{Deserialize, Serialize};

/// Identifier of a thread (Value Object)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThreadId(String);

impl ThreadId {
    /// Generate a fresh random id
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ThreadId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ThreadId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ThreadId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// What a thread holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThreadKind {
    /// A conversation with one or more models
    Chat,
    /// A free-form note; has no message log
    Note,
}

/// A conversation or note container (Entity)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thread {
    pub id: ThreadId,
    pub name: String,
    pub kind: ThreadKind,
    #[serde(default)]
    pub messages: MessageLog,
    #[serde(default)]
    pub note_content: String,
    #[serde(default)]
    pub last_used_model_id: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Thread {
    pub fn new(id: ThreadId, name: impl Into<String>, kind: ThreadKind, now: Timestamp) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
            messages: MessageLog::new(),
            note_content: String::new(),
            last_used_model_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// New chat thread with a generated id
    pub fn chat(name: impl Into<String>) -> Self {
        Self::new(ThreadId::generate(), name, ThreadKind::Chat, Timestamp::now())
    }

    /// New note thread with a generated id
    pub fn note(name: impl Into<String>) -> Self {
        Self::new(ThreadId::generate(), name, ThreadKind::Note, Timestamp::now())
    }

    pub fn with_last_used_model(mut self, model_id: impl Into<String>) -> Self {
        self.last_used_model_id = Some(model_id.into());
        self
    }

    pub fn is_chat(&self) -> bool {
        self.kind == ThreadKind::Chat
    }

    fn ensure_chat(&self) -> Result<(), DomainError> {
        if self.is_chat() {
            Ok(())
        } else {
            Err(DomainError::NotAChatThread(self.id.to_string()))
        }
    }

    /// Append to the message log and bump `updated_at`
    pub fn append(&mut self, body: MessageBody, now: Timestamp) -> Result<Message, DomainError> {
        self.ensure_chat()?;
        let message = self.messages.append(body, now);
        self.touch(message.timestamp);
        Ok(message)
    }

    /// Remove one message; missing timestamps are a no-op
    pub fn remove_message(&mut self, timestamp: Timestamp, now: Timestamp) -> bool {
        let removed = self.messages.remove_by_timestamp(timestamp);
        if removed {
            self.touch(now);
        }
        removed
    }

    /// Drop the whole history of a chat thread
    pub fn clear_messages(&mut self, now: Timestamp) -> Result<(), DomainError> {
        self.ensure_chat()?;
        self.messages.clear();
        self.touch(now);
        Ok(())
    }

    pub fn rename(&mut self, name: impl Into<String>, now: Timestamp) {
        self.name = name.into();
        self.touch(now);
    }

    fn touch(&mut self, now: Timestamp) {
        if now > self.updated_at {
            self.updated_at = now;
        }
    }

    pub fn summary(&self) -> ThreadSummary {
        ThreadSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            kind: self.kind,
            message_count: self.messages.len(),
            last_message_preview: self.messages.last().map(|m| preview(m.content(), 60)),
            last_message_at: self.messages.last_timestamp(),
            updated_at: self.updated_at,
        }
    }
}

/// Lightweight listing entry for a thread
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreadSummary {
    pub id: ThreadId,
    pub name: String,
    pub kind: ThreadKind,
    pub message_count: usize,
    pub last_message_preview: Option<String>,
    /// Timestamp of the newest message, `None` for an empty thread
    #[serde(default)]
    pub last_message_at: Option<Timestamp>,
    pub updated_at: Timestamp,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(ms: i64) -> Timestamp {
        Timestamp::from_millis(ms)
    }

    fn chat() -> Thread {
        Thread::new(ThreadId::from("t1"), "Chat", ThreadKind::Chat, ts(0))
    }

    #[test]
    fn test_append_touches_updated_at() {
        let mut thread = chat();
        let message = thread.append(MessageBody::user("hi", None), ts(50)).unwrap();
        assert_eq!(message.timestamp, ts(50));
        assert_eq!(thread.updated_at, ts(50));
    }

    #[test]
    fn test_note_rejects_messages() {
        let mut note = Thread::new(ThreadId::from("n1"), "Note", ThreadKind::Note, ts(0));
        let err = note.append(MessageBody::user("hi", None), ts(1)).unwrap_err();
        assert_eq!(err, DomainError::NotAChatThread("n1".to_string()));
        assert!(note.clear_messages(ts(2)).is_err());
        assert!(note.messages.is_empty());
    }

    #[test]
    fn test_clear_messages() {
        let mut thread = chat();
        thread.append(MessageBody::user("a", None), ts(1)).unwrap();
        thread.append(MessageBody::assistant("b", "m"), ts(2)).unwrap();
        thread.clear_messages(ts(3)).unwrap();
        assert!(thread.messages.is_empty());
        assert_eq!(thread.updated_at, ts(3));
    }

    #[test]
    fn test_summary_previews_last_message() {
        let mut thread = chat();
        thread
            .append(MessageBody::assistant("line one\nline two", "m"), ts(9))
            .unwrap();
        let summary = thread.summary();
        assert_eq!(summary.message_count, 1);
        assert_eq!(summary.last_message_preview.as_deref(), Some("line one line two"));
        assert_eq!(summary.last_message_at, Some(ts(9)));
        assert_eq!(summary.updated_at, ts(9));
    }

    #[test]
    fn test_generated_ids_are_unique() {
        assert_ne!(ThreadId::generate(), ThreadId::generate());
    }

    #[test]
    fn test_thread_deserializes_without_optional_fields() {
        let json = r#"{"id":"x","name":"N","kind":"note","created_at":1,"updated_at":2}"#;
        let thread: Thread = serde_json::from_str(json).unwrap();
        assert_eq!(thread.kind, ThreadKind::Note);
        assert!(thread.messages.is_empty());
        assert!(thread.last_used_model_id.is_none());
    }
}
