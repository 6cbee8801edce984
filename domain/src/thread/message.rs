//! Thread messages
//!
//! A [`Message`] pairs a log-assigned [`Timestamp`] with a [`MessageBody`].
//! The body is a tagged enum with one variant per role, so fields such as the
//! comparison payload only exist where they make sense.

use super::timestamp::Timestamp;
use serde::{Deserialize, Serialize};

/// Role of a message, as shown to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    Error,
    System,
    Comparison,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::Error => "error",
            Role::System => "system",
            Role::Comparison => "comparison",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One side of a side-by-side comparison
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonEntry {
    pub id: String,
    pub response: String,
}

/// Both models' answers to the same prompt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comparison {
    pub prompt_text: String,
    pub model1: ComparisonEntry,
    pub model2: ComparisonEntry,
}

/// Message payload, tagged by role
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum MessageBody {
    User {
        content: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        model_id: Option<String>,
    },
    Assistant {
        content: String,
        model_id: String,
    },
    Error {
        content: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        model_id: Option<String>,
    },
    System {
        content: String,
    },
    Comparison(Comparison),
}

impl MessageBody {
    pub fn user(content: impl Into<String>, model_id: Option<String>) -> Self {
        Self::User {
            content: content.into(),
            model_id,
        }
    }

    pub fn assistant(content: impl Into<String>, model_id: impl Into<String>) -> Self {
        Self::Assistant {
            content: content.into(),
            model_id: model_id.into(),
        }
    }

    pub fn error(content: impl Into<String>, model_id: Option<String>) -> Self {
        Self::Error {
            content: content.into(),
            model_id,
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::System {
            content: content.into(),
        }
    }

    pub fn comparison(
        prompt_text: impl Into<String>,
        model1: (impl Into<String>, impl Into<String>),
        model2: (impl Into<String>, impl Into<String>),
    ) -> Self {
        Self::Comparison(Comparison {
            prompt_text: prompt_text.into(),
            model1: ComparisonEntry {
                id: model1.0.into(),
                response: model1.1.into(),
            },
            model2: ComparisonEntry {
                id: model2.0.into(),
                response: model2.1.into(),
            },
        })
    }

    pub fn role(&self) -> Role {
        match self {
            MessageBody::User { .. } => Role::User,
            MessageBody::Assistant { .. } => Role::Assistant,
            MessageBody::Error { .. } => Role::Error,
            MessageBody::System { .. } => Role::System,
            MessageBody::Comparison(_) => Role::Comparison,
        }
    }

    /// Main text of the message. For comparisons this is the shared prompt.
    pub fn content(&self) -> &str {
        match self {
            MessageBody::User { content, .. }
            | MessageBody::Assistant { content, .. }
            | MessageBody::Error { content, .. }
            | MessageBody::System { content } => content,
            MessageBody::Comparison(c) => &c.prompt_text,
        }
    }

    pub fn model_id(&self) -> Option<&str> {
        match self {
            MessageBody::Assistant { model_id, .. } => Some(model_id),
            MessageBody::User { model_id, .. } | MessageBody::Error { model_id, .. } => {
                model_id.as_deref()
            }
            MessageBody::System { .. } | MessageBody::Comparison(_) => None,
        }
    }

    pub fn comparison_payload(&self) -> Option<&Comparison> {
        match self {
            MessageBody::Comparison(c) => Some(c),
            _ => None,
        }
    }
}

/// A message stored in a thread's log (Entity)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub timestamp: Timestamp,
    #[serde(flatten)]
    pub body: MessageBody,
}

impl Message {
    pub fn new(timestamp: Timestamp, body: MessageBody) -> Self {
        Self { timestamp, body }
    }

    pub fn role(&self) -> Role {
        self.body.role()
    }

    pub fn content(&self) -> &str {
        self.body.content()
    }

    pub fn model_id(&self) -> Option<&str> {
        self.body.model_id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_role_and_content_accessors() {
        let body = MessageBody::assistant("hello", "gpt-4");
        assert_eq!(body.role(), Role::Assistant);
        assert_eq!(body.content(), "hello");
        assert_eq!(body.model_id(), Some("gpt-4"));
        assert!(body.comparison_payload().is_none());
    }

    #[test]
    fn test_comparison_content_is_prompt() {
        let body = MessageBody::comparison("q", ("m1", "a"), ("m2", "b"));
        assert_eq!(body.role(), Role::Comparison);
        assert_eq!(body.content(), "q");
        assert_eq!(body.model_id(), None);
        let payload = body.comparison_payload().unwrap();
        assert_eq!(payload.model1.response, "a");
        assert_eq!(payload.model2.id, "m2");
    }

    #[test]
    fn test_message_serializes_with_role_tag() {
        let msg = Message::new(Timestamp::from_millis(5), MessageBody::user("hi", None));
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(
            value,
            json!({ "timestamp": 5, "role": "user", "content": "hi" })
        );
    }

    #[test]
    fn test_comparison_deserializes_from_json() {
        let value = json!({
            "timestamp": 10,
            "role": "comparison",
            "prompt_text": "q",
            "model1": { "id": "m1", "response": "a" },
            "model2": { "id": "m2", "response": "b" }
        });
        let msg: Message = serde_json::from_value(value).unwrap();
        assert_eq!(msg.role(), Role::Comparison);
        assert_eq!(msg.body.comparison_payload().unwrap().model1.id, "m1");
    }

    #[test]
    fn test_unknown_role_is_rejected() {
        let value = json!({ "timestamp": 1, "role": "narrator", "content": "x" });
        assert!(serde_json::from_value::<Message>(value).is_err());
    }
}
