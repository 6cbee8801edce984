//! Model client port
//!
//! Defines the interface for sending one prompt to one model and getting
//! text back. Transport, authentication and timeouts belong to the adapter.

use async_trait::async_trait;
use parley_domain::ModelDescriptor;
use thiserror::Error;

/// A single prompt addressed to a model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelRequest {
    pub message: String,
    pub model_id: String,
    pub provider_id: String,
}

impl ModelRequest {
    pub fn new(message: impl Into<String>, model: &ModelDescriptor) -> Self {
        Self {
            message: message.into(),
            model_id: model.id.clone(),
            provider_id: model.provider_id.clone(),
        }
    }
}

/// Text returned by a model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelReply {
    pub content: String,
}

impl ModelReply {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

/// Broad failure category reported by an adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderErrorKind {
    Network,
    Auth,
    RateLimit,
    InvalidModel,
    Timeout,
    Other,
}

impl ProviderErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderErrorKind::Network => "network",
            ProviderErrorKind::Auth => "auth",
            ProviderErrorKind::RateLimit => "rate_limit",
            ProviderErrorKind::InvalidModel => "invalid_model",
            ProviderErrorKind::Timeout => "timeout",
            ProviderErrorKind::Other => "other",
        }
    }
}

impl std::fmt::Display for ProviderErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A failed model call.
///
/// Displays as the provider's error text alone, which is what ends up in
/// the thread's error message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{detail}")]
pub struct ProviderError {
    pub kind: ProviderErrorKind,
    pub detail: String,
}

impl ProviderError {
    pub fn new(kind: ProviderErrorKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }

    pub fn network(detail: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Network, detail)
    }

    pub fn auth(detail: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Auth, detail)
    }

    pub fn rate_limited(detail: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::RateLimit, detail)
    }

    pub fn invalid_model(detail: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::InvalidModel, detail)
    }

    pub fn timeout(detail: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Timeout, detail)
    }

    pub fn other(detail: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Other, detail)
    }
}

/// Client for model providers
///
/// This port defines how the orchestrator talks to models.
/// Implementations (adapters) live in the infrastructure layer.
/// The orchestrator never retries a failed call.
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Send a prompt and wait for the complete reply
    async fn send(&self, request: ModelRequest) -> Result<ModelReply, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_error_displays_detail_only() {
        let err = ProviderError::rate_limited("rate limit");
        assert_eq!(err.to_string(), "rate limit");
        assert_eq!(err.kind, ProviderErrorKind::RateLimit);
    }

    #[test]
    fn test_request_takes_provider_from_descriptor() {
        let model = ModelDescriptor::new("claude-3-haiku-20240307", "Claude 3 Haiku", "anthropic", 200_000);
        let request = ModelRequest::new("hi", &model);
        assert_eq!(request.model_id, "claude-3-haiku-20240307");
        assert_eq!(request.provider_id, "anthropic");
    }
}
