//! Model provider adapters
//!
//! Each adapter speaks one wire protocol. [`routing::ProviderRouter`] picks
//! the adapter for a request by the model's provider id and is the
//! [`ModelClient`](parley_application::ModelClient) the orchestrator sees.

pub mod anthropic;
pub mod http;
pub mod openai_compat;
pub mod routing;
pub mod settings;

use async_trait::async_trait;
use parley_application::{ModelReply, ModelRequest, ProviderError};
use std::str::FromStr;

/// Wire protocol spoken by a provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    /// `POST {base_url}/chat/completions`
    OpenAiCompatible,
    /// `POST {base_url}/messages`
    Anthropic,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::OpenAiCompatible => "openai",
            ProviderKind::Anthropic => "anthropic",
        }
    }
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openai" | "openai-compatible" | "openai_compatible" => {
                Ok(ProviderKind::OpenAiCompatible)
            }
            "anthropic" => Ok(ProviderKind::Anthropic),
            _ => Err(format!("unknown provider kind: {}", s)),
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A provider the client knows without any configuration
#[derive(Debug, Clone, Copy)]
pub struct BuiltinProvider {
    pub id: &'static str,
    pub display_name: &'static str,
    pub kind: ProviderKind,
    pub base_url: &'static str,
    /// Environment variables checked for the API key, in order
    pub api_key_envs: &'static [&'static str],
    pub system_prompt: Option<&'static str>,
}

pub const BUILTIN_PROVIDERS: &[BuiltinProvider] = &[
    BuiltinProvider {
        id: "openai",
        display_name: "OpenAI",
        kind: ProviderKind::OpenAiCompatible,
        base_url: "https://api.openai.com/v1",
        api_key_envs: &["OPENAI_API_KEY"],
        system_prompt: None,
    },
    BuiltinProvider {
        id: "anthropic",
        display_name: "Anthropic",
        kind: ProviderKind::Anthropic,
        base_url: "https://api.anthropic.com/v1",
        api_key_envs: &["ANTHROPIC_API_KEY"],
        system_prompt: Some("You are a helpful AI assistant."),
    },
    BuiltinProvider {
        id: "perplexity",
        display_name: "Perplexity",
        kind: ProviderKind::OpenAiCompatible,
        base_url: "https://api.perplexity.ai",
        api_key_envs: &["PERPLEXITY_API_KEY"],
        system_prompt: Some("Be precise and concise."),
    },
    BuiltinProvider {
        id: "xai",
        display_name: "xAI",
        kind: ProviderKind::OpenAiCompatible,
        base_url: "https://api.x.ai/v1",
        api_key_envs: &["XAI_API_KEY", "GROK_API_KEY"],
        system_prompt: None,
    },
    BuiltinProvider {
        id: "google",
        display_name: "Google",
        kind: ProviderKind::OpenAiCompatible,
        base_url: "https://generativelanguage.googleapis.com/v1beta/openai",
        api_key_envs: &["GOOGLE_API_KEY", "GEMINI_API_KEY"],
        system_prompt: None,
    },
];

pub fn builtin_provider(id: &str) -> Option<&'static BuiltinProvider> {
    BUILTIN_PROVIDERS.iter().find(|p| p.id == id)
}

/// One provider endpoint
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    fn id(&self) -> &str;
    fn kind(&self) -> ProviderKind;
    async fn complete(&self, request: &ModelRequest) -> Result<ModelReply, ProviderError>;
}
