//! Provider configuration from TOML (`[providers.<id>]` sections)

use serde::{Deserialize, Serialize};

/// Settings for one model provider.
///
/// Every field is optional: built-in providers (`openai`, `anthropic`,
/// `perplexity`, `xai`, `google`) fill the gaps with their own defaults.
/// Any other id declares a custom provider and needs at least `kind` and
/// `base_url`.
///
/// ```toml
/// [providers.anthropic]
/// api_key_env = "ANTHROPIC_API_KEY"
/// timeout_secs = 60
///
/// [providers.ollama]
/// kind = "openai"
/// base_url = "http://localhost:11434/v1"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProviderConfig {
    /// Wire protocol: "openai" (chat completions) or "anthropic" (messages)
    pub kind: Option<String>,
    /// Base URL of the API
    pub base_url: Option<String>,
    /// Environment variable holding the API key
    pub api_key_env: Option<String>,
    /// Direct API key (not recommended — use env var instead)
    pub api_key: Option<String>,
    /// Max tokens per response
    pub max_tokens: Option<u32>,
    /// Request timeout in seconds
    pub timeout_secs: Option<u64>,
    /// System prompt sent with every request
    pub system_prompt: Option<String>,
}
