//! Effective provider settings
//!
//! Merges a built-in provider's defaults with its `[providers.<id>]`
//! section and the environment.

use super::{ProviderKind, builtin_provider};
use crate::config::FileProviderConfig;
use std::time::Duration;
use thiserror::Error;

/// Reply length cap sent with every request
pub const DEFAULT_MAX_TOKENS: u32 = 1024;

/// Request timeout when the config does not set one
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// A provider section that cannot be turned into an adapter
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderSetupError {
    #[error("Unknown provider '{0}': custom providers need 'kind' and 'base_url'")]
    UnknownProvider(String),

    #[error("Provider '{provider}' has unknown kind '{value}'")]
    InvalidKind { provider: String, value: String },

    #[error("Failed to build HTTP client for '{provider}': {detail}")]
    Client { provider: String, detail: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderSettings {
    pub id: String,
    pub display_name: String,
    pub kind: ProviderKind,
    pub base_url: String,
    /// Missing keys are reported when a request is sent, not at startup
    pub api_key: Option<String>,
    /// Built-in providers refuse to send without a key
    pub requires_key: bool,
    pub max_tokens: u32,
    pub timeout: Duration,
    pub system_prompt: Option<String>,
}

impl ProviderSettings {
    /// Resolve settings for `id`. `env` looks up environment variables.
    pub fn resolve(
        id: &str,
        file: Option<&FileProviderConfig>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ProviderSetupError> {
        let default_file = FileProviderConfig::default();
        let file = file.unwrap_or(&default_file);
        let builtin = builtin_provider(id);

        let kind = match (&file.kind, builtin) {
            (Some(value), _) => value
                .parse::<ProviderKind>()
                .map_err(|_| ProviderSetupError::InvalidKind {
                    provider: id.to_string(),
                    value: value.clone(),
                })?,
            (None, Some(builtin)) => builtin.kind,
            (None, None) => return Err(ProviderSetupError::UnknownProvider(id.to_string())),
        };

        let base_url = match (&file.base_url, builtin) {
            (Some(url), _) => url.clone(),
            (None, Some(builtin)) => builtin.base_url.to_string(),
            (None, None) => return Err(ProviderSetupError::UnknownProvider(id.to_string())),
        };

        let api_key = file
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .or_else(|| file.api_key_env.as_deref().and_then(&env))
            .or_else(|| {
                builtin
                    .into_iter()
                    .flat_map(|b| b.api_key_envs.iter())
                    .find_map(|name| env(*name))
            })
            .filter(|key| !key.trim().is_empty());

        Ok(Self {
            id: id.to_string(),
            display_name: builtin
                .map(|b| b.display_name.to_string())
                .unwrap_or_else(|| id.to_string()),
            kind,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            requires_key: builtin.is_some(),
            max_tokens: file.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            timeout: file
                .timeout_secs
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_TIMEOUT),
            system_prompt: file
                .system_prompt
                .clone()
                .or_else(|| builtin.and_then(|b| b.system_prompt).map(String::from)),
        })
    }

    /// Message reported when a built-in provider has no key.
    pub fn missing_key_message(&self) -> String {
        format!("{} API key not configured", self.display_name)
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}
