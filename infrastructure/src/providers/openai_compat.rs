//! Adapter for OpenAI-style chat completion APIs
//!
//! Used for OpenAI itself and for Perplexity, xAI, Google (through its
//! OpenAI-compatible endpoint) and any custom `kind = "openai"` provider.

use super::http::{build_client, send_json};
use super::settings::{ProviderSettings, ProviderSetupError};
use super::{ProviderAdapter, ProviderKind};
use async_trait::async_trait;
use parley_application::{ModelReply, ModelRequest, ProviderError};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub struct OpenAiCompatibleAdapter {
    settings: ProviderSettings,
    client: Client,
}

impl OpenAiCompatibleAdapter {
    pub fn new(settings: ProviderSettings) -> Result<Self, ProviderSetupError> {
        let client = build_client(&settings)?;
        Ok(Self { settings, client })
    }

    fn request_body(&self, request: &ModelRequest) -> ChatCompletionRequest {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = &self.settings.system_prompt {
            messages.push(ChatMessage {
                role: "system".to_string(),
                content: system.clone(),
            });
        }
        messages.push(ChatMessage {
            role: "user".to_string(),
            content: request.message.clone(),
        });

        ChatCompletionRequest {
            model: request.model_id.clone(),
            messages,
            max_tokens: self.settings.max_tokens,
        }
    }
}

#[async_trait]
impl ProviderAdapter for OpenAiCompatibleAdapter {
    fn id(&self) -> &str {
        &self.settings.id
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::OpenAiCompatible
    }

    async fn complete(&self, request: &ModelRequest) -> Result<ModelReply, ProviderError> {
        if self.settings.requires_key && self.settings.api_key.is_none() {
            return Err(ProviderError::auth(self.settings.missing_key_message()));
        }

        let url = self.settings.endpoint("chat/completions");
        debug!(provider = %self.settings.id, model = %request.model_id, %url, "Sending chat completion");

        let mut builder = self.client.post(&url).json(&self.request_body(request));
        if let Some(key) = &self.settings.api_key {
            builder = builder.bearer_auth(key);
        }

        let response: ChatCompletionResponse = send_json(&self.settings.display_name, builder).await?;
        extract_text_response(response, &self.settings.display_name)
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

fn extract_text_response(
    response: ChatCompletionResponse,
    provider: &str,
) -> Result<ModelReply, ProviderError> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .map(ModelReply::new)
        .ok_or_else(|| ProviderError::other(format!("{} returned no content", provider)))
}
