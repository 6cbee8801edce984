//! Adapter for the Anthropic Messages API

use super::http::{build_client, send_json};
use super::settings::{ProviderSettings, ProviderSetupError};
use super::{ProviderAdapter, ProviderKind};
use async_trait::async_trait;
use parley_application::{ModelReply, ModelRequest, ProviderError};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

const ANTHROPIC_VERSION: &str = "2023-06-01";

pub struct AnthropicAdapter {
    settings: ProviderSettings,
    client: Client,
}

impl AnthropicAdapter {
    pub fn new(settings: ProviderSettings) -> Result<Self, ProviderSetupError> {
        let client = build_client(&settings)?;
        Ok(Self { settings, client })
    }

    fn request_body(&self, request: &ModelRequest) -> CreateMessageRequest {
        CreateMessageRequest {
            model: request.model_id.clone(),
            messages: vec![Message {
                role: "user".to_string(),
                content: request.message.clone(),
            }],
            max_tokens: self.settings.max_tokens,
            system: self.settings.system_prompt.clone(),
        }
    }
}

#[async_trait]
impl ProviderAdapter for AnthropicAdapter {
    fn id(&self) -> &str {
        &self.settings.id
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::Anthropic
    }

    async fn complete(&self, request: &ModelRequest) -> Result<ModelReply, ProviderError> {
        let Some(api_key) = &self.settings.api_key else {
            return Err(ProviderError::auth(self.settings.missing_key_message()));
        };

        let url = self.settings.endpoint("messages");
        debug!(provider = %self.settings.id, model = %request.model_id, %url, "Sending message");

        let builder = self
            .client
            .post(&url)
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&self.request_body(request));

        let response: CreateMessageResponse =
            send_json(&self.settings.display_name, builder).await?;
        extract_text_response(response, &self.settings.display_name)
    }
}

#[derive(Debug, Serialize)]
struct CreateMessageRequest {
    model: String,
    messages: Vec<Message>,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
}

#[derive(Debug, Serialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct CreateMessageResponse {
    content: Vec<ResponseContent>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ResponseContent {
    Text {
        text: String,
    },
    #[serde(other)]
    Unsupported,
}

/// Joins every text block of the reply.
fn extract_text_response(
    response: CreateMessageResponse,
    provider: &str,
) -> Result<ModelReply, ProviderError> {
    let text: Vec<String> = response
        .content
        .into_iter()
        .filter_map(|block| match block {
            ResponseContent::Text { text } => Some(text),
            ResponseContent::Unsupported => None,
        })
        .collect();

    if text.is_empty() {
        return Err(ProviderError::other(format!(
            "{} returned no text content",
            provider
        )));
    }
    Ok(ModelReply::new(text.join("")))
}
