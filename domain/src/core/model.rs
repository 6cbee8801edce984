//! Model descriptors and the static model catalog

use super::error::DomainError;
use serde::{Deserialize, Serialize};

/// Description of a model a provider can serve (Value Object)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelDescriptor {
    /// Identifier sent to the provider, e.g. `gpt-4`
    pub id: String,
    /// Human readable name
    pub display_name: String,
    /// Provider that serves this model, e.g. `openai`
    pub provider_id: String,
    /// Context window advertised by the provider
    pub max_tokens: u32,
    /// Disabled models stay listed but cannot be used
    pub enabled: bool,
}

impl ModelDescriptor {
    pub fn new(
        id: impl Into<String>,
        display_name: impl Into<String>,
        provider_id: impl Into<String>,
        max_tokens: u32,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            provider_id: provider_id.into(),
            max_tokens,
            enabled: true,
        }
    }
}

impl std::fmt::Display for ModelDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.display_name, self.id)
    }
}

/// Catalog of models known to the client.
///
/// Built once at startup (built-in list plus configuration overrides) and
/// immutable afterwards; the orchestrator only reads from it.
#[derive(Debug, Clone, Default)]
pub struct ModelCatalog {
    models: Vec<ModelDescriptor>,
}

/// Model used when neither the CLI nor the config names one
pub const DEFAULT_MODEL_ID: &str = "gpt-4";

impl ModelCatalog {
    pub fn new(models: Vec<ModelDescriptor>) -> Self {
        Self { models }
    }

    /// The models shipped with the client
    pub fn builtin() -> Self {
        let m = ModelDescriptor::new;
        Self::new(vec![
            // OpenAI
            m("gpt-4-0125-preview", "GPT-4 Turbo", "openai", 128_000),
            m("gpt-4-vision-preview", "GPT-4 Vision", "openai", 128_000),
            m("gpt-4", "GPT-4", "openai", 8_192),
            m("gpt-4-32k", "GPT-4 32k", "openai", 32_768),
            m("gpt-3.5-turbo-0125", "GPT-3.5 Turbo", "openai", 16_384),
            m("gpt-3.5-turbo-16k-0613", "GPT-3.5 Turbo 16k", "openai", 16_384),
            // Anthropic
            m("claude-3-opus-20240229", "Claude 3 Opus", "anthropic", 200_000),
            m("claude-3-sonnet-20240229", "Claude 3 Sonnet", "anthropic", 200_000),
            m("claude-3-haiku-20240307", "Claude 3 Haiku", "anthropic", 200_000),
            // Perplexity
            m(
                "llama-3.1-sonar-small-128k-online",
                "Sonar Small Online (8B)",
                "perplexity",
                128_000,
            ),
            m(
                "llama-3.1-sonar-large-128k-online",
                "Sonar Large Online (70B)",
                "perplexity",
                128_000,
            ),
            m(
                "llama-3.1-sonar-huge-128k-online",
                "Sonar Huge Online (405B)",
                "perplexity",
                128_000,
            ),
            m(
                "llama-3.1-sonar-small-128k-chat",
                "Sonar Small Chat (8B)",
                "perplexity",
                128_000,
            ),
            m(
                "llama-3.1-sonar-large-128k-chat",
                "Sonar Large Chat (70B)",
                "perplexity",
                128_000,
            ),
            m("llama-3.1-8b-instruct", "Llama 3.1 8B", "perplexity", 4_096),
            m("llama-3.1-70b-instruct", "Llama 3.1 70B", "perplexity", 4_096),
            // xAI
            m("grok-beta", "Grok Beta", "xai", 4_096),
            // Google
            m("gemini-pro", "Gemini Pro", "google", 32_768),
            m("gemini-pro-vision", "Gemini Pro Vision", "google", 32_768),
        ])
    }

    /// Add a model, replacing any existing entry with the same id
    pub fn with_model(mut self, model: ModelDescriptor) -> Self {
        match self.models.iter_mut().find(|m| m.id == model.id) {
            Some(existing) => *existing = model,
            None => self.models.push(model),
        }
        self
    }

    /// Mark a model as disabled. Unknown ids are ignored.
    pub fn with_disabled(mut self, id: &str) -> Self {
        if let Some(model) = self.models.iter_mut().find(|m| m.id == id) {
            model.enabled = false;
        }
        self
    }

    pub fn get(&self, id: &str) -> Option<&ModelDescriptor> {
        self.models.iter().find(|m| m.id == id)
    }

    /// Look up a model that may be used for a request
    pub fn resolve(&self, id: &str) -> Result<&ModelDescriptor, DomainError> {
        match self.get(id) {
            Some(model) if model.enabled => Ok(model),
            Some(_) => Err(DomainError::DisabledModel(id.to_string())),
            None => Err(DomainError::InvalidModel(id.to_string())),
        }
    }

    pub fn all(&self) -> &[ModelDescriptor] {
        &self.models
    }

    pub fn enabled(&self) -> impl Iterator<Item = &ModelDescriptor> {
        self.models.iter().filter(|m| m.enabled)
    }

    /// Distinct provider ids, in catalog order
    pub fn providers(&self) -> Vec<&str> {
        let mut providers: Vec<&str> = Vec::new();
        for model in &self.models {
            if !providers.contains(&model.provider_id.as_str()) {
                providers.push(&model.provider_id);
            }
        }
        providers
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_contains_default_model() {
        let catalog = ModelCatalog::builtin();
        let model = catalog.resolve(DEFAULT_MODEL_ID).unwrap();
        assert_eq!(model.provider_id, "openai");
    }

    #[test]
    fn test_resolve_unknown_model() {
        let catalog = ModelCatalog::builtin();
        assert_eq!(
            catalog.resolve("gpt-9"),
            Err(DomainError::InvalidModel("gpt-9".to_string()))
        );
    }

    #[test]
    fn test_disabled_model_is_rejected() {
        let catalog = ModelCatalog::builtin().with_disabled("grok-beta");
        assert!(catalog.get("grok-beta").is_some());
        assert_eq!(
            catalog.resolve("grok-beta"),
            Err(DomainError::DisabledModel("grok-beta".to_string()))
        );
        assert!(catalog.enabled().all(|m| m.id != "grok-beta"));
    }

    #[test]
    fn test_with_model_replaces_existing_entry() {
        let catalog = ModelCatalog::builtin();
        let before = catalog.len();
        let catalog = catalog
            .with_model(ModelDescriptor::new("gpt-4", "GPT-4 (proxy)", "openai", 8_192))
            .with_model(ModelDescriptor::new("local-llama", "Local", "openai", 4_096));

        assert_eq!(catalog.len(), before + 1);
        assert_eq!(catalog.get("gpt-4").unwrap().display_name, "GPT-4 (proxy)");
    }

    #[test]
    fn test_providers_are_distinct_and_ordered() {
        let catalog = ModelCatalog::builtin();
        assert_eq!(
            catalog.providers(),
            vec!["openai", "anthropic", "perplexity", "xai", "google"]
        );
    }
}
