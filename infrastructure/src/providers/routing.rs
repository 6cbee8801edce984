use super::anthropic::AnthropicAdapter;
use super::openai_compat::OpenAiCompatibleAdapter;
use super::settings::{ProviderSettings, ProviderSetupError};
use super::{BUILTIN_PROVIDERS, ProviderAdapter, ProviderKind};
use crate::config::FileProviderConfig;
use async_trait::async_trait;
use parley_application::{ModelClient, ModelReply, ModelRequest, ProviderError};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::{debug, info};

/// Routes each request to the adapter registered for its provider id.
#[derive(Default)]
pub struct ProviderRouter {
    adapters: HashMap<String, Arc<dyn ProviderAdapter>>,
}

impl ProviderRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an adapter under its own id, replacing any previous one.
    pub fn with_adapter(mut self, adapter: Arc<dyn ProviderAdapter>) -> Self {
        self.adapters.insert(adapter.id().to_string(), adapter);
        self
    }

    /// Build adapters for every built-in provider and every configured
    /// `[providers.<id>]` section, reading API keys from the process
    /// environment.
    pub fn from_config(
        providers: &BTreeMap<String, FileProviderConfig>,
    ) -> Result<Self, ProviderSetupError> {
        Self::from_config_with_env(providers, |name| std::env::var(name).ok())
    }

    pub fn from_config_with_env(
        providers: &BTreeMap<String, FileProviderConfig>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ProviderSetupError> {
        let mut ids: Vec<&str> = BUILTIN_PROVIDERS.iter().map(|p| p.id).collect();
        for id in providers.keys() {
            if !ids.contains(&id.as_str()) {
                ids.push(id);
            }
        }

        let mut router = Self::new();
        for id in ids {
            let settings = ProviderSettings::resolve(id, providers.get(id), &env)?;
            debug!(
                provider = %settings.id,
                kind = %settings.kind,
                base_url = %settings.base_url,
                has_key = settings.api_key.is_some(),
                "Provider configured"
            );
            router = router.with_adapter(build_adapter(settings)?);
        }
        info!(providers = router.adapters.len(), "Provider router ready");
        Ok(router)
    }

    pub fn provider_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.adapters.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    fn resolve_provider(&self, provider_id: &str) -> Result<&dyn ProviderAdapter, ProviderError> {
        self.adapters
            .get(provider_id)
            .map(|adapter| adapter.as_ref())
            .ok_or_else(|| {
                ProviderError::invalid_model(format!("Unknown provider: {}", provider_id))
            })
    }
}

fn build_adapter(settings: ProviderSettings) -> Result<Arc<dyn ProviderAdapter>, ProviderSetupError> {
    Ok(match settings.kind {
        ProviderKind::OpenAiCompatible => Arc::new(OpenAiCompatibleAdapter::new(settings)?),
        ProviderKind::Anthropic => Arc::new(AnthropicAdapter::new(settings)?),
    })
}

#[async_trait]
impl ModelClient for ProviderRouter {
    async fn send(&self, request: ModelRequest) -> Result<ModelReply, ProviderError> {
        self.resolve_provider(&request.provider_id)?
            .complete(&request)
            .await
    }
}
