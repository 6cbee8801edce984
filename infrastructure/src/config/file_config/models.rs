//! Model catalog configuration from TOML (`[models]` section)

use parley_domain::{
    ConfigIssue, ConfigIssueCode, DEFAULT_MODEL_ID, ModelCatalog, ModelDescriptor,
};
use serde::{Deserialize, Serialize};

/// A model added on top of the built-in catalog
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileCustomModel {
    pub id: String,
    /// Display name; defaults to the id
    pub name: Option<String>,
    /// Provider id, e.g. "openai" or a custom `[providers.<id>]` entry
    pub provider: String,
    pub max_tokens: Option<u32>,
}

/// Model catalog configuration from TOML
///
/// # Example
///
/// ```toml
/// [models]
/// default = "claude-3-5-sonnet-20241022"
/// disabled = ["gpt-4-vision-preview"]
///
/// [[models.custom]]
/// id = "llama3.1"
/// name = "Llama 3.1 (local)"
/// provider = "ollama"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileModelsConfig {
    /// Model used when none is given on the command line
    pub default: Option<String>,
    /// Built-in models to hide
    pub disabled: Vec<String>,
    /// Extra models
    pub custom: Vec<FileCustomModel>,
}

impl FileModelsConfig {
    /// The configured default model id, or the built-in default.
    pub fn default_model(&self) -> &str {
        match self.default.as_deref() {
            Some(id) if !id.trim().is_empty() => id,
            _ => DEFAULT_MODEL_ID,
        }
    }

    /// Build the catalog: built-in models, then custom models (replacing
    /// built-ins with the same id), then the disabled list.
    pub fn build_catalog(&self) -> ModelCatalog {
        let mut catalog = ModelCatalog::builtin();
        for custom in &self.custom {
            if custom.id.trim().is_empty() {
                continue;
            }
            catalog = catalog.with_model(ModelDescriptor::new(
                custom.id.clone(),
                custom.name.clone().unwrap_or_else(|| custom.id.clone()),
                custom.provider.clone(),
                custom.max_tokens.unwrap_or(4_096),
            ));
        }
        for id in &self.disabled {
            catalog = catalog.with_disabled(id);
        }
        catalog
    }

    /// Check model ids. `known_providers` lists every provider id an adapter
    /// can be built for.
    pub fn validate(&self, known_providers: &[String]) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        if let Some(default) = &self.default
            && default.trim().is_empty()
        {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::EmptyModelName {
                    field: "default".to_string(),
                },
                "models.default: model name cannot be empty",
            ));
        }

        for (i, custom) in self.custom.iter().enumerate() {
            if custom.id.trim().is_empty() {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::EmptyModelName {
                        field: format!("custom[{}].id", i),
                    },
                    format!("models.custom[{}].id: model name cannot be empty", i),
                ));
                continue;
            }
            if !known_providers.iter().any(|p| *p == custom.provider) {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::UnknownProvider {
                        model: custom.id.clone(),
                        provider: custom.provider.clone(),
                    },
                    format!(
                        "models.custom: '{}' uses provider '{}', which is not configured",
                        custom.id, custom.provider
                    ),
                ));
            }
        }

        if self.default.is_some() && self.build_catalog().resolve(self.default_model()).is_err() {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::InvalidEnumValue {
                    field: "models.default".to_string(),
                    value: self.default_model().to_string(),
                    valid_values: Vec::new(),
                },
                format!(
                    "models.default: '{}' is not an enabled model in the catalog",
                    self.default_model()
                ),
            ));
        }

        issues
    }
}
