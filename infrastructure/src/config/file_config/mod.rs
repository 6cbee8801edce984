//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod logging;
mod models;
mod orchestrator;
mod output;
mod providers;

pub use logging::FileLoggingConfig;
pub use models::{FileCustomModel, FileModelsConfig};
pub use orchestrator::FileOrchestratorConfig;
pub use output::{FileOutputConfig, FileOutputFormat};
pub use providers::FileProviderConfig;

use crate::providers::{BUILTIN_PROVIDERS, ProviderKind};
use parley_domain::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Discussion bounds, pacing and deletion policy
    pub orchestrator: FileOrchestratorConfig,
    /// Model catalog adjustments
    pub models: FileModelsConfig,
    /// Provider settings keyed by provider id
    pub providers: BTreeMap<String, FileProviderConfig>,
    /// Output settings
    pub output: FileOutputConfig,
    /// Log file locations
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Provider ids an adapter can be built for: the built-in ones plus
    /// every `[providers.<id>]` section.
    pub fn known_providers(&self) -> Vec<String> {
        let mut ids: Vec<String> = BUILTIN_PROVIDERS
            .iter()
            .map(|p| p.id.to_string())
            .collect();
        for id in self.providers.keys() {
            if !ids.contains(id) {
                ids.push(id.clone());
            }
        }
        ids
    }

    /// Validate the entire configuration, returning all detected issues.
    ///
    /// This is the single entry point for config validation. It checks:
    /// 1. Orchestrator bounds and the delete policy
    /// 2. Empty model ids and custom models pointing at unknown providers
    /// 3. Custom provider sections missing a usable `kind` or `base_url`
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        // 1. Orchestrator
        issues.extend(self.orchestrator.validate());

        // 2. Models
        issues.extend(self.models.validate(&self.known_providers()));

        // 3. Providers
        for (id, provider) in &self.providers {
            if let Some(kind) = &provider.kind
                && kind.parse::<ProviderKind>().is_err()
            {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::InvalidEnumValue {
                        field: format!("providers.{}.kind", id),
                        value: kind.clone(),
                        valid_values: vec!["openai".to_string(), "anthropic".to_string()],
                    },
                    format!("providers.{}.kind: unknown value '{}'", id, kind),
                ));
            }

            let builtin = BUILTIN_PROVIDERS.iter().any(|p| p.id == id.as_str());
            if !builtin && (provider.kind.is_none() || provider.base_url.is_none()) {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::UnknownProvider {
                        model: String::new(),
                        provider: id.clone(),
                    },
                    format!(
                        "providers.{}: custom providers need both 'kind' and 'base_url'",
                        id
                    ),
                ));
            }

            if provider.timeout_secs == Some(0) {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::OutOfRange {
                        field: format!("providers.{}.timeout_secs", id),
                        value: "0".to_string(),
                    },
                    format!("providers.{}.timeout_secs: cannot be 0", id),
                ));
            }
        }

        issues
    }
}
