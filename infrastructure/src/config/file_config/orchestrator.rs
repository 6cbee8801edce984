//! Orchestrator configuration from TOML (`[orchestrator]` section)

use parley_application::{DeletionPolicy, OrchestratorConfig};
use parley_domain::{ConfigIssue, ConfigIssueCode, DEFAULT_MAX_ROUNDS};
use serde::{Deserialize, Serialize};

/// Raw orchestrator configuration from TOML
///
/// # Example
///
/// ```toml
/// [orchestrator]
/// max_rounds = 5
/// turn_delay_ms = 5000
/// delete_policy = "force-stop"   # or "reject"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOrchestratorConfig {
    /// Rounds before a discussion completes on its own
    pub max_rounds: u32,
    /// Pause between discussion turns, in milliseconds
    pub turn_delay_ms: u64,
    /// What deleting a busy thread does
    pub delete_policy: String,
}

impl Default for FileOrchestratorConfig {
    fn default() -> Self {
        Self {
            max_rounds: DEFAULT_MAX_ROUNDS,
            turn_delay_ms: 5000,
            delete_policy: DeletionPolicy::default().as_str().to_string(),
        }
    }
}

impl FileOrchestratorConfig {
    /// Parse `delete_policy`, falling back to the default on unknown values.
    pub fn parse_delete_policy(&self) -> (DeletionPolicy, Vec<ConfigIssue>) {
        match self.delete_policy.trim().to_lowercase().parse() {
            Ok(policy) => (policy, Vec::new()),
            Err(_) => {
                let fallback = DeletionPolicy::default();
                let issue = ConfigIssue::warning(
                    ConfigIssueCode::InvalidEnumValue {
                        field: "orchestrator.delete_policy".to_string(),
                        value: self.delete_policy.clone(),
                        valid_values: vec!["force-stop".to_string(), "reject".to_string()],
                    },
                    format!(
                        "orchestrator.delete_policy: unknown value '{}', falling back to '{}'",
                        self.delete_policy, fallback
                    ),
                );
                (fallback, vec![issue])
            }
        }
    }

    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = self.parse_delete_policy().1;
        if self.max_rounds == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::OutOfRange {
                    field: "orchestrator.max_rounds".to_string(),
                    value: "0".to_string(),
                },
                "orchestrator.max_rounds: must be at least 1",
            ));
        }
        issues
    }

    pub fn to_orchestrator_config(&self) -> OrchestratorConfig {
        OrchestratorConfig::default()
            .with_max_rounds(self.max_rounds.max(1))
            .with_turn_delay_ms(self.turn_delay_ms)
            .with_delete_policy(self.parse_delete_policy().0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_defaults_match_orchestrator_defaults() {
        let config = FileOrchestratorConfig::default().to_orchestrator_config();
        assert_eq!(config, OrchestratorConfig::default());
    }

    #[test]
    fn test_deserialize_section() {
        let toml_str = r#"
[orchestrator]
max_rounds = 3
turn_delay_ms = 250
delete_policy = "reject"
"#;
        let config: super::super::FileConfig = toml::from_str(toml_str).unwrap();
        let orchestrator = config.orchestrator.to_orchestrator_config();
        assert_eq!(orchestrator.max_rounds, 3);
        assert_eq!(orchestrator.turn_delay, Duration::from_millis(250));
        assert_eq!(orchestrator.delete_policy, DeletionPolicy::Reject);
        assert!(config.orchestrator.validate().is_empty());
    }

    #[test]
    fn test_unknown_policy_warns_and_falls_back() {
        let config = FileOrchestratorConfig {
            delete_policy: "block".to_string(),
            ..Default::default()
        };
        let (policy, issues) = config.parse_delete_policy();
        assert_eq!(policy, DeletionPolicy::ForceStop);
        assert_eq!(issues.len(), 1);
        assert!(!issues[0].is_error());
    }

    #[test]
    fn test_zero_rounds_is_an_error() {
        let config = FileOrchestratorConfig {
            max_rounds: 0,
            ..Default::default()
        };
        let issues = config.validate();
        assert!(issues.iter().any(|i| i.is_error()));
        assert_eq!(config.to_orchestrator_config().max_rounds, 1);
    }
}
