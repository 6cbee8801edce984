//! Orchestrator parameters: discussion bounds, pacing and deletion policy.

use parley_domain::DEFAULT_MAX_ROUNDS;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Pause between two discussion turns when nothing is configured
pub const DEFAULT_TURN_DELAY: Duration = Duration::from_millis(5000);

/// What `delete_thread` does when an operation is in flight on the thread
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeletionPolicy {
    /// Remove the thread anyway, cancel its discussion and drop any later
    /// result of the in-flight call
    #[default]
    ForceStop,
    /// Refuse with `Busy` until the operation finishes
    Reject,
}

impl DeletionPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeletionPolicy::ForceStop => "force-stop",
            DeletionPolicy::Reject => "reject",
        }
    }
}

impl std::str::FromStr for DeletionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "force-stop" | "force_stop" | "forcestop" => Ok(DeletionPolicy::ForceStop),
            "reject" => Ok(DeletionPolicy::Reject),
            other => Err(format!(
                "unknown delete policy '{}', expected 'force-stop' or 'reject'",
                other
            )),
        }
    }
}

impl std::fmt::Display for DeletionPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Orchestrator control parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    /// Rounds (two turns each) before a discussion completes on its own.
    pub max_rounds: u32,
    /// Wait between consecutive discussion turns.
    pub turn_delay: Duration,
    pub delete_policy: DeletionPolicy,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            max_rounds: DEFAULT_MAX_ROUNDS,
            turn_delay: DEFAULT_TURN_DELAY,
            delete_policy: DeletionPolicy::default(),
        }
    }
}

impl OrchestratorConfig {
    // ==================== Builder Methods ====================

    pub fn with_max_rounds(mut self, max: u32) -> Self {
        self.max_rounds = max;
        self
    }

    pub fn with_turn_delay(mut self, delay: Duration) -> Self {
        self.turn_delay = delay;
        self
    }

    pub fn with_turn_delay_ms(self, millis: u64) -> Self {
        self.with_turn_delay(Duration::from_millis(millis))
    }

    pub fn with_delete_policy(mut self, policy: DeletionPolicy) -> Self {
        self.delete_policy = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let config = OrchestratorConfig::default();
        assert_eq!(config.max_rounds, 5);
        assert_eq!(config.turn_delay, Duration::from_millis(5000));
        assert_eq!(config.delete_policy, DeletionPolicy::ForceStop);
    }

    #[test]
    fn test_builder() {
        let config = OrchestratorConfig::default()
            .with_max_rounds(2)
            .with_turn_delay_ms(10)
            .with_delete_policy(DeletionPolicy::Reject);

        assert_eq!(config.max_rounds, 2);
        assert_eq!(config.turn_delay, Duration::from_millis(10));
        assert_eq!(config.delete_policy, DeletionPolicy::Reject);
    }

    #[test]
    fn test_delete_policy_parse() {
        assert_eq!("force-stop".parse::<DeletionPolicy>(), Ok(DeletionPolicy::ForceStop));
        assert_eq!("reject".parse::<DeletionPolicy>(), Ok(DeletionPolicy::Reject));
        assert!("block".parse::<DeletionPolicy>().is_err());
    }
}
