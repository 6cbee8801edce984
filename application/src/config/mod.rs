//! Application-level configuration.
//!
//! [`OrchestratorConfig`] controls how the conversation orchestrator paces
//! and bounds discussions and what happens when a busy thread is deleted.

pub mod orchestrator_config;

pub use orchestrator_config::{DeletionPolicy, OrchestratorConfig};
