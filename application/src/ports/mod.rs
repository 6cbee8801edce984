//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure and presentation adapters
//! must implement.

pub mod composite_progress;
pub mod conversation_logger;
pub mod model_client;
pub mod progress;
