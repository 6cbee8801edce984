//! Infrastructure layer for parley
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod logging;
pub mod providers;

// Re-export commonly used types
pub use config::{
    ConfigLoader, FileConfig, FileLoggingConfig, FileModelsConfig, FileOrchestratorConfig,
    FileOutputConfig, FileOutputFormat, FileProviderConfig,
};
pub use logging::JsonlConversationLogger;
pub use providers::{
    ProviderAdapter, ProviderKind,
    routing::ProviderRouter,
    settings::{ProviderSettings, ProviderSetupError},
};
