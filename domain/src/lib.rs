//! Domain layer for parley
//!
//! This crate contains the core entities and value objects of the
//! conversation orchestrator. It has no dependencies on infrastructure or
//! presentation concerns and performs no I/O.
//!
//! # Core Concepts
//!
//! ## Threads
//!
//! A [`Thread`] is either a chat (with a [`MessageLog`]) or a note. Messages
//! are role-tagged ([`MessageBody`]) and ordered solely by the [`Timestamp`]
//! the log assigns when they are appended.
//!
//! ## Discussions
//!
//! A [`DiscussionSession`] tracks an unattended dialogue between two models:
//! the round counter, the prompt for the next turn, and whether the user has
//! paused or stopped it.

pub mod config;
pub mod core;
pub mod discussion;
pub mod thread;
pub mod util;

// Re-export commonly used types
pub use config::{
    OutputFormat,
    validation::{ConfigIssue, ConfigIssueCode, Severity},
};
pub use core::{
    error::DomainError,
    model::{DEFAULT_MODEL_ID, ModelCatalog, ModelDescriptor},
};
pub use discussion::session::{
    DEFAULT_MAX_ROUNDS, DiscussionSession, DiscussionStatus, Participant, STOPPED_BY_USER,
};
pub use thread::{
    entities::{Thread, ThreadId, ThreadKind, ThreadSummary},
    message::{Comparison, ComparisonEntry, Message, MessageBody, Role},
    message_log::MessageLog,
    timestamp::Timestamp,
};
