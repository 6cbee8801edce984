//! Threads and their message logs.
//!
//! - [`entities::Thread`] — a chat or note container
//! - [`message::Message`] / [`message::MessageBody`] — a role-tagged log entry
//! - [`message_log::MessageLog`] — append-only, timestamp-ordered history
//! - [`timestamp::Timestamp`] — the ordering key assigned at append time

pub mod entities;
pub mod message;
pub mod message_log;
pub mod timestamp;
