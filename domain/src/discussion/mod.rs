//! Two-model discussions.
//!
//! - [`session::DiscussionSession`] — round counter, status and pending prompt
//!   of a running or paused dialogue

pub mod session;
