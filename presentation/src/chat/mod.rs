//! Interactive chat module
//!
//! Provides a line-based interactive chat interface over one chat thread.

mod repl;

pub use repl::ChatRepl;
