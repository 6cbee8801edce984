//! Rendering of thread messages

pub mod console;
pub mod formatter;
pub mod transcript;

/// Turn colored output on or off for the whole process.
pub fn set_color_enabled(enabled: bool) {
    colored::control::set_override(enabled);
}
