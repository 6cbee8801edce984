//! Shared utility functions.

/// Truncate a string to approximately `max_bytes` without splitting a UTF-8
/// character boundary.
///
/// Returns a sub-slice of the original string. If the string is shorter than
/// `max_bytes`, the entire string is returned unchanged.
pub fn truncate_str(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// One-line preview of message content for log lines and thread summaries.
///
/// Newlines collapse to spaces; anything past `max_bytes` is cut and marked
/// with an ellipsis.
pub fn preview(s: &str, max_bytes: usize) -> String {
    let flat: String = s
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    if flat.len() <= max_bytes {
        flat
    } else {
        format!("{}...", truncate_str(&flat, max_bytes.saturating_sub(3)))
    }
}
