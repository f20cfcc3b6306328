//! Display helpers for status text.

/// Longest progress message shown on the board before clipping.
pub const MAX_STATUS_LEN: usize = 40;

/// Clip a status message to `max` characters, appending an ellipsis marker
/// when anything was cut. Counts characters, not bytes, so multi-byte text
/// never splits mid-codepoint.
pub fn clip_status(message: &str, max: usize) -> String {
    if message.chars().count() <= max {
        return message.to_string();
    }
    let mut clipped: String = message.chars().take(max).collect();
    clipped.push_str("...");
    clipped
}
