//! Defensive parsing of the model's reply.
//!
//! The completion service is asked for a bare JSON array but frequently wraps
//! it in a markdown code fence, sometimes with a language tag. Nothing in
//! this module panics or returns a hard error: callers get `None` and decide
//! how to report it.

use serde_json::Value;

const FENCE: &str = "```";

/// Remove markdown code fences from `text`.
///
/// Only applies when the trimmed text starts with a fence. The opening fence
/// loses its language tag (such as `json`); every later fence marker is
/// removed on its own, so text following an inner fence is kept. The result
/// is trimmed. Fence-free text is returned trimmed and otherwise untouched.
pub fn strip_code_fences(text: &str) -> String {
    let trimmed = text.trim();
    let Some(after_opening) = trimmed.strip_prefix(FENCE) else {
        return trimmed.to_string();
    };

    skip_language_tag(after_opening)
        .replace(FENCE, "")
        .trim()
        .to_string()
}

/// Skip an info string like `json` or `objective-c` directly after a fence.
fn skip_language_tag(after_fence: &str) -> &str {
    let tag_len = after_fence
        .find(|c: char| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '+' | '.')))
        .unwrap_or(after_fence.len());
    &after_fence[tag_len..]
}

/// Strictly parse `text` as JSON after removing code fences.
///
/// Returns `None` when the text is not valid JSON. Any JSON value is
/// returned as-is; use [`parse_task_array`] to also require an array.
pub fn parse_model_output(text: &str) -> Option<Value> {
    serde_json::from_str(&strip_code_fences(text)).ok()
}

/// Parse `text` and require the top-level value to be an array.
pub fn parse_task_array(text: &str) -> Option<Vec<Value>> {
    match parse_model_output(text)? {
        Value::Array(elements) => Some(elements),
        _ => None,
    }
}
