//! Lenient JSON extraction from free-form model output.
//!
//! Models are told to answer with a bare JSON object, but in practice they
//! wrap it in markdown fences or surround it with prose. Recovery order:
//! strip fences, parse directly, then parse the greedy `{ ... }` span.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static JSON_FENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)```json\s*").unwrap());
static BARE_FENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"```\s*").unwrap());
static OBJECT_SPAN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)\{.*\}").unwrap());

/// Removes every ```` ```json ```` and ```` ``` ```` fence, case-insensitively.
pub fn strip_json_fences(text: &str) -> String {
    let without_tagged = JSON_FENCE.replace_all(text, "");
    BARE_FENCE.replace_all(&without_tagged, "").trim().to_string()
}

/// Returns the parsed JSON document hidden in `text`, if any.
pub fn extract_json_value(text: &str) -> Option<Value> {
    let cleaned = strip_json_fences(text);

    if let Ok(value) = serde_json::from_str::<Value>(&cleaned) {
        return Some(value);
    }

    // Greedy: first `{` through last `}`.
    OBJECT_SPAN
        .find(&cleaned)
        .and_then(|m| serde_json::from_str::<Value>(m.as_str()).ok())
}
