//! Sanitization of tool results before they are sent back to a model.

use serde_json::{Map, Value};

/// Maximum characters kept for any single string in a tool result.
pub const MAX_RESULT_CHARS: usize = 20_000;

const TRUNCATION_MARKER: &str = "...[truncated]";

/// Return a copy of `value` that is safe to submit as a function response.
///
/// Inline `data:` URIs are replaced with a short placeholder and oversized
/// strings are truncated. Structure is otherwise preserved.
pub fn sanitize_value(value: &Value) -> Value {
    match value {
        Value::String(s) => Value::String(sanitize_string(s)),
        Value::Array(items) => Value::Array(items.iter().map(sanitize_value).collect()),
        Value::Object(map) => {
            let mut out = Map::with_capacity(map.len());
            for (key, item) in map {
                out.insert(key.clone(), sanitize_value(item));
            }
            Value::Object(out)
        }
        other => other.clone(),
    }
}

fn sanitize_string(s: &str) -> String {
    if let Some(rest) = s.strip_prefix("data:") {
        let mime = rest.split([';', ',']).next().unwrap_or("application/octet-stream");
        return format!("[inline {} omitted]", mime);
    }

    if s.chars().count() <= MAX_RESULT_CHARS {
        return s.to_string();
    }

    let mut truncated: String = s.chars().take(MAX_RESULT_CHARS).collect();
    truncated.push_str(TRUNCATION_MARKER);
    truncated
}
