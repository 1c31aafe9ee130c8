use serde_json::{Map, Value};

/// Default cap on the number of top-level keys kept in a summary
pub const DEFAULT_MAX_KEYS: usize = 80;

/// Child key names listed in an object placeholder
const MAX_CHILD_KEYS: usize = 12;

/// Marker key added when the summarized object had more than `max_keys` keys
pub const TRUNCATED_KEY: &str = "__truncated__";

/// Summarizes a JSON value with the default key cap
pub fn summarize(value: &Value) -> Value {
    summarize_with_max_keys(value, DEFAULT_MAX_KEYS)
}

/// Produces a shallow, size-bounded projection of a JSON value.
///
/// Scalars pass through unchanged. For objects the first `max_keys` entries
/// are kept in insertion order, with nested containers replaced by a short
/// description instead of being recursed into. A top-level array is treated
/// as an object keyed by element index.
pub fn summarize_with_max_keys(value: &Value, max_keys: usize) -> Value {
    match value {
        Value::Object(map) => {
            summarize_entries(map.iter().map(|(k, v)| (k.clone(), v)), map.len(), max_keys)
        }
        Value::Array(items) => summarize_entries(
            items.iter().enumerate().map(|(i, v)| (i.to_string(), v)),
            items.len(),
            max_keys,
        ),
        scalar => scalar.clone(),
    }
}

fn summarize_entries<'a>(
    entries: impl Iterator<Item = (String, &'a Value)>,
    total: usize,
    max_keys: usize,
) -> Value {
    let mut out = Map::new();
    for (key, value) in entries.take(max_keys) {
        out.insert(key, describe(value));
    }
    if total > max_keys {
        out.insert(TRUNCATED_KEY.to_string(), Value::Bool(true));
    }
    Value::Object(out)
}

/// Replaces a container with its placeholder; scalars are returned as-is
pub fn describe(value: &Value) -> Value {
    match value {
        Value::Array(items) => Value::String(format!("[array len={}]", items.len())),
        Value::Object(map) => {
            let keys = map
                .keys()
                .take(MAX_CHILD_KEYS)
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(", ");
            let more = if map.len() > MAX_CHILD_KEYS { ", …" } else { "" };
            Value::String(format!("{{object keys={keys}{more}}}"))
        }
        scalar => scalar.clone(),
    }
}
