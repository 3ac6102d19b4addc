//! Field deserializers that accept the loose shapes the content API emits.
//!
//! Every helper reads the raw JSON value first and maps anything it cannot
//! interpret to `None`, so one odd field never rejects a whole record.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::ItemId;

/// Text field: strings as-is, numbers and booleans in their JSON form.
pub(crate) fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(Option::<Value>::deserialize(deserializer)?.and_then(value_text))
}

/// Flag field: booleans, `0`/`1` and their common string spellings.
pub(crate) fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<bool>, D::Error> {
    Ok(Option::<Value>::deserialize(deserializer)?.and_then(value_flag))
}

/// Identifier: unsigned integers stay numeric, other scalars become text.
pub(crate) fn id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<ItemId>, D::Error> {
    Ok(Option::<Value>::deserialize(deserializer)?.and_then(|value| match value {
        Value::Number(n) => Some(n.as_u64().map_or_else(|| ItemId::Text(n.to_string()), ItemId::Number)),
        Value::String(s) => Some(ItemId::Text(s)),
        _ => None,
    }))
}

fn value_text(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn value_flag(value: Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(b),
        Value::Number(n) => n.as_f64().map(|n| n != 0.0),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Some(true),
            "false" | "0" | "no" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// First trimmed, non-empty value among alternative spellings of a field.
pub(crate) fn first_non_empty<'a>(candidates: &[&'a Option<String>]) -> Option<&'a str> {
    candidates.iter().find_map(|value| super::non_empty(value.as_ref()))
}
