//! Canonicalization of loosely-typed content fields.
//!
//! The content API stores feature lists and image lists in several shapes
//! depending on which editor produced the record. Everything here turns those
//! shapes into ordered `Vec<String>` values so that both the sitemap output and
//! the change fingerprint see one representation.

use std::collections::HashSet;

use serde_json::Value;

/// Maximum number of images emitted per sitemap entry.
pub const MAX_IMAGES_PER_ITEM: usize = 10;

/// Normalize a raw feature field into an ordered list of non-empty strings.
///
/// Policy, first match wins:
/// 1. absent or `null` -> empty
/// 2. array -> trim each element, stringify non-strings, drop empties
/// 3. string starting with `[` or `{` -> parse as JSON; an array goes through rule 2,
///    anything else (including a parse failure) falls through
/// 4. string containing `,` -> split on comma
/// 5. string containing `;` -> split on semicolon
/// 6. any other non-empty string -> single element
pub fn normalize_features(raw: Option<&Value>) -> Vec<String> {
    match raw {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(values)) => normalize_array(values),
        Some(Value::String(text)) => normalize_text(text),
        Some(other) => single(&value_to_string(other)),
    }
}

fn normalize_array(values: &[Value]) -> Vec<String> {
    values
        .iter()
        .filter(|v| !v.is_null())
        .map(value_to_string)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn normalize_text(text: &str) -> Vec<String> {
    let trimmed = text.trim();

    if (trimmed.starts_with('[') || trimmed.starts_with('{'))
        && let Ok(Value::Array(values)) = serde_json::from_str::<Value>(trimmed)
    {
        return normalize_array(&values);
    }

    if trimmed.contains(',') {
        return split_on(trimmed, ',');
    }
    if trimmed.contains(';') {
        return split_on(trimmed, ';');
    }

    single(trimmed)
}

fn split_on(text: &str, delimiter: char) -> Vec<String> {
    text.split(delimiter)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn single(text: &str) -> Vec<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() { Vec::new() } else { vec![trimmed.to_string()] }
}

fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Pull image URLs out of an image-list field.
///
/// Accepts an array of strings, an array of objects exposing `imageUrl` or
/// `image_url`, or a single string. Other shapes yield nothing.
pub fn image_urls_from_value(raw: Option<&Value>) -> Vec<String> {
    match raw {
        Some(Value::Array(values)) => values.iter().filter_map(image_url_of).collect(),
        Some(Value::String(s)) => vec![s.clone()],
        _ => Vec::new(),
    }
}

fn image_url_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Object(map) => map
            .get("imageUrl")
            .or_else(|| map.get("image_url"))
            .and_then(Value::as_str)
            .map(str::to_string),
        _ => None,
    }
}

/// Apply the shared image policy: trim, drop empties, de-duplicate by exact
/// match, cap at [`MAX_IMAGES_PER_ITEM`], and fall back to `placeholder`.
pub fn finalize_images<I>(raw: I, placeholder: &str) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = HashSet::new();
    let images: Vec<String> = raw
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .filter(|s| seen.insert(s.clone()))
        .take(MAX_IMAGES_PER_ITEM)
        .collect();

    if images.is_empty() { vec![placeholder.to_string()] } else { images }
}
