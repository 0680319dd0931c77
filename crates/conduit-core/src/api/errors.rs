//! Extraction of structured field errors from API error bodies.
//!
//! The API reports validation problems as `{"errors": {"<field>": ["..."]}}`.

use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    errors: Option<Map<String, Value>>,
}

fn error_map(body: &str) -> Option<Map<String, Value>> {
    serde_json::from_str::<ErrorEnvelope>(body).ok()?.errors
}

fn string_messages(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .map(ToString::to_string)
            .collect(),
        Value::String(message) => vec![message.clone()],
        _ => Vec::new(),
    }
}

/// Messages listed under `errors.body`, if any.
pub fn body_errors(body: &str) -> Vec<String> {
    error_map(body)
        .and_then(|errors| errors.get("body").map(string_messages))
        .unwrap_or_default()
}

/// First field entry rendered as `<field>: <message, message>`.
pub fn first_field_error(body: &str) -> Option<String> {
    let errors = error_map(body)?;
    let (field, messages) = errors.iter().next()?;
    let messages = string_messages(messages);
    if messages.is_empty() {
        None
    } else {
        Some(format!("{field}: {}", messages.join(", ")))
    }
}
