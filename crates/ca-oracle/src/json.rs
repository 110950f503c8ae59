//! Pulling one field out of a reply that is supposed to be a JSON object.
//!
//! Oracles wrap JSON in markdown fences or add a sentence of prose often
//! enough that every reply is cleaned before parsing.

use serde_json::Value;

use crate::ClassificationError;

/// Strip markdown fences and surrounding prose, returning the outermost
/// `{ … }` span if there is one.
pub fn clean_json_response(raw: &str) -> &str {
    let mut text = raw.trim();
    if let Some(start) = text.find("```") {
        let after = &text[start + 3..];
        let after = after.strip_prefix("json").unwrap_or(after);
        text = match after.find("```") {
            Some(end) => &after[..end],
            None => after,
        };
    }
    match (text.find('{'), text.rfind('}')) {
        (Some(open), Some(close)) if open < close => &text[open..=close],
        _ => text.trim(),
    }
}

/// Parse `raw` as a JSON object and return the value under `field`.
pub fn extract_field(raw: &str, field: &str) -> Result<Value, ClassificationError> {
    let cleaned = clean_json_response(raw);
    let value: Value = serde_json::from_str(cleaned)
        .map_err(|e| ClassificationError::Malformed(format!("{e}: {}", truncate(raw, 120))))?;
    let Value::Object(mut obj) = value else {
        return Err(ClassificationError::Malformed(truncate(raw, 120)));
    };
    obj.remove(field)
        .ok_or_else(|| ClassificationError::MissingField(field.to_owned()))
}

/// Interpret a field value as a label.  Only JSON strings qualify.
pub fn as_label(value: &Value) -> Option<String> {
    value.as_str().map(|s| s.trim().to_owned())
}

/// Interpret a field value as an integer: a JSON integer, a float (truncated)
/// or a numeric string.
pub fn as_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().filter(|x| x.is_finite()).map(|x| x as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

pub(crate) fn truncate(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}
