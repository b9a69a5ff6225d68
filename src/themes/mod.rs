// Theme tagging for viewer comments — keyword themes, comment records, and
// the classifier that ties them together.

pub mod classifier;
pub mod comments;
pub mod definition;

use serde_json::Value;

/// Render a scalar JSON cell as text. Null and containers have no text.
///
/// Spreadsheet exports turn numeric-looking cells into numbers, so "2024"
/// as a keyword or comment arrives as a JSON number rather than a string.
pub(crate) fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
