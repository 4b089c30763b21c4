//! Presence rules: `required` and `accepted`.

use serde_json::Value;

use crate::error::Result;
use crate::registry::RuleInput;

/// Value is present: not `null`, and not a blank string.
///
/// `0`, `false` and empty lists count as present.
pub(crate) fn required(input: &RuleInput<'_>) -> Result<bool> {
    Ok(is_present(input.value))
}

fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.trim().is_empty(),
        _ => true,
    }
}

/// Value is present and exactly one of `"yes"`, `"on"`, `1` or `true`.
///
/// Membership is strict: `"1"`, `1.0` and `"true"` are not accepted.
pub(crate) fn accepted(input: &RuleInput<'_>) -> Result<bool> {
    let value = input.value;
    let accepted = match value {
        Value::String(s) => s == "yes" || s == "on",
        Value::Number(n) => n.as_i64() == Some(1) && !n.is_f64(),
        Value::Bool(b) => *b,
        Value::Null | Value::Array(_) | Value::Object(_) => false,
    };
    Ok(is_present(value) && accepted)
}
