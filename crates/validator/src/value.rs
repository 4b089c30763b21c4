//! Coercion policy for dynamically typed field values.
//!
//! Field values arrive as [`serde_json::Value`]. Rules that compare values
//! (`equals`, `different`, `in`, `notIn`) or cast them (`min`, `max`) share
//! the helpers below so that a single, explicit policy applies everywhere.
//!
//! # Loose equality
//!
//! [`loose_eq`] decides, in order:
//!
//! 1. both sides numeric-like (JSON numbers or numeric strings): compare as `f64`;
//! 2. either side boolean: compare truthiness;
//! 3. either side null: both sides must be empty (`null`, `""`, `[]`, `{}`);
//! 4. arrays: same length and element-wise loose equality;
//! 5. objects: same keys and value-wise loose equality;
//! 6. otherwise: the scalar string renderings must match exactly.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

static NUMERIC_STRING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[ \t\n\r\x0B\x0C]*[+-]?(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][+-]?\d+)?[ \t\n\r\x0B\x0C]*$")
        .unwrap()
});

static NUMERIC_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[ \t\n\r\x0B\x0C]*([+-]?(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][+-]?\d+)?)").unwrap()
});

/// Parses a string that is numeric in its entirety (surrounding whitespace allowed).
#[must_use]
pub fn parse_numeric_str(input: &str) -> Option<f64> {
    if NUMERIC_STRING.is_match(input) {
        input.trim().parse().ok()
    } else {
        None
    }
}

/// Returns `true` for JSON numbers and for strings that are entirely numeric.
///
/// Signed, fractional and exponential forms are accepted; hexadecimal,
/// `inf` and `NaN` are not.
#[must_use]
pub fn is_numeric(value: &Value) -> bool {
    numeric_like(value).is_some()
}

/// Numeric interpretation used by loose equality: numbers and numeric strings only.
fn numeric_like(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_numeric_str(s),
        _ => None,
    }
}

/// Casts a value to a number the way a form field is usually read.
///
/// Strings contribute their leading numeric prefix (`"12abc"` → 12,
/// `"abc"` → 0); booleans are 0 or 1 and `null` is 0. Arrays and objects
/// have no numeric interpretation and yield `None`.
#[must_use]
pub fn to_number(value: &Value) -> Option<f64> {
    match value {
        Value::Null => Some(0.0),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::Number(n) => n.as_f64(),
        Value::String(s) => Some(
            NUMERIC_PREFIX
                .captures(s)
                .and_then(|c| c.get(1))
                .and_then(|m| m.as_str().parse().ok())
                .unwrap_or(0.0),
        ),
        Value::Array(_) | Value::Object(_) => None,
    }
}

/// Renders a scalar as the string a text predicate should inspect.
///
/// `true` renders as `"1"`, `false` and `null` as `""`. Arrays and objects
/// are not scalars and yield `None`.
#[must_use]
pub fn scalar_string(value: &Value) -> Option<Cow<'_, str>> {
    match value {
        Value::String(s) => Some(Cow::Borrowed(s.as_str())),
        Value::Number(n) => Some(Cow::Owned(render_number(n))),
        Value::Bool(true) => Some(Cow::Borrowed("1")),
        Value::Bool(false) | Value::Null => Some(Cow::Borrowed("")),
        Value::Array(_) | Value::Object(_) => None,
    }
}

fn render_number(n: &serde_json::Number) -> String {
    if n.is_i64() || n.is_u64() {
        return n.to_string();
    }
    match n.as_f64() {
        Some(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{f:.0}"),
        _ => n.to_string(),
    }
}

/// Truthiness of a value: `null`, `false`, `0`, `""`, `"0"` and empty
/// collections are falsy; everything else is truthy.
#[must_use]
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !(s.is_empty() || s == "0"),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

/// Type-coercing equality. See the module documentation for the exact policy.
#[must_use]
pub fn loose_eq(left: &Value, right: &Value) -> bool {
    if let (Some(a), Some(b)) = (numeric_like(left), numeric_like(right)) {
        return a == b;
    }

    match (left, right) {
        (Value::Bool(_), _) | (_, Value::Bool(_)) => is_truthy(left) == is_truthy(right),
        (Value::Null, other) | (other, Value::Null) => is_blank(other),
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| loose_eq(x, y))
        }
        (Value::Object(a), Value::Object(b)) => {
            a.len() == b.len()
                && a
                    .iter()
                    .all(|(key, x)| b.get(key).is_some_and(|y| loose_eq(x, y)))
        }
        (Value::Array(_) | Value::Object(_), _) | (_, Value::Array(_) | Value::Object(_)) => false,
        _ => scalar_string(left) == scalar_string(right),
    }
}

/// Short type name used in parameter error messages.
#[must_use]
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
