//! Numeric rules: `numeric` and `integer`.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::error::Result;
use crate::registry::RuleInput;
use crate::value::is_numeric;

static INTEGER_STRING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+-]?(?:0|[1-9]\d*)$").unwrap());

/// JSON numbers and strings that are numeric in their entirety.
pub(crate) fn numeric(input: &RuleInput<'_>) -> Result<bool> {
    Ok(is_numeric(input.value))
}

/// Values with an exact `i64` interpretation.
///
/// Whole floats in range pass; strings are trimmed and must be plain decimal
/// digits with an optional sign and no leading zeros. `true` reads as `1`.
pub(crate) fn integer(input: &RuleInput<'_>) -> Result<bool> {
    Ok(match input.value {
        Value::Number(n) => {
            n.is_i64()
                || n.as_f64().is_some_and(|f| {
                    !n.is_u64() && f.is_finite() && f.fract() == 0.0 && in_i64_range(f)
                })
        }
        Value::String(s) => {
            let trimmed = s.trim();
            INTEGER_STRING.is_match(trimmed) && trimmed.parse::<i64>().is_ok()
        }
        Value::Bool(b) => *b,
        Value::Null | Value::Array(_) | Value::Object(_) => false,
    })
}

fn in_i64_range(f: f64) -> bool {
    f >= i64::MIN as f64 && f < i64::MAX as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::eval;
    use crate::store::FieldStore;
    use rstest::rstest;
    use serde_json::json;

    fn run(check: fn(&RuleInput<'_>) -> Result<bool>, value: &Value) -> bool {
        eval(check, value, &[], &FieldStore::default()).unwrap()
    }

    #[rstest]
    #[case(json!(3), true)]
    #[case(json!(-2.75), true)]
    #[case(json!("42"), true)]
    #[case(json!("-1.5e3"), true)]
    #[case(json!(" 7 "), true)]
    #[case(json!("12abc"), false)]
    #[case(json!("abc"), false)]
    #[case(json!(""), false)]
    #[case(json!(true), false)]
    #[case(json!(null), false)]
    fn test_numeric(#[case] value: Value, #[case] expected: bool) {
        assert_eq!(run(numeric, &value), expected);
    }

    #[rstest]
    #[case(json!(42), true)]
    #[case(json!(-7), true)]
    #[case(json!(4.0), true)]
    #[case(json!("42"), true)]
    #[case(json!(" -3 "), true)]
    #[case(json!("+5"), true)]
    #[case(json!("0"), true)]
    #[case(json!(true), true)]
    #[case(json!(4.5), false)]
    #[case(json!("4.0"), false)]
    #[case(json!("007"), false)]
    #[case(json!("1e3"), false)]
    #[case(json!("99999999999999999999"), false)]
    #[case(json!(u64::MAX), false)]
    #[case(json!(false), false)]
    #[case(json!(null), false)]
    #[case(json!([1]), false)]
    fn test_integer(#[case] value: Value, #[case] expected: bool) {
        assert_eq!(run(integer, &value), expected);
    }
}
