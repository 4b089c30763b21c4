//! Temporal rules: `date`, `dateFormat`, `dateBefore`, `dateAfter`.

use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

use chrono::format::{Fixed, Item, Numeric, Pad, ParseErrorKind, Parsed, StrftimeItems};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use regex::Regex;
use serde_json::Value;

use crate::error::{ConfigError, Result};
use crate::param::Param;
use crate::registry::RuleInput;
use crate::value::scalar_string;

use super::date_parse::parse_datetime;
use super::{param, param_str};

fn value_datetime(input: &RuleInput<'_>) -> Option<DateTime<Utc>> {
    match input.value {
        Value::String(_) | Value::Number(_) => {
            scalar_string(input.value).as_deref().and_then(parse_datetime)
        }
        _ => None,
    }
}

fn param_datetime(rule: &str, params: &[Param], index: usize) -> Result<DateTime<Utc>> {
    match param(rule, params, index)? {
        Param::DateTime(dt) => Ok(*dt),
        other => {
            let text = other.as_str().ok_or_else(|| {
                ConfigError::invalid_parameter(
                    rule,
                    format!("parameter #{} must be a date, got {}", index + 1, other.kind()),
                )
            })?;
            parse_datetime(text).ok_or_else(|| {
                ConfigError::invalid_parameter(rule, format!("'{text}' is not a recognised date"))
            })
        }
    }
}

pub(crate) fn bound_params(rule: &str, params: &[Param]) -> Result<()> {
    param_datetime(rule, params, 0).map(drop)
}

/// The value is a string or number the free-form date parser understands.
pub(crate) fn date(input: &RuleInput<'_>) -> Result<bool> {
    Ok(value_datetime(input).is_some())
}

/// Strictly earlier than the date in `params[0]`.
pub(crate) fn date_before(input: &RuleInput<'_>) -> Result<bool> {
    let bound = param_datetime(input.rule, input.params, 0)?;
    Ok(value_datetime(input).is_some_and(|dt| dt < bound))
}

/// Strictly later than the date in `params[0]`.
pub(crate) fn date_after(input: &RuleInput<'_>) -> Result<bool> {
    let bound = param_datetime(input.rule, input.params, 0)?;
    Ok(value_datetime(input).is_some_and(|dt| dt > bound))
}

// ============================================================================
// DATE FORMAT
// ============================================================================

/// Translates a `Y-m-d H:i:s` style format into strftime.
///
/// Formats that already contain `%` are taken as strftime and returned as is.
fn to_strftime(format: &str) -> String {
    if format.contains('%') {
        return format.to_owned();
    }

    let mut out = String::with_capacity(format.len() * 2);
    let mut chars = format.chars();
    while let Some(c) = chars.next() {
        let directive = match c {
            'd' | 'j' => "%d",
            'm' | 'n' => "%m",
            'Y' => "%Y",
            'y' => "%y",
            'H' | 'G' => "%H",
            'h' | 'g' => "%I",
            'i' => "%M",
            's' => "%S",
            'A' | 'a' => "%p",
            'D' => "%a",
            'l' => "%A",
            'M' => "%b",
            'F' => "%B",
            'U' => "%s",
            'P' => "%:z",
            'O' => "%z",
            '\\' => {
                if let Some(escaped) = chars.next() {
                    out.push(escaped);
                }
                continue;
            }
            other => {
                out.push(other);
                continue;
            }
        };
        out.push_str(directive);
    }
    out
}

/// A date format ready for matching.
///
/// `shape` pins the width of every field and rejects whitespace or signs the
/// format does not spell out; chrono's parser is lenient about both.
struct DateFormat {
    strftime: String,
    shape: Regex,
}

/// Compiled formats keyed by the format as written.
static FORMATS: LazyLock<RwLock<HashMap<String, Arc<DateFormat>>>> =
    LazyLock::new(|| RwLock::new(HashMap::new()));

fn numeric_shape(numeric: &Numeric) -> &'static str {
    match numeric {
        Numeric::Year => r"\d{4}",
        Numeric::YearMod100 | Numeric::Minute | Numeric::Second => r"\d{2}",
        Numeric::Month | Numeric::Day | Numeric::Hour | Numeric::Hour12 => r"\d{1,2}",
        Numeric::Timestamp => r"-?\d+",
        _ => r"\d+",
    }
}

fn fixed_shape(fixed: &Fixed) -> &'static str {
    match fixed {
        Fixed::ShortMonthName | Fixed::ShortWeekdayName => "[A-Za-z]{3}",
        Fixed::LongMonthName | Fixed::LongWeekdayName => "[A-Za-z]+",
        Fixed::LowerAmPm | Fixed::UpperAmPm => "(?i:am|pm)",
        Fixed::TimezoneOffset | Fixed::TimezoneOffsetColon => r"[+-]\d{2}:?\d{2}",
        _ => ".+?",
    }
}

/// Anchored pattern describing the text `strftime` can match.
fn shape_of(strftime: &str) -> String {
    let mut pattern = String::from("^");
    for item in StrftimeItems::new(strftime) {
        match item {
            Item::Literal(text) | Item::Space(text) => pattern.push_str(&regex::escape(text)),
            Item::Numeric(numeric, pad) => {
                if pad == Pad::Space {
                    pattern.push_str(" ?");
                }
                pattern.push_str(numeric_shape(&numeric));
            }
            Item::Fixed(fixed) => pattern.push_str(fixed_shape(&fixed)),
            _ => pattern.push_str(".+?"),
        }
    }
    pattern.push('$');
    pattern
}

fn compile_format(rule: &str, format: &str) -> Result<DateFormat> {
    let unusable = || {
        ConfigError::invalid_parameter(rule, format!("'{format}' is not a usable date format"))
    };
    let strftime = to_strftime(format);
    if StrftimeItems::new(&strftime).any(|item| matches!(item, Item::Error)) {
        return Err(unusable());
    }
    let shape = Regex::new(&shape_of(&strftime)).map_err(|_| unusable())?;
    Ok(DateFormat { strftime, shape })
}

/// [`compile_format`], reusing an earlier compilation of the same format.
fn compiled_format(rule: &str, format: &str) -> Result<Arc<DateFormat>> {
    if let Some(compiled) = FORMATS.read().get(format) {
        return Ok(Arc::clone(compiled));
    }
    let compiled = Arc::new(compile_format(rule, format)?);
    FORMATS.write().insert(format.to_owned(), Arc::clone(&compiled));
    Ok(compiled)
}

impl DateFormat {
    fn matches(&self, value: &str) -> bool {
        if !self.shape.is_match(value) {
            return false;
        }
        let mut parsed = Parsed::new();
        if chrono::format::parse(&mut parsed, value, StrftimeItems::new(&self.strftime)).is_err() {
            return false;
        }
        // Fields may each be in range and still name an impossible date.
        match parsed.to_naive_date() {
            Ok(_) => true,
            Err(e) => e.kind() == ParseErrorKind::NotEnough,
        }
    }
}

pub(crate) fn format_params(rule: &str, params: &[Param]) -> Result<()> {
    compiled_format(rule, param_str(rule, params, 0)?).map(drop)
}

/// The whole value parses with the format in `params[0]`.
pub(crate) fn date_format(input: &RuleInput<'_>) -> Result<bool> {
    let format = compiled_format(input.rule, param_str(input.rule, input.params, 0)?)?;
    Ok(scalar_string(input.value).is_some_and(|text| format.matches(&text)))
}
