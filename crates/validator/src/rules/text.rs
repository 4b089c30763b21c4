//! Text rules: `length`, `alpha`, `alphaNum`, `alphaDash`, `regex`.
//!
//! All of them inspect the scalar rendering of the value (see
//! [`crate::value::scalar_string`]); arrays and objects never pass.

use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::LazyLock;

use parking_lot::RwLock;
use regex::Regex;

use crate::error::{ConfigError, Result};
use crate::param::Param;
use crate::registry::RuleInput;
use crate::value::scalar_string;

use super::{param_number, param_str};

// ============================================================================
// LENGTH
// ============================================================================

pub(crate) fn length_params(rule: &str, params: &[Param]) -> Result<()> {
    let first = param_number(rule, params, 0)?;
    if params.len() >= 2 {
        let second = param_number(rule, params, 1)?;
        if second < first {
            return Err(ConfigError::invalid_parameter(
                rule,
                format!("maximum {second} is smaller than minimum {first}"),
            ));
        }
    }
    Ok(())
}

/// Character count equals `params[0]`, or lies within `params[0]..=params[1]`.
pub(crate) fn length(input: &RuleInput<'_>) -> Result<bool> {
    let first = param_number(input.rule, input.params, 0)?;
    let second = if input.params.len() >= 2 {
        Some(param_number(input.rule, input.params, 1)?)
    } else {
        None
    };

    let Some(text) = scalar_string(input.value) else {
        return Ok(false);
    };
    let count = text.chars().count() as f64;

    Ok(match second {
        Some(max) => count >= first && count <= max,
        None => count == first,
    })
}

// ============================================================================
// CHARACTER CLASSES
// ============================================================================

static ALPHA: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Za-z]+$").unwrap());
static ALPHA_NUM: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Za-z0-9]+$").unwrap());
static ALPHA_DASH: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").unwrap());

fn matches_class(input: &RuleInput<'_>, class: &Regex) -> bool {
    scalar_string(input.value).is_some_and(|text| class.is_match(&text))
}

/// Only ASCII letters.
pub(crate) fn alpha(input: &RuleInput<'_>) -> Result<bool> {
    Ok(matches_class(input, &ALPHA))
}

/// Only ASCII letters and digits.
pub(crate) fn alpha_num(input: &RuleInput<'_>) -> Result<bool> {
    Ok(matches_class(input, &ALPHA_NUM))
}

/// ASCII letters, digits, dashes and underscores.
pub(crate) fn alpha_dash(input: &RuleInput<'_>) -> Result<bool> {
    Ok(matches_class(input, &ALPHA_DASH))
}

// ============================================================================
// REGEX
// ============================================================================

const DELIMITERS: [char; 4] = ['/', '#', '~', '!'];

/// Compiled patterns keyed by their source text.
static COMPILED: LazyLock<RwLock<HashMap<String, Regex>>> =
    LazyLock::new(|| RwLock::new(HashMap::new()));

/// Turns a pattern into a [`Regex`].
///
/// Both plain patterns (`^[a-z]+$`) and delimited ones (`/^[a-z]+$/i`) are
/// accepted. Supported trailing flags are `i`, `m`, `s`, `x` and `u`; the last
/// is a no-op since matching is always Unicode-aware.
fn compile(rule: &str, pattern: &str) -> Result<Regex> {
    let source = strip_delimiters(pattern).map_err(|flag| {
        ConfigError::invalid_parameter(rule, format!("unsupported regex flag '{flag}'"))
    })?;
    Regex::new(&source).map_err(|e| ConfigError::invalid_parameter(rule, e.to_string()))
}

/// [`compile`], reusing an earlier compilation of the same pattern.
fn compiled(rule: &str, pattern: &str) -> Result<Regex> {
    if let Some(regex) = COMPILED.read().get(pattern) {
        return Ok(regex.clone());
    }
    let regex = compile(rule, pattern)?;
    COMPILED.write().insert(pattern.to_owned(), regex.clone());
    Ok(regex)
}

fn strip_delimiters(pattern: &str) -> std::result::Result<Cow<'_, str>, char> {
    let Some(open) = pattern.chars().next().filter(|c| DELIMITERS.contains(c)) else {
        return Ok(Cow::Borrowed(pattern));
    };
    let Some(close) = pattern.rfind(open).filter(|&i| i > 0) else {
        return Ok(Cow::Borrowed(pattern));
    };

    let body = &pattern[open.len_utf8()..close];
    let flags = &pattern[close + open.len_utf8()..];
    let mut inline = String::new();
    for flag in flags.chars() {
        match flag {
            'i' | 'm' | 's' | 'x' => {
                if !inline.contains(flag) {
                    inline.push(flag);
                }
            }
            'u' => {}
            other => return Err(other),
        }
    }

    if inline.is_empty() {
        Ok(Cow::Borrowed(body))
    } else {
        Ok(Cow::Owned(format!("(?{inline}){body}")))
    }
}

pub(crate) fn regex_params(rule: &str, params: &[Param]) -> Result<()> {
    compiled(rule, param_str(rule, params, 0)?).map(drop)
}

/// The value matches the pattern in `params[0]` somewhere.
pub(crate) fn matches_regex(input: &RuleInput<'_>) -> Result<bool> {
    let pattern = compiled(input.rule, param_str(input.rule, input.params, 0)?)?;
    Ok(scalar_string(input.value).is_some_and(|text| pattern.is_match(&text)))
}
