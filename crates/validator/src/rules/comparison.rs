//! Comparison rules: `equals`, `different`, `in`, `notIn`, `min`, `max`.
//!
//! Equality is the loose policy of [`crate::value::loose_eq`]; bounds compare
//! the numeric cast of [`crate::value::to_number`].

use crate::error::Result;
use crate::param::Param;
use crate::registry::RuleInput;
use crate::value::{loose_eq, to_number};

use super::{param_array, param_number, param_str};

pub(crate) fn other_field_params(rule: &str, params: &[Param]) -> Result<()> {
    param_str(rule, params, 0).map(drop)
}

pub(crate) fn bound_params(rule: &str, params: &[Param]) -> Result<()> {
    param_number(rule, params, 0).map(drop)
}

pub(crate) fn list_params(rule: &str, params: &[Param]) -> Result<()> {
    param_array(rule, params, 0).map(drop)
}

/// The field named by `params[0]` is set and loosely equal to the value.
pub(crate) fn equals(input: &RuleInput<'_>) -> Result<bool> {
    let other = param_str(input.rule, input.params, 0)?;
    Ok(input.data.is_set(other) && loose_eq(input.value, input.data.get(other)))
}

/// The field named by `params[0]` is set and not loosely equal to the value.
pub(crate) fn different(input: &RuleInput<'_>) -> Result<bool> {
    let other = param_str(input.rule, input.params, 0)?;
    Ok(input.data.is_set(other) && !loose_eq(input.value, input.data.get(other)))
}

/// The value is loosely equal to a member of the list in `params[0]`.
pub(crate) fn in_list(input: &RuleInput<'_>) -> Result<bool> {
    let allowed = param_array(input.rule, input.params, 0)?;
    Ok(allowed.iter().any(|candidate| loose_eq(input.value, candidate)))
}

pub(crate) fn not_in_list(input: &RuleInput<'_>) -> Result<bool> {
    in_list(input).map(|found| !found)
}

/// Numeric cast of the value is at least `params[0]`.
pub(crate) fn min(input: &RuleInput<'_>) -> Result<bool> {
    let bound = param_number(input.rule, input.params, 0)?;
    Ok(to_number(input.value).is_some_and(|n| n >= bound))
}

/// Numeric cast of the value is at most `params[0]`.
pub(crate) fn max(input: &RuleInput<'_>) -> Result<bool> {
    let bound = param_number(input.rule, input.params, 0)?;
    Ok(to_number(input.value).is_some_and(|n| n <= bound))
}
