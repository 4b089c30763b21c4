//! Built-in rule catalog.
//!
//! Every built-in is a stateless `fn` that receives a [`RuleInput`] and
//! returns `Ok(true)` when the value is acceptable, `Ok(false)` when it is
//! not, and `Err(InvalidParameter)` when the rule was bound to parameters it
//! cannot use. Each entry also carries a parameter check, run when the rule is
//! added to a plan, and a default message template.
//!
//! # Families
//!
//! - **Presence**: `required`, `accepted`
//! - **Comparison**: `equals`, `different`, `in`, `notIn`, `min`, `max`
//! - **Numeric**: `numeric`, `integer`
//! - **Text**: `length`, `alpha`, `alphaNum`, `alphaDash`, `regex`
//! - **Network**: `ip`, `email`, `url`, `urlActive`
//! - **Temporal**: `date`, `dateFormat`, `dateBefore`, `dateAfter`

use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

use serde_json::Value;

use crate::error::{ConfigError, Result};
use crate::param::Param;
use crate::registry::RuleInput;
use crate::value::parse_numeric_str;

pub mod comparison;
pub mod date_parse;
pub mod network;
pub mod numeric;
pub mod presence;
pub mod temporal;
pub mod text;

// ============================================================================
// CATALOG ENTRY
// ============================================================================

/// One built-in rule.
pub struct Builtin {
    /// Canonical rule name.
    pub name: &'static str,
    pub(crate) check: fn(&RuleInput<'_>) -> Result<bool>,
    pub(crate) check_params: fn(&str, &[Param]) -> Result<()>,
    pub(crate) message: fn(&[Param]) -> &'static str,
}

impl Builtin {
    /// Default message template for a registration with `params`.
    #[must_use]
    pub fn default_message(&self, params: &[Param]) -> &'static str {
        (self.message)(params)
    }

    /// Checks that `params` have the shape this rule needs.
    pub fn validate_params(&self, rule: &str, params: &[Param]) -> Result<()> {
        (self.check_params)(rule, params)
    }
}

impl fmt::Debug for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Builtin").field("name", &self.name).finish_non_exhaustive()
    }
}

fn any_params(_rule: &str, _params: &[Param]) -> Result<()> {
    Ok(())
}

static CATALOG: [Builtin; 23] = [
    Builtin {
        name: "required",
        check: presence::required,
        check_params: any_params,
        message: |_| "{field} is required",
    },
    Builtin {
        name: "equals",
        check: comparison::equals,
        check_params: comparison::other_field_params,
        message: |_| "{field} must be the same as '{0}'",
    },
    Builtin {
        name: "different",
        check: comparison::different,
        check_params: comparison::other_field_params,
        message: |_| "{field} must be different than '{0}'",
    },
    Builtin {
        name: "accepted",
        check: presence::accepted,
        check_params: any_params,
        message: |_| "{field} must be accepted",
    },
    Builtin {
        name: "numeric",
        check: numeric::numeric,
        check_params: any_params,
        message: |_| "{field} must be numeric",
    },
    Builtin {
        name: "integer",
        check: numeric::integer,
        check_params: any_params,
        message: |_| "{field} must be an integer",
    },
    Builtin {
        name: "length",
        check: text::length,
        check_params: text::length_params,
        message: |params| {
            if params.len() >= 2 {
                "{field} must be between {0} and {1} characters long"
            } else {
                "{field} must be exactly {0} characters long"
            }
        },
    },
    Builtin {
        name: "min",
        check: comparison::min,
        check_params: comparison::bound_params,
        message: |_| "{field} must be at least {0}",
    },
    Builtin {
        name: "max",
        check: comparison::max,
        check_params: comparison::bound_params,
        message: |_| "{field} must be no more than {0}",
    },
    Builtin {
        name: "in",
        check: comparison::in_list,
        check_params: comparison::list_params,
        message: |_| "{field} contains an invalid value",
    },
    Builtin {
        name: "notIn",
        check: comparison::not_in_list,
        check_params: comparison::list_params,
        message: |_| "{field} contains an invalid value",
    },
    Builtin {
        name: "ip",
        check: network::ip,
        check_params: any_params,
        message: |_| "{field} is not a valid IP address",
    },
    Builtin {
        name: "email",
        check: network::email,
        check_params: any_params,
        message: |_| "{field} must be a valid email address",
    },
    Builtin {
        name: "url",
        check: network::valid_url,
        check_params: any_params,
        message: |_| "{field} is not a valid URL",
    },
    Builtin {
        name: "urlActive",
        check: network::url_active,
        check_params: any_params,
        message: |_| "{field} must be an active domain",
    },
    Builtin {
        name: "alpha",
        check: text::alpha,
        check_params: any_params,
        message: |_| "{field} must contain only letters a-z",
    },
    Builtin {
        name: "alphaNum",
        check: text::alpha_num,
        check_params: any_params,
        message: |_| "{field} must contain only letters a-z and/or numbers 0-9",
    },
    Builtin {
        name: "alphaDash",
        check: text::alpha_dash,
        check_params: any_params,
        message: |_| "{field} must contain only letters a-z, numbers 0-9, dashes and underscores",
    },
    Builtin {
        name: "regex",
        check: text::matches_regex,
        check_params: text::regex_params,
        message: |_| "{field} contains invalid characters",
    },
    Builtin {
        name: "date",
        check: temporal::date,
        check_params: any_params,
        message: |_| "{field} is not a valid date",
    },
    Builtin {
        name: "dateFormat",
        check: temporal::date_format,
        check_params: temporal::format_params,
        message: |_| "{field} must be a date with format '{0}'",
    },
    Builtin {
        name: "dateBefore",
        check: temporal::date_before,
        check_params: temporal::bound_params,
        message: |_| "{field} must be a date before '{0}'",
    },
    Builtin {
        name: "dateAfter",
        check: temporal::date_after,
        check_params: temporal::bound_params,
        message: |_| "{field} must be a date after '{0}'",
    },
];

static BY_NAME: LazyLock<HashMap<String, &'static Builtin>> = LazyLock::new(|| {
    CATALOG
        .iter()
        .map(|builtin| (builtin.name.to_ascii_lowercase(), builtin))
        .collect()
});

/// All built-in rules, in catalog order.
#[must_use]
pub fn catalog() -> &'static [Builtin] {
    &CATALOG
}

/// Finds a built-in by name, ignoring ASCII case.
#[must_use]
pub fn lookup(name: &str) -> Option<&'static Builtin> {
    BY_NAME.get(&name.to_ascii_lowercase()).copied()
}

// ============================================================================
// PARAMETER HELPERS
// ============================================================================

pub(crate) fn param<'a>(rule: &str, params: &'a [Param], index: usize) -> Result<&'a Param> {
    params.get(index).ok_or_else(|| {
        ConfigError::invalid_parameter(rule, format!("missing parameter #{}", index + 1))
    })
}

pub(crate) fn param_str<'a>(rule: &str, params: &'a [Param], index: usize) -> Result<&'a str> {
    let p = param(rule, params, index)?;
    p.as_str().ok_or_else(|| {
        ConfigError::invalid_parameter(
            rule,
            format!("parameter #{} must be a string, got {}", index + 1, p.kind()),
        )
    })
}

pub(crate) fn param_number(rule: &str, params: &[Param], index: usize) -> Result<f64> {
    let p = param(rule, params, index)?;
    let number = match p.as_value() {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => parse_numeric_str(s),
        _ => None,
    };
    number.ok_or_else(|| {
        ConfigError::invalid_parameter(
            rule,
            format!("parameter #{} must be numeric, got {}", index + 1, p.kind()),
        )
    })
}

pub(crate) fn param_array<'a>(
    rule: &str,
    params: &'a [Param],
    index: usize,
) -> Result<&'a [Value]> {
    let p = param(rule, params, index)?;
    p.as_array().ok_or_else(|| {
        ConfigError::invalid_parameter(
            rule,
            format!("parameter #{} must be a list, got {}", index + 1, p.kind()),
        )
    })
}

/// Evaluates a built-in outside a validator, for unit tests.
#[cfg(test)]
pub(crate) fn eval(
    check: fn(&RuleInput<'_>) -> Result<bool>,
    value: &Value,
    params: &[Param],
    data: &crate::store::FieldStore,
) -> Result<bool> {
    let config = crate::config::ValidatorConfig::default();
    check(&RuleInput {
        rule: "test",
        field: "field",
        value,
        params,
        data,
        config: &config,
    })
}
