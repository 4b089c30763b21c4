//! Configuration errors raised while building or running a validation plan.
//!
//! A failed rule is *not* an error: it is recorded in the
//! [`ErrorReport`](crate::report::ErrorReport) and reflected in the boolean
//! outcome of [`Validator::validate`](crate::validator::Validator::validate).
//! The variants here describe programmer mistakes that the engine cannot
//! recover from, so they are propagated to the caller as-is.

use std::borrow::Cow;

/// Result alias used throughout the crate.
pub type Result<T, E = ConfigError> = std::result::Result<T, E>;

/// Programmer mistakes detected at registration, plan-build or execution time.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// The rule name resolves neither to a custom rule nor to a built-in.
    #[error("rule '{name}' is not a built-in and has not been registered")]
    UnknownRule {
        /// The name that failed to resolve.
        name: String,
    },

    /// A custom rule could not be registered.
    #[error("rule '{name}' cannot be registered: {reason}")]
    InvalidRule {
        /// The offending rule name.
        name: String,
        /// Why registration was refused.
        reason: Cow<'static, str>,
    },

    /// The parameters bound to a rule do not have the shape the rule needs.
    #[error("invalid parameters for rule '{rule}': {reason}")]
    InvalidParameter {
        /// The rule that rejected its parameters.
        rule: String,
        /// What is wrong with them.
        reason: Cow<'static, str>,
    },
}

impl ConfigError {
    /// Creates an `UnknownRule` error.
    pub fn unknown_rule(name: impl Into<String>) -> Self {
        Self::UnknownRule { name: name.into() }
    }

    /// Creates an `InvalidRule` error.
    pub fn invalid_rule(name: impl Into<String>, reason: impl Into<Cow<'static, str>>) -> Self {
        Self::InvalidRule {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Creates an `InvalidParameter` error.
    pub fn invalid_parameter(
        rule: impl Into<String>,
        reason: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self::InvalidParameter {
            rule: rule.into(),
            reason: reason.into(),
        }
    }

    /// Short machine-readable code for the variant.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnknownRule { .. } => "unknown_rule",
            Self::InvalidRule { .. } => "invalid_rule",
            Self::InvalidParameter { .. } => "invalid_parameter",
        }
    }
}
