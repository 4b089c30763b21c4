//! Rule registry: name → predicate resolution.
//!
//! The registry has two tiers:
//!
//! 1. **Custom rules**, registered at runtime under an exact name. They are
//!    kept behind a [`parking_lot::RwLock`] so validators on other threads can
//!    keep resolving while a rule is added.
//! 2. **Built-in rules** from the static [`catalog`](crate::rules::catalog),
//!    matched case-insensitively.
//!
//! A custom rule registered under a built-in's name shadows the built-in for
//! every validator that resolves through that registry from then on.
//! Resolution happens when a rule is added to a plan (to report typos early)
//! and again when the plan runs.
//!
//! [`RuleRegistry::global`] is the process-wide registry that
//! [`Validator::new`](crate::Validator::new) uses. Validators that need an
//! isolated rule set can be given their own registry through
//! [`ValidatorBuilder::registry`](crate::ValidatorBuilder::registry).

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, LazyLock};

use parking_lot::RwLock;
use serde_json::Value;
use tracing::debug;

use crate::config::ValidatorConfig;
use crate::error::{ConfigError, Result};
use crate::param::Param;
use crate::rules::{self, Builtin};
use crate::store::FieldStore;

static GLOBAL: LazyLock<Arc<RuleRegistry>> = LazyLock::new(|| Arc::new(RuleRegistry::new()));

// ============================================================================
// RULE INPUT
// ============================================================================

/// Everything a rule sees when it is evaluated for one field.
#[derive(Debug, Clone, Copy)]
pub struct RuleInput<'a> {
    /// Name of the rule as it appears in the plan.
    pub rule: &'a str,
    /// Field being validated.
    pub field: &'a str,
    /// Value of that field (`null` when absent).
    pub value: &'a Value,
    /// Positional parameters bound to the registration.
    pub params: &'a [Param],
    /// The whole field store, for cross-field rules.
    pub data: &'a FieldStore,
    /// Settings of the running validator.
    pub config: &'a ValidatorConfig,
}

impl<'a> RuleInput<'a> {
    /// Parameter at `index`, or `InvalidParameter` if it is missing.
    pub fn param(&self, index: usize) -> Result<&'a Param> {
        self.params.get(index).ok_or_else(|| {
            ConfigError::invalid_parameter(
                self.rule,
                format!("missing parameter #{}", index + 1),
            )
        })
    }

    /// Shorthand for an `InvalidParameter` error attributed to this rule.
    pub fn invalid(&self, reason: impl Into<String>) -> ConfigError {
        ConfigError::invalid_parameter(self.rule, reason.into())
    }
}

// ============================================================================
// RULE TRAIT
// ============================================================================

/// A named check that decides whether one field value is acceptable.
///
/// Returning `Ok(false)` records a validation failure. Returning `Err` means
/// the rule was misconfigured and aborts the validation pass.
///
/// Closures taking a `&RuleInput` implement this trait directly:
///
/// ```
/// use fieldcheck_validator::{RuleInput, RuleRegistry};
///
/// let registry = RuleRegistry::new();
/// registry
///     .register_rule(
///         "sameAsFirst",
///         |input: &RuleInput<'_>| -> fieldcheck_validator::Result<bool> {
///             let other = input.param(0)?.as_str().unwrap_or_default();
///             Ok(input.data.get(other) == input.value)
///         },
///         None,
///     )
///     .unwrap();
/// assert!(registry.contains("sameAsFirst"));
/// ```
pub trait Rule: Send + Sync {
    /// Evaluates the rule for one field.
    fn check(&self, input: &RuleInput<'_>) -> Result<bool>;
}

impl<F> Rule for F
where
    F: for<'a> Fn(&RuleInput<'a>) -> Result<bool> + Send + Sync,
{
    fn check(&self, input: &RuleInput<'_>) -> Result<bool> {
        self(input)
    }
}

/// Adapts a plain `(field, value, params) -> bool` predicate to [`Rule`].
struct Predicate<F>(F);

impl<F> Rule for Predicate<F>
where
    F: Fn(&str, &Value, &[Param]) -> bool + Send + Sync,
{
    fn check(&self, input: &RuleInput<'_>) -> Result<bool> {
        Ok((self.0)(input.field, input.value, input.params))
    }
}

// ============================================================================
// RESOLVED RULE
// ============================================================================

#[derive(Clone)]
struct CustomRule {
    rule: Arc<dyn Rule>,
    message: Option<String>,
}

/// A rule name resolved to something callable.
#[derive(Clone)]
pub enum ResolvedRule {
    /// A rule registered at runtime.
    Custom {
        /// The predicate.
        rule: Arc<dyn Rule>,
        /// Message given at registration, if any.
        message: Option<String>,
    },
    /// A rule from the built-in catalog.
    Builtin(&'static Builtin),
}

impl ResolvedRule {
    /// Evaluates the resolved rule.
    pub fn check(&self, input: &RuleInput<'_>) -> Result<bool> {
        match self {
            Self::Custom { rule, .. } => rule.check(input),
            Self::Builtin(builtin) => (builtin.check)(input),
        }
    }

    /// Template used when the registration carries no message of its own.
    #[must_use]
    pub fn default_message<'a>(&'a self, params: &[Param], fallback: &'a str) -> &'a str {
        match self {
            Self::Custom { message, .. } => message.as_deref().unwrap_or(fallback),
            Self::Builtin(builtin) => builtin.default_message(params),
        }
    }

    /// Returns `true` if this resolved to the built-in catalog.
    #[must_use]
    pub fn is_builtin(&self) -> bool {
        matches!(self, Self::Builtin(_))
    }
}

impl fmt::Debug for ResolvedRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Custom { message, .. } => f
                .debug_struct("Custom")
                .field("message", message)
                .finish_non_exhaustive(),
            Self::Builtin(builtin) => f.debug_tuple("Builtin").field(&builtin.name).finish(),
        }
    }
}

// ============================================================================
// REGISTRY
// ============================================================================

/// Shared mapping from rule name to predicate.
#[derive(Default)]
pub struct RuleRegistry {
    custom: RwLock<HashMap<String, CustomRule>>,
}

impl RuleRegistry {
    /// Creates a registry holding only the built-in catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry shared by validators built with
    /// [`Validator::new`](crate::Validator::new).
    #[must_use]
    pub fn global() -> Arc<Self> {
        Arc::clone(&GLOBAL)
    }

    /// Registers a `(field, value, params) -> bool` predicate under `name`.
    ///
    /// An existing custom rule or built-in with the same name is overridden.
    pub fn register<F>(&self, name: impl Into<String>, predicate: F) -> Result<()>
    where
        F: Fn(&str, &Value, &[Param]) -> bool + Send + Sync + 'static,
    {
        self.insert(name.into(), Arc::new(Predicate(predicate)), None)
    }

    /// Like [`register`](Self::register), with a default message template.
    pub fn register_with_message<F>(
        &self,
        name: impl Into<String>,
        predicate: F,
        message: impl Into<String>,
    ) -> Result<()>
    where
        F: Fn(&str, &Value, &[Param]) -> bool + Send + Sync + 'static,
    {
        self.insert(
            name.into(),
            Arc::new(Predicate(predicate)),
            Some(message.into()),
        )
    }

    /// Registers a full [`Rule`], which sees the whole [`RuleInput`] and may
    /// reject its parameters.
    pub fn register_rule<R>(
        &self,
        name: impl Into<String>,
        rule: R,
        message: Option<String>,
    ) -> Result<()>
    where
        R: Rule + 'static,
    {
        self.insert(name.into(), Arc::new(rule), message)
    }

    fn insert(&self, name: String, rule: Arc<dyn Rule>, message: Option<String>) -> Result<()> {
        if name.is_empty() {
            return Err(ConfigError::invalid_rule(name, "rule name must not be empty"));
        }
        if name.chars().any(char::is_whitespace) {
            return Err(ConfigError::invalid_rule(
                name,
                "rule name must not contain whitespace",
            ));
        }
        if message.as_deref().is_some_and(|m| m.trim().is_empty()) {
            return Err(ConfigError::invalid_rule(
                name,
                "default message must not be empty",
            ));
        }

        let shadows_builtin = rules::lookup(&name).is_some();
        let replaced = self
            .custom
            .write()
            .insert(name.clone(), CustomRule { rule, message })
            .is_some();

        debug!(rule = %name, shadows_builtin, replaced, "registered custom rule");
        Ok(())
    }

    /// Removes a custom rule. Built-ins cannot be removed; removing a custom
    /// rule that shadowed one makes the built-in visible again.
    pub fn unregister(&self, name: &str) -> bool {
        let removed = self.custom.write().remove(name).is_some();
        if removed {
            debug!(rule = %name, "unregistered custom rule");
        }
        removed
    }

    /// Returns `true` if `name` resolves to a custom rule or a built-in.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.custom.read().contains_key(name) || rules::lookup(name).is_some()
    }

    /// Names of all custom rules, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.custom.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Resolves `name`: an exact custom match wins, then the built-in catalog.
    ///
    /// The lock is released before the returned rule is invoked, so rules may
    /// themselves consult the registry.
    pub fn resolve(&self, name: &str) -> Result<ResolvedRule> {
        if let Some(custom) = self.custom.read().get(name) {
            return Ok(ResolvedRule::Custom {
                rule: Arc::clone(&custom.rule),
                message: custom.message.clone(),
            });
        }

        rules::lookup(name)
            .map(ResolvedRule::Builtin)
            .ok_or_else(|| ConfigError::unknown_rule(name))
    }
}

impl fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleRegistry")
            .field("custom", &self.names())
            .field("builtins", &rules::catalog().len())
            .finish()
    }
}
