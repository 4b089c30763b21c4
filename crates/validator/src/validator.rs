//! The validator: a field store, a plan of rule registrations, and the report
//! of the last pass.
//!
//! ```
//! use fieldcheck_validator::Validator;
//! use serde_json::json;
//!
//! let mut v = Validator::new(json!({"email": "not-an-email", "name": "Ada"}));
//! v.rule("required", ["name", "email"])?
//!     .rule("email", "email")?
//!     .rule_with("length", "name", [2, 32])?;
//!
//! assert!(!v.validate()?);
//! assert_eq!(
//!     v.errors_for("email"),
//!     Some(&["email must be a valid email address".to_owned()][..])
//! );
//! assert_eq!(v.errors_for("name"), None);
//! # Ok::<(), fieldcheck_validator::ConfigError>(())
//! ```

use std::mem;
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;
use tracing::{debug, trace, warn};

use crate::config::ValidatorConfig;
use crate::error::{ConfigError, Result};
use crate::message::format_message;
use crate::param::Param;
use crate::plan::{FieldList, Registration};
use crate::registry::{ResolvedRule, RuleInput, RuleRegistry};
use crate::report::ErrorReport;
use crate::store::FieldStore;

// ============================================================================
// VALIDATOR
// ============================================================================

/// Validates one set of field data against a plan of rules.
///
/// A plan is built with [`rule`](Self::rule) / [`rule_with`](Self::rule_with)
/// and consumed by [`validate`](Self::validate). After a pass the plan is
/// empty and the report of that pass is readable through
/// [`errors`](Self::errors) until the next pass or [`reset`](Self::reset).
/// The field data never changes, so the same instance can be validated again
/// with a new plan.
#[derive(Debug)]
pub struct Validator {
    store: FieldStore,
    registry: Arc<RuleRegistry>,
    config: ValidatorConfig,
    plan: Vec<Registration>,
    report: ErrorReport,
}

impl Validator {
    /// Creates a validator over every field of `data`, resolving rules
    /// through the [global registry](RuleRegistry::global).
    pub fn new(data: impl Into<FieldStore>) -> Self {
        Self::builder(data).build()
    }

    /// Creates a validator that keeps only the fields named in `allowed`.
    ///
    /// An empty list keeps every field.
    pub fn with_allowed_fields<A, S>(data: impl Into<FieldStore>, allowed: A) -> Self
    where
        A: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::builder(data).allowed_fields(allowed).build()
    }

    /// Starts a [`ValidatorBuilder`] for `data`.
    pub fn builder(data: impl Into<FieldStore>) -> ValidatorBuilder {
        ValidatorBuilder::new(data.into())
    }

    /// Registers a predicate in the global registry.
    ///
    /// Every validator resolving through the global registry sees the rule
    /// from then on, including plans that were built before the call.
    pub fn add_rule<F>(name: impl Into<String>, predicate: F) -> Result<()>
    where
        F: Fn(&str, &Value, &[Param]) -> bool + Send + Sync + 'static,
    {
        RuleRegistry::global().register(name, predicate)
    }

    // ------------------------------------------------------------------------
    // Plan building
    // ------------------------------------------------------------------------

    /// Adds a parameterless rule for one or more fields.
    pub fn rule(&mut self, name: &str, fields: impl Into<FieldList>) -> Result<&mut Self> {
        self.rule_with(name, fields, Vec::<Param>::new())
    }

    /// Adds a rule with positional parameters for one or more fields.
    ///
    /// The name must resolve now; an unknown name fails with
    /// [`ConfigError::UnknownRule`] before anything runs. Built-in rules also
    /// check the shape of their parameters here.
    pub fn rule_with<I, P>(
        &mut self,
        name: &str,
        fields: impl Into<FieldList>,
        params: I,
    ) -> Result<&mut Self>
    where
        I: IntoIterator<Item = P>,
        P: Into<Param>,
    {
        let fields = fields.into();
        if fields.is_empty() {
            return Err(ConfigError::invalid_parameter(
                name,
                "at least one field is required",
            ));
        }

        let params: Vec<Param> = params.into_iter().map(Into::into).collect();
        if let ResolvedRule::Builtin(builtin) = self.registry.resolve(name)? {
            builtin.validate_params(name, &params)?;
        }

        debug!(
            rule = name,
            fields = ?fields.as_slice(),
            params = params.len(),
            "added rule to plan"
        );
        self.plan.push(Registration::new(name, fields, params));
        Ok(self)
    }

    /// Overrides the message template of the most recently added rule.
    ///
    /// `{field}` is replaced by the field name and `{0}`, `{1}`, … by the
    /// rule's parameters. Does nothing when the plan is empty.
    pub fn message(&mut self, template: impl Into<String>) -> &mut Self {
        match self.plan.last_mut() {
            Some(registration) => registration.message = Some(template.into()),
            None => warn!("message() called with no rule in the plan; ignored"),
        }
        self
    }

    // ------------------------------------------------------------------------
    // Execution
    // ------------------------------------------------------------------------

    /// Runs the plan and returns `true` if every rule passed for every field.
    ///
    /// Every (rule, field) pair is evaluated, in registration order then field
    /// order, even after a failure. The plan is consumed whether or not the
    /// pass completes; a [`ConfigError`] raised by a rule aborts the pass and
    /// leaves an empty report.
    pub fn validate(&mut self) -> Result<bool> {
        let plan = mem::take(&mut self.plan);
        self.report = ErrorReport::new();

        let report = self.run(&plan)?;
        let passed = report.is_empty();
        self.report = report;
        Ok(passed)
    }

    /// Runs the plan and hands back its report, leaving none behind.
    pub fn validate_into_report(&mut self) -> Result<ErrorReport> {
        self.validate()?;
        Ok(mem::take(&mut self.report))
    }

    fn run(&self, plan: &[Registration]) -> Result<ErrorReport> {
        let mut report = ErrorReport::new();
        let mut evaluated = 0_usize;

        for registration in plan {
            let resolved = self.registry.resolve(&registration.rule)?;

            for field in &registration.fields {
                let input = RuleInput {
                    rule: &registration.rule,
                    field,
                    value: self.store.get(field),
                    params: &registration.params,
                    data: &self.store,
                    config: &self.config,
                };
                let passed = resolved.check(&input)?;
                evaluated += 1;
                trace!(rule = %registration.rule, field = %field, passed, "evaluated rule");

                if !passed {
                    let template = registration.message.as_deref().unwrap_or_else(|| {
                        resolved.default_message(&registration.params, &self.config.default_message)
                    });
                    report.add(
                        field.as_str(),
                        format_message(template, field, &registration.params),
                    );
                }
            }
        }

        debug!(
            rules = plan.len(),
            evaluated,
            failed_fields = report.len(),
            passed = report.is_empty(),
            "validation pass finished"
        );
        Ok(report)
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    /// Report of the last pass.
    #[must_use]
    pub fn errors(&self) -> &ErrorReport {
        &self.report
    }

    /// Messages recorded for `field` in the last pass, or `None` if it had
    /// no failures.
    #[must_use]
    pub fn errors_for(&self, field: &str) -> Option<&[String]> {
        self.report.messages(field)
    }

    /// The filtered field data.
    #[must_use]
    pub fn data(&self) -> &IndexMap<String, Value> {
        self.store.all()
    }

    /// Value of `field`, or `null` if it is absent.
    #[must_use]
    pub fn field(&self, field: &str) -> &Value {
        self.store.get(field)
    }

    /// Returns `true` if `field` survived filtering.
    #[must_use]
    pub fn has_field(&self, field: &str) -> bool {
        self.store.contains(field)
    }

    /// Registrations waiting for the next pass.
    #[must_use]
    pub fn plan(&self) -> &[Registration] {
        &self.plan
    }

    /// Settings of this validator.
    #[must_use]
    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Registry this validator resolves rules through.
    #[must_use]
    pub fn registry(&self) -> &Arc<RuleRegistry> {
        &self.registry
    }

    /// Drops the plan and the last report. Field data is kept.
    pub fn reset(&mut self) {
        self.plan.clear();
        self.report = ErrorReport::new();
    }
}

// ============================================================================
// BUILDER
// ============================================================================

/// Configures a [`Validator`] before it is built.
#[derive(Debug)]
pub struct ValidatorBuilder {
    store: FieldStore,
    allowed: Vec<String>,
    registry: Option<Arc<RuleRegistry>>,
    config: ValidatorConfig,
}

impl ValidatorBuilder {
    fn new(store: FieldStore) -> Self {
        Self {
            store,
            allowed: Vec::new(),
            registry: None,
            config: ValidatorConfig::default(),
        }
    }

    /// Keeps only these fields. An empty list keeps every field.
    #[must_use]
    pub fn allowed_fields<A, S>(mut self, allowed: A) -> Self
    where
        A: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed = allowed.into_iter().map(Into::into).collect();
        self
    }

    /// Resolves rules through `registry` instead of the global one.
    #[must_use]
    pub fn registry(mut self, registry: Arc<RuleRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Replaces the default configuration.
    #[must_use]
    pub fn config(mut self, config: ValidatorConfig) -> Self {
        self.config = config;
        self
    }

    /// Builds the validator.
    #[must_use]
    pub fn build(self) -> Validator {
        let store = if self.allowed.is_empty() {
            self.store
        } else {
            FieldStore::filtered(self.store, &self.allowed)
        };

        Validator {
            store,
            registry: self.registry.unwrap_or_else(RuleRegistry::global),
            config: self.config,
            plan: Vec::new(),
            report: ErrorReport::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn isolated(data: Value) -> Validator {
        Validator::builder(data)
            .registry(Arc::new(RuleRegistry::new()))
            .build()
    }

    #[test]
    fn test_passing_plan() {
        let mut v = isolated(json!({"name": "Ada", "age": 36}));
        v.rule("required", ["name", "age"])
            .unwrap()
            .rule_with("min", "age", [18])
            .unwrap();
        assert!(v.validate().unwrap());
        assert!(v.errors().is_empty());
    }

    #[test]
    fn test_every_pair_is_evaluated() {
        let mut v = isolated(json!({"a": "", "b": "x1"}));
        v.rule("required", ["a", "b", "c"])
            .unwrap()
            .rule("alpha", ["a", "b"])
            .unwrap();
        assert!(!v.validate().unwrap());

        let expected = json!({
            "a": ["a is required", "a must contain only letters a-z"],
            "c": ["c is required"],
            "b": ["b must contain only letters a-z"],
        });
        assert_eq!(serde_json::to_value(v.errors()).unwrap(), expected);
        let order: Vec<&str> = v.errors().fields().collect();
        assert_eq!(order, vec!["a", "c", "b"]);
    }

    #[test]
    fn test_message_override_applies_to_last_rule() {
        let mut v = isolated(json!({"code": "abc"}));
        v.rule_with("length", "code", [5])
            .unwrap()
            .message("{field} needs {0} characters");
        v.rule("numeric", "code").unwrap();
        assert!(!v.validate().unwrap());
        assert_eq!(
            v.errors_for("code").unwrap(),
            ["code needs 5 characters", "code must be numeric"]
        );
    }

    #[test]
    fn test_message_on_empty_plan_is_ignored() {
        let mut v = isolated(json!({}));
        v.message("ignored");
        assert!(v.plan().is_empty());
    }

    #[test]
    fn test_default_messages_render_params() {
        let mut v = isolated(json!({"name": "A", "age": 3}));
        v.rule_with("length", "name", [2, 4])
            .unwrap()
            .rule_with("min", "age", [18])
            .unwrap();
        assert!(!v.validate().unwrap());
        assert_eq!(
            v.errors_for("name").unwrap(),
            ["name must be between 2 and 4 characters long"]
        );
        assert_eq!(v.errors_for("age").unwrap(), ["age must be at least 18"]);
    }

    #[test]
    fn test_unknown_rule_fails_at_plan_time() {
        let mut v = isolated(json!({"f": 1}));
        let err = v.rule("bogus", "f").unwrap_err();
        assert_eq!(err, ConfigError::unknown_rule("bogus"));
        assert!(v.plan().is_empty());
    }

    #[test]
    fn test_rule_names_are_case_insensitive_for_builtins() {
        let mut v = isolated(json!({"f": "abc"}));
        v.rule("ALPHA", "f").unwrap();
        assert!(v.validate().unwrap());
    }

    #[test]
    fn test_bad_builtin_params_fail_at_plan_time() {
        let mut v = isolated(json!({"f": "a"}));
        assert!(matches!(
            v.rule("length", "f"),
            Err(ConfigError::InvalidParameter { .. })
        ));
        assert!(matches!(
            v.rule_with("in", "f", ["a"]),
            Err(ConfigError::InvalidParameter { .. })
        ));
        assert!(v.plan().is_empty());
    }

    #[test]
    fn test_empty_field_list_is_rejected() {
        let mut v = isolated(json!({}));
        assert!(matches!(
            v.rule("required", Vec::<String>::new()),
            Err(ConfigError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_validate_resets_the_plan() {
        let mut v = isolated(json!({"email": "nope"}));
        v.rule("email", "email").unwrap();
        assert!(!v.validate().unwrap());
        assert!(v.plan().is_empty());
        assert!(v.errors_for("email").is_some());

        assert!(v.validate().unwrap());
        assert!(v.errors().is_empty());
    }

    #[test]
    fn test_reset_keeps_data() {
        let mut v = isolated(json!({"email": "nope"}));
        v.rule("email", "email").unwrap();
        v.validate().unwrap();
        v.rule("required", "email").unwrap();

        v.reset();
        assert!(v.plan().is_empty());
        assert!(v.errors().is_empty());
        assert_eq!(v.field("email"), &json!("nope"));
    }

    #[test]
    fn test_validate_into_report() {
        let mut v = isolated(json!({}));
        v.rule("required", "name").unwrap();
        let report = v.validate_into_report().unwrap();
        assert_eq!(report.messages("name").unwrap(), ["name is required"]);
        assert!(v.errors().is_empty());
    }

    #[test]
    fn test_custom_rule_error_aborts_pass_and_clears_plan() {
        let registry = Arc::new(RuleRegistry::new());
        registry
            .register_rule(
                "needsParam",
                |input: &RuleInput<'_>| -> Result<bool> {
                    input.param(0)?;
                    Ok(true)
                },
                None,
            )
            .unwrap();
        let mut v = Validator::builder(json!({"f": 1}))
            .registry(registry)
            .build();
        v.rule("needsParam", "f").unwrap();

        assert!(matches!(
            v.validate(),
            Err(ConfigError::InvalidParameter { .. })
        ));
        assert!(v.plan().is_empty());
        assert!(v.errors().is_empty());
    }

    #[test]
    fn test_custom_rule_uses_configured_fallback_message() {
        let registry = Arc::new(RuleRegistry::new());
        registry.register("never", |_, _, _| false).unwrap();
        registry
            .register_with_message("neverEither", |_, _, _| false, "{field} was rejected")
            .unwrap();
        let mut v = Validator::builder(json!({"f": 1}))
            .registry(registry)
            .config(ValidatorConfig::default().with_default_message("bad {field}"))
            .build();
        v.rule("never", "f").unwrap().rule("neverEither", "f").unwrap();

        assert!(!v.validate().unwrap());
        assert_eq!(v.errors_for("f").unwrap(), ["bad f", "f was rejected"]);
    }

    #[test]
    fn test_custom_rule_shadows_builtin_in_its_registry() {
        let registry = Arc::new(RuleRegistry::new());
        registry.register("email", |_, _, _| true).unwrap();
        let mut v = Validator::builder(json!({"email": "nope"}))
            .registry(registry)
            .build();
        v.rule("email", "email").unwrap();
        assert!(v.validate().unwrap());
    }

    #[test]
    fn test_rule_registered_after_plan_is_used_at_run_time() {
        let registry = Arc::new(RuleRegistry::new());
        let mut v = Validator::builder(json!({"f": "x"}))
            .registry(Arc::clone(&registry))
            .build();
        v.rule("alpha", "f").unwrap();
        registry.register("alpha", |_, _, _| false).unwrap();

        assert!(!v.validate().unwrap());
        assert_eq!(v.errors_for("f").unwrap(), ["f is invalid"]);
    }

    #[test]
    fn test_allowed_fields_filter() {
        let v = Validator::with_allowed_fields(json!({"a": 1, "b": 2, "c": 3}), ["a", "c", "z"]);
        let keys: Vec<&String> = v.data().keys().collect();
        assert_eq!(keys, ["a", "c"]);
        assert!(!v.has_field("b"));
        assert_eq!(v.field("b"), &Value::Null);
    }
}
