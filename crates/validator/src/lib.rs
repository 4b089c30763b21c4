//! # fieldcheck-validator
//!
//! A rule-driven validation engine for form-like field data.
//!
//! ## Quick Start
//!
//! ```rust
//! use fieldcheck_validator::prelude::*;
//! use serde_json::json;
//!
//! let mut v = Validator::new(json!({"pass": "x", "confirm": "x", "age": "17"}));
//! v.rule_with("equals", "confirm", ["pass"])?
//!     .rule_with("min", "age", [18])?
//!     .message("{field} must be {0} or older");
//!
//! assert!(!v.validate()?);
//! assert_eq!(v.errors_for("age"), Some(&["age must be 18 or older".to_owned()][..]));
//! assert_eq!(v.errors_for("confirm"), None);
//! # Ok::<(), ConfigError>(())
//! ```
//!
//! ## Layers
//!
//! - [`FieldStore`]: the filtered, read-only field data.
//! - [`RuleRegistry`]: name → rule resolution, custom rules first, then the
//!   built-in [`rules::catalog`].
//! - [`Validator`]: builds a plan of [`Registration`]s and executes it.
//! - [`ErrorReport`]: per-field messages of the last pass.
//!
//! ## Built-in Rules
//!
//! - **Presence**: `required`, `accepted`
//! - **Comparison**: `equals`, `different`, `in`, `notIn`, `min`, `max`
//! - **Numeric**: `numeric`, `integer`
//! - **Text**: `length`, `alpha`, `alphaNum`, `alphaDash`, `regex`
//! - **Network**: `ip`, `email`, `url`, `urlActive`
//! - **Temporal**: `date`, `dateFormat`, `dateBefore`, `dateAfter`
//!
//! ## Errors
//!
//! A failed rule is not an error. [`ConfigError`] is reserved for programmer
//! mistakes: unknown rule names, unusable custom rules and malformed
//! parameters.

pub mod config;
pub mod error;
mod macros;
pub mod message;
pub mod param;
pub mod plan;
pub mod prelude;
pub mod registry;
pub mod report;
pub mod rules;
pub mod store;
pub mod validator;
pub mod value;

pub use config::ValidatorConfig;
pub use error::{ConfigError, Result};
pub use param::Param;
pub use plan::{FieldList, Registration};
pub use registry::{ResolvedRule, Rule, RuleInput, RuleRegistry};
pub use report::ErrorReport;
pub use store::FieldStore;
pub use validator::{Validator, ValidatorBuilder};
