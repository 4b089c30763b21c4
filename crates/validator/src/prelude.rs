//! Prelude module for convenient imports.
//!
//! `use fieldcheck_validator::prelude::*;` brings in the validator, the
//! registry and the types that appear in their signatures.

pub use crate::config::ValidatorConfig;
pub use crate::error::{ConfigError, Result};
pub use crate::param::Param;
pub use crate::params;
pub use crate::plan::{FieldList, Registration};
pub use crate::registry::{Rule, RuleInput, RuleRegistry};
pub use crate::report::ErrorReport;
pub use crate::store::FieldStore;
pub use crate::validator::{Validator, ValidatorBuilder};
