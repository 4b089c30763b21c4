//! Configuration for a validator instance.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Settings shared by every rule a validator runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    /// Upper bound for the `urlActive` DNS lookup. A lookup that takes longer
    /// fails the rule.
    pub dns_timeout: Duration,
    /// Message template for custom rules registered without one.
    pub default_message: String,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            dns_timeout: Duration::from_secs(5),
            default_message: "{field} is invalid".to_owned(),
        }
    }
}

impl ValidatorConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the DNS lookup timeout.
    #[must_use]
    pub fn with_dns_timeout(mut self, timeout: Duration) -> Self {
        self.dns_timeout = timeout;
        self
    }

    /// Sets the fallback message template.
    #[must_use]
    pub fn with_default_message(mut self, template: impl Into<String>) -> Self {
        self.default_message = template.into();
        self
    }
}
