//! Per-field error report produced by a validation pass.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Field name → formatted messages, in the order the failures happened.
///
/// A field that passed every rule has no entry. Serialises as a plain JSON
/// object:
///
/// ```
/// use fieldcheck_validator::ErrorReport;
///
/// let mut report = ErrorReport::new();
/// report.add("email", "email must be a valid email address");
/// assert_eq!(
///     serde_json::to_string(&report).unwrap(),
///     r#"{"email":["email must be a valid email address"]}"#
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ErrorReport {
    fields: IndexMap<String, Vec<String>>,
}

impl ErrorReport {
    /// Creates an empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `message` to the messages of `field`.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.fields
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    /// Returns `true` if no field failed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Number of fields with at least one failure.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Total number of messages across all fields.
    #[must_use]
    pub fn message_count(&self) -> usize {
        self.fields.values().map(Vec::len).sum()
    }

    /// Messages for `field`, or `None` when the field has no failures.
    #[must_use]
    pub fn messages(&self, field: &str) -> Option<&[String]> {
        self.fields.get(field).map(Vec::as_slice)
    }

    /// Names of the fields that failed, in order of first failure.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Iterates over `(field, messages)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.fields
            .iter()
            .map(|(field, messages)| (field.as_str(), messages.as_slice()))
    }

    /// Consumes the report and returns the underlying map.
    #[must_use]
    pub fn into_inner(self) -> IndexMap<String, Vec<String>> {
        self.fields
    }
}

impl fmt::Display for ErrorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.fields {
            for message in messages {
                if !first {
                    writeln!(f)?;
                }
                write!(f, "{field}: {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a ErrorReport {
    type Item = (&'a String, &'a Vec<String>);
    type IntoIter = indexmap::map::Iter<'a, String, Vec<String>>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}
