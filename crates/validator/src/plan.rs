//! Validation plan: the ordered list of rule registrations.

use crate::param::Param;

/// One rule bound to one or more fields.
///
/// Registrations are evaluated in the order they were added, and each
/// registration visits its fields in list order.
#[derive(Debug, Clone, PartialEq)]
pub struct Registration {
    /// Rule name, as given by the caller.
    pub rule: String,
    /// Fields the rule applies to. Never empty.
    pub fields: Vec<String>,
    /// Positional parameters passed to the rule.
    pub params: Vec<Param>,
    /// Message template that overrides the rule's default.
    pub message: Option<String>,
}

impl Registration {
    /// Creates a registration without a message override.
    #[must_use]
    pub fn new(rule: impl Into<String>, fields: FieldList, params: Vec<Param>) -> Self {
        Self {
            rule: rule.into(),
            fields: fields.0,
            params,
            message: None,
        }
    }
}

/// One field name or several, normalised to a list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldList(Vec<String>);

impl FieldList {
    /// Returns `true` if no field was named.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The field names.
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl From<&str> for FieldList {
    fn from(field: &str) -> Self {
        Self(vec![field.to_owned()])
    }
}

impl From<String> for FieldList {
    fn from(field: String) -> Self {
        Self(vec![field])
    }
}

impl From<&String> for FieldList {
    fn from(field: &String) -> Self {
        Self(vec![field.clone()])
    }
}

impl From<Vec<String>> for FieldList {
    fn from(fields: Vec<String>) -> Self {
        Self(fields)
    }
}

impl From<Vec<&str>> for FieldList {
    fn from(fields: Vec<&str>) -> Self {
        Self(fields.into_iter().map(str::to_owned).collect())
    }
}

impl From<&[&str]> for FieldList {
    fn from(fields: &[&str]) -> Self {
        Self(fields.iter().map(|f| (*f).to_owned()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for FieldList {
    fn from(fields: [&str; N]) -> Self {
        Self(fields.into_iter().map(str::to_owned).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_field_becomes_a_list() {
        assert_eq!(FieldList::from("email").as_slice(), ["email"]);
        assert_eq!(FieldList::from(String::from("email")).as_slice(), ["email"]);
    }

    #[test]
    fn test_many_fields_keep_order() {
        assert_eq!(FieldList::from(["b", "a"]).as_slice(), ["b", "a"]);
        assert_eq!(FieldList::from(vec!["x", "y", "z"]).as_slice(), ["x", "y", "z"]);
        assert!(FieldList::from(Vec::<String>::new()).is_empty());
    }

    #[test]
    fn test_registration_has_no_message_by_default() {
        let registration = Registration::new("length", "name".into(), vec![Param::from(3)]);
        assert_eq!(registration.rule, "length");
        assert_eq!(registration.fields, vec!["name".to_owned()]);
        assert!(registration.message.is_none());
    }
}
