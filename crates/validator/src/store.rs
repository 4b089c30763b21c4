//! The field store: the filtered snapshot of input a validator works on.

use std::collections::HashSet;

use indexmap::IndexMap;
use serde_json::Value;

static ABSENT: Value = Value::Null;

/// Field name → value mapping, built once from the caller's input.
///
/// Insertion order of the source is preserved. Missing fields read as
/// `null`; reading never fails.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldStore {
    fields: IndexMap<String, Value>,
}

impl FieldStore {
    /// Keeps every field of `data`.
    pub fn new<I, K>(data: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        Self {
            fields: data.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    /// Keeps only the fields of `data` named in `allowed`.
    ///
    /// An empty allow-list keeps everything. Fields not on the list are
    /// dropped silently.
    pub fn filtered<I, K, A, S>(data: I, allowed: A) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
        A: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let allowed: HashSet<String> = allowed
            .into_iter()
            .map(|name| name.as_ref().to_owned())
            .collect();

        if allowed.is_empty() {
            return Self::new(data);
        }

        Self {
            fields: data
                .into_iter()
                .map(|(k, v)| (k.into(), v))
                .filter(|(k, _)| allowed.contains(k))
                .collect(),
        }
    }

    /// Value of `field`, or `null` when the field is absent.
    #[must_use]
    pub fn get(&self, field: &str) -> &Value {
        self.fields.get(field).unwrap_or(&ABSENT)
    }

    /// Returns `true` if `field` is present, even when its value is `null`.
    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Returns `true` if `field` is present with a non-null value.
    ///
    /// Cross-field rules use this to decide whether the other field exists.
    #[must_use]
    pub fn is_set(&self, field: &str) -> bool {
        self.fields.get(field).is_some_and(|v| !v.is_null())
    }

    /// The full filtered mapping.
    #[must_use]
    pub fn all(&self) -> &IndexMap<String, Value> {
        &self.fields
    }

    /// Number of fields kept.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if no field was kept.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl From<serde_json::Map<String, Value>> for FieldStore {
    fn from(map: serde_json::Map<String, Value>) -> Self {
        Self::new(map)
    }
}

/// A JSON object contributes its entries; any other JSON value holds no fields.
impl From<Value> for FieldStore {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => Self::from(map),
            _ => Self::default(),
        }
    }
}

impl From<IndexMap<String, Value>> for FieldStore {
    fn from(fields: IndexMap<String, Value>) -> Self {
        Self { fields }
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for FieldStore {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self::new(iter)
    }
}

impl IntoIterator for FieldStore {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Vec<(&'static str, Value)> {
        vec![
            ("name", json!("Ada")),
            ("email", json!("ada@example.com")),
            ("age", json!(36)),
            ("nickname", Value::Null),
        ]
    }

    #[test]
    fn test_keeps_everything_without_allow_list() {
        let store = FieldStore::new(sample());
        assert_eq!(store.len(), 4);
        assert_eq!(store.get("age"), &json!(36));
    }

    #[test]
    fn test_empty_allow_list_keeps_everything() {
        let store = FieldStore::filtered(sample(), Vec::<&str>::new());
        assert_eq!(store.len(), 4);
    }

    #[test]
    fn test_allow_list_filters_silently() {
        let store = FieldStore::filtered(sample(), ["name", "age", "unknown"]);
        let keys: Vec<&str> = store.all().keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["name", "age"]);
        assert!(!store.contains("email"));
    }

    #[test]
    fn test_missing_field_reads_as_null() {
        let store = FieldStore::new(sample());
        assert_eq!(store.get("missing"), &Value::Null);
        assert!(!store.contains("missing"));
    }

    #[test]
    fn test_is_set_ignores_null_values() {
        let store = FieldStore::new(sample());
        assert!(store.contains("nickname"));
        assert!(!store.is_set("nickname"));
        assert!(store.is_set("name"));
    }

    #[test]
    fn test_from_json_map() {
        let Value::Object(map) = json!({"a": 1, "b": "two"}) else {
            panic!("expected object");
        };
        let store = FieldStore::from(map);
        assert_eq!(store.get("b"), &json!("two"));
    }

    #[test]
    fn test_from_json_value() {
        assert_eq!(FieldStore::from(json!({"a": 1})).len(), 1);
        assert!(FieldStore::from(json!([1, 2])).is_empty());
        assert!(FieldStore::from(Value::Null).is_empty());
    }

    #[test]
    fn test_refilter_existing_store() {
        let store = FieldStore::filtered(FieldStore::new(sample()), ["email"]);
        assert_eq!(store.len(), 1);
        assert!(store.is_set("email"));
    }
}
