//! Rule parameters.
//!
//! Parameters are positional and their meaning is defined by each rule:
//! `length` takes one or two sizes, `equals` the name of another field,
//! `in` a list of allowed values, `dateBefore` a date. Most parameters are
//! plain JSON values; dates may also be passed pre-parsed.

use std::fmt;

use chrono::{DateTime, FixedOffset, Utc};
use serde_json::Value;

use crate::value::{scalar_string, type_name};

/// One positional rule parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum Param {
    /// Any JSON-representable value.
    Value(Value),
    /// A pre-parsed point in time.
    DateTime(DateTime<Utc>),
}

impl Param {
    /// Returns the JSON value, if this is not a pre-parsed date.
    #[must_use]
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Self::Value(v) => Some(v),
            Self::DateTime(_) => None,
        }
    }

    /// Returns the string content of a string parameter.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        self.as_value().and_then(Value::as_str)
    }

    /// Returns the list content of an array parameter.
    #[must_use]
    pub fn as_array(&self) -> Option<&[Value]> {
        self.as_value()
            .and_then(Value::as_array)
            .map(Vec::as_slice)
    }

    /// Short type name used in parameter error messages.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Value(v) => type_name(v),
            Self::DateTime(_) => "datetime",
        }
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(Value::Array(items)) => {
                let rendered: Vec<String> = items
                    .iter()
                    .map(|item| {
                        scalar_string(item).map_or_else(|| item.to_string(), |s| s.into_owned())
                    })
                    .collect();
                f.write_str(&rendered.join(", "))
            }
            Self::Value(v) => match scalar_string(v) {
                Some(s) => f.write_str(&s),
                None => write!(f, "{v}"),
            },
            Self::DateTime(dt) => write!(f, "{}", dt.to_rfc3339()),
        }
    }
}

impl From<Value> for Param {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl From<DateTime<Utc>> for Param {
    fn from(value: DateTime<Utc>) -> Self {
        Self::DateTime(value)
    }
}

impl From<DateTime<FixedOffset>> for Param {
    fn from(value: DateTime<FixedOffset>) -> Self {
        Self::DateTime(value.with_timezone(&Utc))
    }
}

macro_rules! impl_param_from {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl From<$ty> for Param {
                fn from(value: $ty) -> Self {
                    Self::Value(Value::from(value))
                }
            }
        )+
    };
}

impl_param_from!(&str, String, bool, i32, i64, u32, u64, usize, f64);

impl<T> From<Vec<T>> for Param
where
    Value: From<T>,
{
    fn from(items: Vec<T>) -> Self {
        Self::Value(Value::Array(items.into_iter().map(Value::from).collect()))
    }
}

impl<T, const N: usize> From<[T; N]> for Param
where
    Value: From<T>,
{
    fn from(items: [T; N]) -> Self {
        Self::Value(Value::Array(items.into_iter().map(Value::from).collect()))
    }
}
