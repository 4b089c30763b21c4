//! Macros for building rule parameter lists.
//!
//! # Available Macros
//!
//! - [`params!`]: build a `Vec<Param>` from heterogeneous values

/// Builds a `Vec<Param>` from values of different types.
///
/// Every element is converted with `Param::from`, so strings, numbers,
/// booleans, lists, JSON values and `chrono` date-times can be mixed.
///
/// # Examples
///
/// ```
/// use fieldcheck_validator::{params, Param};
/// use serde_json::json;
///
/// let params = params![2, 4];
/// assert_eq!(params, vec![Param::from(2), Param::from(4)]);
///
/// let allowed = params![vec!["draft", "published"]];
/// assert_eq!(allowed[0], Param::Value(json!(["draft", "published"])));
///
/// let none = params![];
/// assert!(none.is_empty());
/// ```
#[macro_export]
macro_rules! params {
    () => {
        ::std::vec::Vec::<$crate::Param>::new()
    };
    ($($param:expr),+ $(,)?) => {
        ::std::vec![$($crate::Param::from($param)),+]
    };
}
