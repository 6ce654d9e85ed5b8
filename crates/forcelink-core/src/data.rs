//! Per-element key/value data.
//!
//! Hosts attach arbitrary data to their elements. The layout only reads and
//! writes a handful of reserved keys, listed in [`keys`].

use std::fmt;

use serde::{Deserialize, Serialize};

/// Reserved data keys the layout reads or writes.
pub mod keys {
    /// Set by the host before a run to pin a node in place.
    pub const PIN: &str = "pin";
    /// Written by the layout after pinning; set by the host to release a pin.
    pub const UNPIN: &str = "unpin";
    /// Present while the user drags the node.
    pub const DRAGGING: &str = "dragging";
}

/// Value stored under one element data key.
///
/// Truthiness follows the host convention: `false`, `0`, `NaN` and the
/// empty string are falsy, everything else is truthy.
///
/// # Examples
///
/// ```
/// use forcelink_core::data::DataValue;
///
/// assert!(DataValue::from(true).is_truthy());
/// assert!(DataValue::from("yes").is_truthy());
/// assert!(!DataValue::from(0.0).is_truthy());
/// assert!(!DataValue::from("").is_truthy());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DataValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl DataValue {
    /// Returns whether the value counts as a set flag.
    pub fn is_truthy(&self) -> bool {
        match self {
            DataValue::Bool(value) => *value,
            DataValue::Number(value) => *value != 0.0 && !value.is_nan(),
            DataValue::Text(value) => !value.is_empty(),
        }
    }
}

impl fmt::Display for DataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataValue::Bool(value) => write!(f, "{value}"),
            DataValue::Number(value) => write!(f, "{value}"),
            DataValue::Text(value) => f.write_str(value),
        }
    }
}

impl From<bool> for DataValue {
    fn from(value: bool) -> Self {
        DataValue::Bool(value)
    }
}

impl From<f64> for DataValue {
    fn from(value: f64) -> Self {
        DataValue::Number(value)
    }
}

impl From<&str> for DataValue {
    fn from(value: &str) -> Self {
        DataValue::Text(value.to_string())
    }
}

impl From<String> for DataValue {
    fn from(value: String) -> Self {
        DataValue::Text(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truthiness() {
        assert!(DataValue::Bool(true).is_truthy());
        assert!(!DataValue::Bool(false).is_truthy());
        assert!(DataValue::Number(-1.0).is_truthy());
        assert!(!DataValue::Number(0.0).is_truthy());
        assert!(!DataValue::Number(f64::NAN).is_truthy());
        assert!(DataValue::Text("0".to_string()).is_truthy());
        assert!(!DataValue::Text(String::new()).is_truthy());
    }

    #[test]
    fn test_display() {
        assert_eq!(DataValue::from(true).to_string(), "true");
        assert_eq!(DataValue::from(2.5).to_string(), "2.5");
        assert_eq!(DataValue::from("label").to_string(), "label");
    }
}
