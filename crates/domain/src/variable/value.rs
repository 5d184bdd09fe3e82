//! Variable value types

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Reserved value meaning "every option of the variable is selected".
pub const ALL_VALUE: &str = "$__all";

/// A variable value: either one string or an ordered sequence of strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VariableValue {
    /// A single value.
    Single(String),
    /// Several selected values, in selection order.
    Multi(Vec<String>),
}

impl VariableValue {
    /// Creates a multi value from any sequence of strings.
    #[must_use]
    pub fn multi<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Multi(values.into_iter().map(Into::into).collect())
    }

    /// Returns the value if this is a single value.
    #[must_use]
    pub fn as_single(&self) -> Option<&str> {
        match self {
            Self::Single(value) => Some(value),
            Self::Multi(_) => None,
        }
    }

    /// Returns true for the multi-valued form, even with one element.
    #[must_use]
    pub const fn is_multi(&self) -> bool {
        matches!(self, Self::Multi(_))
    }

    /// Returns the values as a slice-like list.
    #[must_use]
    pub fn values(&self) -> Vec<&str> {
        match self {
            Self::Single(value) => vec![value.as_str()],
            Self::Multi(values) => values.iter().map(String::as_str).collect(),
        }
    }

    /// Returns true if this value selects every option.
    ///
    /// A multi value counts when its first element is the sentinel.
    #[must_use]
    pub fn is_all(&self) -> bool {
        match self {
            Self::Single(value) => value == ALL_VALUE,
            Self::Multi(values) => values.first().is_some_and(|v| v == ALL_VALUE),
        }
    }
}

impl Default for VariableValue {
    fn default() -> Self {
        Self::Single(String::new())
    }
}

impl From<&str> for VariableValue {
    fn from(value: &str) -> Self {
        Self::Single(value.to_string())
    }
}

impl From<String> for VariableValue {
    fn from(value: String) -> Self {
        Self::Single(value)
    }
}

impl From<Vec<String>> for VariableValue {
    fn from(values: Vec<String>) -> Self {
        Self::Multi(values)
    }
}

impl From<Vec<&str>> for VariableValue {
    fn from(values: Vec<&str>) -> Self {
        Self::multi(values)
    }
}

/// The current selection of a variable.
///
/// `text` mirrors `value` structurally; when absent it is the value itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentValue {
    /// The selected value(s).
    #[serde(default)]
    pub value: VariableValue,

    /// Display text of the selection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<VariableValue>,
}

impl CurrentValue {
    /// Creates a selection whose text equals its value.
    #[must_use]
    pub fn new(value: impl Into<VariableValue>) -> Self {
        Self {
            value: value.into(),
            text: None,
        }
    }

    /// Creates a selection with a distinct display text.
    #[must_use]
    pub fn with_text(value: impl Into<VariableValue>, text: impl Into<VariableValue>) -> Self {
        Self {
            value: value.into(),
            text: Some(text.into()),
        }
    }

    /// Returns the display text, falling back to the value.
    #[must_use]
    pub fn text(&self) -> &VariableValue {
        self.text.as_ref().unwrap_or(&self.value)
    }
}

/// URL query parameters produced from variable values, keyed by parameter name.
pub type UrlParams = BTreeMap<String, VariableValue>;
