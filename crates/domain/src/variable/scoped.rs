//! Call-scoped variable overrides

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::value::VariableValue;
use crate::error::{DomainError, DomainResult};

/// An override of one variable for the duration of a single call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScopedValue {
    /// The value used instead of the variable's own.
    pub value: VariableValue,

    /// Display text; the value when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<VariableValue>,

    /// Excludes this override (and its variable) from URL serialization.
    #[serde(default)]
    pub skip_url_sync: bool,
}

impl ScopedValue {
    /// Creates an override whose text equals its value.
    #[must_use]
    pub fn new(value: impl Into<VariableValue>) -> Self {
        Self {
            value: value.into(),
            text: None,
            skip_url_sync: false,
        }
    }

    /// Sets the display text.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<VariableValue>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Marks the override as excluded from URL serialization.
    #[must_use]
    pub const fn skip_url_sync(mut self) -> Self {
        self.skip_url_sync = true;
        self
    }

    /// Returns the display text, falling back to the value.
    #[must_use]
    pub fn text(&self) -> &VariableValue {
        self.text.as_ref().unwrap_or(&self.value)
    }

    /// Parses a `name=value` assignment. A value containing commas becomes
    /// a multi value.
    ///
    /// # Errors
    /// Returns [`DomainError::InvalidScopedValue`] when there is no `=` or
    /// the name is empty.
    pub fn parse_assignment(input: &str) -> DomainResult<(String, Self)> {
        let (name, value) = input
            .split_once('=')
            .ok_or_else(|| DomainError::InvalidScopedValue(input.to_string()))?;

        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::InvalidScopedValue(input.to_string()));
        }

        let value = if value.contains(',') {
            VariableValue::multi(value.split(','))
        } else {
            VariableValue::from(value)
        };

        Ok((name.to_string(), Self::new(value)))
    }
}

/// Overrides keyed by variable name.
pub type ScopedVars = HashMap<String, ScopedValue>;

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_text_defaults_to_value() {
        let scoped = ScopedValue::new("100");
        assert_eq!(scoped.text(), &VariableValue::from("100"));

        let scoped = ScopedValue::new("mupp").with_text("asd");
        assert_eq!(scoped.text(), &VariableValue::from("asd"));
    }

    #[test]
    fn test_parse_single_assignment() {
        let (name, scoped) = ScopedValue::parse_assignment("__interval_ms=100").unwrap();
        assert_eq!(name, "__interval_ms");
        assert_eq!(scoped.value, VariableValue::from("100"));
        assert!(!scoped.skip_url_sync);
    }

    #[test]
    fn test_parse_multi_assignment() {
        let (name, scoped) = ScopedValue::parse_assignment("host=a,b").unwrap();
        assert_eq!(name, "host");
        assert_eq!(scoped.value, VariableValue::multi(["a", "b"]));
    }

    #[test]
    fn test_parse_invalid_assignment() {
        assert_eq!(
            ScopedValue::parse_assignment("novalue"),
            Err(DomainError::InvalidScopedValue("novalue".to_string()))
        );
        assert!(ScopedValue::parse_assignment("=x").is_err());
    }

    #[test]
    fn test_deserialize_skip_url_sync() {
        let scoped: ScopedValue =
            serde_json::from_str(r#"{"value": "val1", "skipUrlSync": true}"#).unwrap();
        assert!(scoped.skip_url_sync);
        assert_eq!(scoped.text(), &VariableValue::from("val1"));
    }
}
