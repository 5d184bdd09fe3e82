//! Built-in pseudo-variables
//!
//! Reserved values (such as an auto-computed interval) whose display text is
//! supplied by the host rather than by any variable.

use std::collections::HashMap;

/// Display texts of reserved values, keyed by the reserved value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuiltinVariables {
    texts: HashMap<String, String>,
}

impl BuiltinVariables {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the text of a reserved value.
    pub fn set(&mut self, name: impl Into<String>, text: impl Into<String>) {
        self.texts.insert(name.into(), text.into());
    }

    /// Returns the text of a reserved value.
    #[must_use]
    pub fn text(&self, name: &str) -> Option<&str> {
        self.texts.get(name).map(String::as_str)
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.texts.len()
    }

    /// Returns true if no entry is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for BuiltinVariables
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            texts: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}
