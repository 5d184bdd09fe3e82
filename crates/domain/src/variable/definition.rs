//! Variable records

use serde::{Deserialize, Serialize};

use super::value::{ALL_VALUE, CurrentValue, VariableValue};

/// A selectable option of a variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableOption {
    /// The option value.
    pub value: String,

    /// Display text, if different from the value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Whether the option is part of the current selection.
    #[serde(default)]
    pub selected: bool,
}

impl VariableOption {
    /// Creates an unselected option whose text is its value.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            text: None,
            selected: false,
        }
    }

    /// Returns true if this is the "all" option.
    #[must_use]
    pub fn is_all(&self) -> bool {
        self.value == ALL_VALUE
    }
}

/// A key/operator/value filter attached to an adhoc variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdhocFilter {
    /// The field being filtered.
    pub key: String,
    /// Comparison operator, e.g. `=` or `!=`.
    pub operator: String,
    /// The value compared against.
    pub value: String,
}

impl AdhocFilter {
    /// Creates a new filter.
    #[must_use]
    pub fn new(
        key: impl Into<String>,
        operator: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            operator: operator.into(),
            value: value.into(),
        }
    }
}

/// The kind of a variable. Kind-specific data lives on its variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum VariableKind {
    /// Values come from a data source query.
    Query,
    /// A time interval selection.
    Interval,
    /// Values from a fixed, user-supplied list.
    Custom,
    /// A hidden constant.
    Constant,
    /// Free text input.
    Textbox,
    /// Selects a data source by name.
    Datasource,
    /// Ad hoc key/value filters applied to a data source.
    Adhoc {
        /// Target data source: a literal name, a reference such as `$ds`,
        /// or `None` for the default data source.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        datasource: Option<String>,

        /// Filters applied to queries against that data source.
        #[serde(default)]
        filters: Vec<AdhocFilter>,
    },
}

impl VariableKind {
    /// Returns the serialized tag of the kind.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Query => "query",
            Self::Interval => "interval",
            Self::Custom => "custom",
            Self::Constant => "constant",
            Self::Textbox => "textbox",
            Self::Datasource => "datasource",
            Self::Adhoc { .. } => "adhoc",
        }
    }
}

/// A named template variable with its current selection and metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variable {
    /// Name, unique within a registry.
    pub name: String,

    /// Kind and kind-specific data.
    #[serde(flatten)]
    pub kind: VariableKind,

    /// The current selection.
    #[serde(default)]
    pub current: CurrentValue,

    /// Selectable options, used for "all" expansion.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<VariableOption>,

    /// Custom value emitted verbatim when "all" is selected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub all_value: Option<String>,

    /// Excludes the variable from URL serialization.
    #[serde(default)]
    pub skip_url_sync: bool,
}

impl Variable {
    /// Creates a variable of the given kind with a current value.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        kind: VariableKind,
        value: impl Into<VariableValue>,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            current: CurrentValue::new(value),
            options: Vec::new(),
            all_value: None,
            skip_url_sync: false,
        }
    }

    /// Creates a query variable.
    #[must_use]
    pub fn query(name: impl Into<String>, value: impl Into<VariableValue>) -> Self {
        Self::new(name, VariableKind::Query, value)
    }

    /// Creates an adhoc filter variable.
    #[must_use]
    pub fn adhoc(
        name: impl Into<String>,
        datasource: Option<&str>,
        filters: Vec<AdhocFilter>,
    ) -> Self {
        Self::new(
            name,
            VariableKind::Adhoc {
                datasource: datasource.map(str::to_string),
                filters,
            },
            VariableValue::default(),
        )
    }

    /// Sets the display text of the current selection.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<VariableValue>) -> Self {
        self.current.text = Some(text.into());
        self
    }

    /// Sets the selectable options from their values.
    #[must_use]
    pub fn with_options<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = values.into_iter().map(VariableOption::new).collect();
        self
    }

    /// Sets the custom "all" value.
    #[must_use]
    pub fn with_all_value(mut self, all_value: impl Into<String>) -> Self {
        self.all_value = Some(all_value.into());
        self
    }

    /// Excludes the variable from URL serialization.
    #[must_use]
    pub const fn skip_url_sync(mut self) -> Self {
        self.skip_url_sync = true;
        self
    }

    /// Returns the option values, excluding the "all" option.
    #[must_use]
    pub fn option_values(&self) -> Vec<String> {
        self.options
            .iter()
            .filter(|option| !option.is_all())
            .map(|option| option.value.clone())
            .collect()
    }

    /// Returns the adhoc filters, empty for other kinds.
    #[must_use]
    pub fn filters(&self) -> &[AdhocFilter] {
        match &self.kind {
            VariableKind::Adhoc { filters, .. } => filters,
            _ => &[],
        }
    }
}
