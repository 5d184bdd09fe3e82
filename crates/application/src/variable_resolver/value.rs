//! Effective value resolution
//!
//! Applies scoped overrides and "all" expansion to a variable's selection.

use templar_domain::{ScopedValue, ScopedVars, Variable, VariableValue};

use crate::error::ApplicationResult;

/// Where an effective value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueSource {
    /// A call-scoped override.
    Scoped,
    /// The variable's current selection.
    Current,
    /// Every option of the variable, because "all" is selected.
    AllOptions,
    /// The variable's custom "all" value.
    CustomAll,
}

/// The value and display text to substitute for one reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedValue {
    /// Value to format.
    pub value: VariableValue,

    /// Display text, never expanded.
    pub text: VariableValue,

    /// Where the value came from.
    pub source: ValueSource,
}

impl ResolvedValue {
    /// Raw values are emitted verbatim, whatever the requested format.
    #[must_use]
    pub fn is_raw(&self) -> bool {
        self.source == ValueSource::CustomAll
    }
}

/// Computes effective values. Resolution never fails.
pub struct ValueResolver;

impl ValueResolver {
    /// Resolves the effective value of a reference.
    ///
    /// A scoped override replaces the variable's value and text. An "all"
    /// selection expands to the custom all value (raw) or to every option
    /// value. Returns `None` only when there is neither a variable nor an
    /// override.
    #[must_use]
    pub fn resolve(
        variable: Option<&Variable>,
        scoped: Option<&ScopedValue>,
    ) -> Option<ResolvedValue> {
        let (value, text, source) = match (scoped, variable) {
            (Some(scoped), _) => (
                scoped.value.clone(),
                scoped.text().clone(),
                ValueSource::Scoped,
            ),
            (None, Some(variable)) => (
                variable.current.value.clone(),
                variable.current.text().clone(),
                ValueSource::Current,
            ),
            (None, None) => return None,
        };

        if let Some(variable) = variable
            && value.is_all()
        {
            return Some(match &variable.all_value {
                Some(custom) => ResolvedValue {
                    value: VariableValue::from(custom.as_str()),
                    text,
                    source: ValueSource::CustomAll,
                },
                None => ResolvedValue {
                    value: VariableValue::Multi(variable.option_values()),
                    text,
                    source: ValueSource::AllOptions,
                },
            });
        }

        Some(ResolvedValue {
            value,
            text,
            source,
        })
    }
}

/// Builds scoped overrides from `name=value` assignments.
///
/// # Errors
/// Returns [`crate::ApplicationError::Domain`] for a malformed assignment.
pub fn parse_scoped_vars<I, S>(assignments: I) -> ApplicationResult<ScopedVars>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut vars = ScopedVars::new();
    for assignment in assignments {
        let (name, value) = ScopedValue::parse_assignment(assignment.as_ref())?;
        vars.insert(name, value);
    }
    Ok(vars)
}
