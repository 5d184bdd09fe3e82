//! Template variable domain types

mod definition;
mod scoped;
mod value;

pub use definition::{AdhocFilter, Variable, VariableKind, VariableOption};
pub use scoped::{ScopedValue, ScopedVars};
pub use value::{ALL_VALUE, CurrentValue, UrlParams, VariableValue};
