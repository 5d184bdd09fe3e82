//! Templar Domain - Core templating types
//!
//! This crate defines the data model of the variable interpolation engine:
//! variables, their values, scoped overrides and format names.
//! All types here are pure Rust with no I/O dependencies.

pub mod document;
pub mod error;
pub mod format;
pub mod variable;

pub use document::TemplatingDocument;
pub use error::{DomainError, DomainResult};
pub use format::VariableFormat;
pub use variable::{
    ALL_VALUE, AdhocFilter, CurrentValue, ScopedValue, ScopedVars, UrlParams, Variable,
    VariableKind, VariableOption, VariableValue,
};
