//! Templar Application - Variable interpolation engine
//!
//! This crate implements the engine on top of the domain types:
//! - Reference scanning and formatting
//! - The variable registry and its derived indices
//! - URL parameter serialization
//! - Application-level error handling

pub mod error;
pub mod variable_resolver;

pub use error::{ApplicationError, ApplicationResult};
pub use variable_resolver::{
    FormatterTable, HasUrlValue, InterpolationResult, Interpolator, UrlParamSerializer,
    ValueFormatter, VariableRegistry,
};
