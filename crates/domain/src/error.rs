//! Domain error types

use thiserror::Error;

/// Domain-level errors that can occur while building templating values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The format name is not one of the built-in formats.
    #[error("unknown format: {0}")]
    UnknownFormat(String),

    /// A scoped assignment is not of the form `name=value`.
    #[error("invalid scoped value: {0}")]
    InvalidScopedValue(String),
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
