//! Built-in output formats

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// The formats every formatter table knows about.
///
/// Format names appear inline in references (`${name:pipe}`) and as the
/// format argument of an interpolation call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableFormat {
    /// `{v1,v2}` for multi values.
    Glob,
    /// `v1|v2` for multi values.
    Pipe,
    /// `v1,v2` for multi values.
    Csv,
    /// Regex-escaped values, alternated as `(v1|v2)`.
    Regex,
    /// Lucene-escaped values, as `("v1" OR "v2")`.
    Lucene,
    /// `v1,name=v2,name=v3` for multi values.
    Distributed,
}

impl VariableFormat {
    /// All built-in formats, in declaration order.
    pub const ALL: [Self; 6] = [
        Self::Glob,
        Self::Pipe,
        Self::Csv,
        Self::Regex,
        Self::Lucene,
        Self::Distributed,
    ];

    /// The format used when nothing else applies.
    pub const DEFAULT: Self = Self::Glob;

    /// Returns the name used to reference this format.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Glob => "glob",
            Self::Pipe => "pipe",
            Self::Csv => "csv",
            Self::Regex => "regex",
            Self::Lucene => "lucene",
            Self::Distributed => "distributed",
        }
    }
}

impl fmt::Display for VariableFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VariableFormat {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|format| format.as_str() == s)
            .ok_or_else(|| DomainError::UnknownFormat(s.to_string()))
    }
}
