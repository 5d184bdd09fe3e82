//! Variable interpolation module
//!
//! Provides parsing of `$name`, `${name:format}` and `[[name]]` references,
//! value resolution and formatting against a registry of variables.
//!
//! # Usage
//!
//! ```
//! use templar_application::variable_resolver::{Interpolator, VariableRegistry};
//! use templar_domain::{ScopedValue, ScopedVars, Variable};
//!
//! let registry = VariableRegistry::from_variables(vec![
//!     Variable::query("host", vec!["web-1", "web-2"]),
//! ]).unwrap();
//! let interpolator = Interpolator::new(&registry);
//!
//! assert_eq!(
//!     interpolator.replace("host=~/^${host:regex}$/", None, None),
//!     "host=~/^(web-1|web-2)$/",
//! );
//!
//! let scoped = ScopedVars::from([("host".to_string(), ScopedValue::new("web-3"))]);
//! assert_eq!(interpolator.replace("[[host]]", Some(&scoped), None), "web-3");
//! ```

pub mod builtins;
pub mod engine;
pub mod formatter;
pub mod parser;
pub mod registry;
pub mod url_params;
pub mod value;

pub use builtins::BuiltinVariables;
pub use engine::{InterpolationResult, Interpolator};
pub use formatter::{BuiltinFormatter, FormatterTable, ValueFormatter, format_value};
pub use parser::{
    ReferenceSyntax, Token, VariableReference, extract_variable_names, has_references,
    parse_references, tokenize,
};
pub use registry::VariableRegistry;
pub use url_params::{
    HasUrlValue, URL_PARAM_PREFIX, UrlParamSerializer, append_to_url, to_query_string,
};
pub use value::{ResolvedValue, ValueResolver, ValueSource, parse_scoped_vars};
