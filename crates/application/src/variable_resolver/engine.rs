//! Interpolation engine
//!
//! Substitutes `$name`, `${name}`, `${name:format}` and `[[name]]`
//! references with formatted variable values.

use std::sync::LazyLock;

use templar_domain::{ScopedValue, ScopedVars, Variable, VariableValue};
use tracing::trace;

use super::formatter::FormatterTable;
use super::parser::{
    Token, VariableReference, extract_variable_names, has_references, parse_references, tokenize,
};
use super::registry::VariableRegistry;
use super::value::ValueResolver;

static DEFAULT_FORMATTERS: LazyLock<FormatterTable> = LazyLock::new(FormatterTable::new);

const HIGHLIGHT_OPEN: &str = r#"<span class="template-variable">"#;
const HIGHLIGHT_CLOSE: &str = "</span>";

/// Result of interpolating a string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterpolationResult {
    /// The string with all resolvable references substituted.
    pub output: String,

    /// Names of references that were substituted, in order.
    pub substituted: Vec<String>,

    /// Names of references left untouched, in order.
    pub unresolved: Vec<String>,
}

impl InterpolationResult {
    /// Creates a result for input with no references.
    #[must_use]
    pub fn no_references(input: &str) -> Self {
        Self {
            output: input.to_string(),
            substituted: Vec::new(),
            unresolved: Vec::new(),
        }
    }

    /// Whether every reference was substituted.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.unresolved.is_empty()
    }
}

/// Interpolates strings against a borrowed registry.
///
/// The registry cannot be mutated while an interpolator borrows it.
#[derive(Debug, Clone, Copy)]
pub struct Interpolator<'r> {
    registry: &'r VariableRegistry,
    formatters: &'r FormatterTable,
}

impl<'r> Interpolator<'r> {
    /// Creates an interpolator using the built-in formatters.
    #[must_use]
    pub fn new(registry: &'r VariableRegistry) -> Self {
        Self {
            registry,
            formatters: &DEFAULT_FORMATTERS,
        }
    }

    /// Creates an interpolator using a custom formatter table.
    #[must_use]
    pub const fn with_formatters(
        registry: &'r VariableRegistry,
        formatters: &'r FormatterTable,
    ) -> Self {
        Self {
            registry,
            formatters,
        }
    }

    /// Replaces every resolvable reference with its formatted value.
    ///
    /// The inline `${name:format}` wins over `format`, which wins over the
    /// table default. Unknown names are left as written.
    ///
    /// # Examples
    ///
    /// ```
    /// use templar_application::variable_resolver::{Interpolator, VariableRegistry};
    /// use templar_domain::Variable;
    ///
    /// let registry = VariableRegistry::from_variables(vec![
    ///     Variable::query("test", vec!["value1", "value2"]),
    /// ]).unwrap();
    ///
    /// let interpolator = Interpolator::new(&registry);
    /// assert_eq!(
    ///     interpolator.replace("${test:pipe},$test", None, Some("glob")),
    ///     "value1|value2,{value1,value2}",
    /// );
    /// ```
    #[must_use]
    pub fn replace(&self, text: &str, scoped: Option<&ScopedVars>, format: Option<&str>) -> String {
        self.resolve(text, scoped, format).output
    }

    /// Like [`Self::replace`], also reporting which references were
    /// substituted and which were not.
    #[must_use]
    pub fn resolve(
        &self,
        text: &str,
        scoped: Option<&ScopedVars>,
        format: Option<&str>,
    ) -> InterpolationResult {
        if !has_references(text) {
            return InterpolationResult::no_references(text);
        }

        let formatters = self.formatters;
        let mut result = InterpolationResult::no_references("");
        result.output.reserve(text.len());

        for token in tokenize(text) {
            let reference = match token {
                Token::Literal(literal) => {
                    result.output.push_str(literal);
                    continue;
                }
                Token::Reference(reference) => reference,
            };

            let variable = self.registry.lookup(&reference.name);
            let scoped_override = scoped_value(scoped, &reference);
            let Some(resolved) = ValueResolver::resolve(variable, scoped_override) else {
                trace!(name = %reference.name, "unresolved variable reference");
                result.output.push_str(&text[reference.span.clone()]);
                result.unresolved.push(reference.name);
                continue;
            };

            if resolved.is_raw() {
                if let Some(raw) = resolved.value.as_single() {
                    result.output.push_str(raw);
                }
            } else {
                let value = &resolved.value;
                let name = reference.name.as_str();
                let format = reference.format.as_deref().or(format);
                let formatted = formatters.format_value(value, format, name, variable);
                result.output.push_str(&formatted);
            }
            result.substituted.push(reference.name);
        }

        result
    }

    /// Replaces every resolvable reference with its display text.
    ///
    /// A value that is a built-in pseudo-variable renders as the built-in's
    /// text. "All" selections are not expanded. Multi-valued text is joined
    /// with the inline format, or the default one.
    #[must_use]
    pub fn replace_with_text(&self, text: &str, scoped: Option<&ScopedVars>) -> String {
        let formatters = self.formatters;
        let mut output = String::with_capacity(text.len());

        for token in tokenize(text) {
            let reference = match token {
                Token::Literal(literal) => {
                    output.push_str(literal);
                    continue;
                }
                Token::Reference(reference) => reference,
            };

            let variable = self.registry.lookup(&reference.name);
            let (value, display) = match (scoped_value(scoped, &reference), variable) {
                (Some(scoped), _) => (&scoped.value, scoped.text()),
                (None, Some(variable)) => (&variable.current.value, variable.current.text()),
                (None, None) => {
                    output.push_str(&text[reference.span.clone()]);
                    continue;
                }
            };

            if let Some(builtin) = value.as_single().and_then(|v| self.registry.builtin(v)) {
                output.push_str(builtin);
                continue;
            }

            match display {
                VariableValue::Single(display) => output.push_str(display),
                VariableValue::Multi(_) => {
                    let name = reference.name.as_str();
                    let format = reference.format.as_deref();
                    let formatted = formatters.format_value(display, format, name, variable);
                    output.push_str(&formatted);
                }
            }
        }

        output
    }

    /// Formats a value referenced as `name` with the interpolator's
    /// formatter table.
    #[must_use]
    pub fn format_value(
        &self,
        value: &VariableValue,
        format: Option<&str>,
        name: &str,
        variable: Option<&Variable>,
    ) -> String {
        self.formatters.format_value(value, format, name, variable)
    }

    /// Returns true if any reference in `text` names a registered variable.
    #[must_use]
    pub fn variable_exists(&self, text: &str) -> bool {
        parse_references(text)
            .iter()
            .any(|reference| self.registry.contains(&reference.name))
    }

    /// Wraps every reference to a registered variable in a highlight span.
    /// Everything else is copied unchanged.
    #[must_use]
    pub fn highlight_variables_as_html(&self, text: &str) -> String {
        let mut output = String::with_capacity(text.len());

        for token in tokenize(text) {
            match token {
                Token::Literal(literal) => output.push_str(literal),
                Token::Reference(reference) => {
                    let original = &text[reference.span.clone()];
                    if self.registry.contains(&reference.name) {
                        output.push_str(HIGHLIGHT_OPEN);
                        output.push_str(original);
                        output.push_str(HIGHLIGHT_CLOSE);
                    } else {
                        output.push_str(original);
                    }
                }
            }
        }

        output
    }

    /// Returns the name of the first reference in `expression`.
    #[must_use]
    pub fn variable_name(expression: &str) -> Option<String> {
        parse_references(expression).into_iter().next().map(|r| r.name)
    }

    /// Returns true if `text` references `name` in any syntax.
    #[must_use]
    pub fn contains_variable(text: &str, name: &str) -> bool {
        parse_references(text).iter().any(|r| r.name == name)
    }

    /// Returns the distinct referenced names, in order of first appearance.
    #[must_use]
    pub fn referenced_variables(text: &str) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for name in extract_variable_names(text) {
            if !names.contains(&name) {
                names.push(name);
            }
        }
        names
    }
}

fn scoped_value<'s>(
    scoped: Option<&'s ScopedVars>,
    reference: &VariableReference,
) -> Option<&'s ScopedValue> {
    scoped.and_then(|vars| vars.get(&reference.name))
}
