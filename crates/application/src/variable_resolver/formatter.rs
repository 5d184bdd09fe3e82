//! Value formatters
//!
//! Turns a resolved value into the text substituted for a reference.
//! Every formatter is a pure function of the value and the variable.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use templar_domain::{Variable, VariableFormat, VariableValue};

/// Formats a value for substitution.
pub trait ValueFormatter: Send + Sync {
    /// Renders `value` for the reference `name`. `variable` is absent for
    /// scoped values that have no registered variable.
    fn format(&self, value: &VariableValue, name: &str, variable: Option<&Variable>) -> String;
}

impl<F> ValueFormatter for F
where
    F: Fn(&VariableValue, &str, Option<&Variable>) -> String + Send + Sync,
{
    fn format(&self, value: &VariableValue, name: &str, variable: Option<&Variable>) -> String {
        self(value, name, variable)
    }
}

/// One of the built-in formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuiltinFormatter(pub VariableFormat);

impl ValueFormatter for BuiltinFormatter {
    fn format(&self, value: &VariableValue, name: &str, _variable: Option<&Variable>) -> String {
        match self.0 {
            VariableFormat::Glob => format_glob(value),
            VariableFormat::Pipe => join_multi(value, "|"),
            VariableFormat::Csv => join_multi(value, ","),
            VariableFormat::Regex => format_regex(value),
            VariableFormat::Lucene => format_lucene(value),
            VariableFormat::Distributed => format_distributed(value, name),
        }
    }
}

/// Formats a value with a built-in format, by format name. `name` is the
/// referenced variable name, used by the distributed format.
///
/// Unknown format names and `None` use the glob format.
///
/// # Examples
///
/// ```
/// use templar_application::variable_resolver::formatter::format_value;
/// use templar_domain::VariableValue;
///
/// let value = VariableValue::multi(["test", "test2"]);
/// assert_eq!(format_value(&value, Some("pipe"), "test"), "test|test2");
/// assert_eq!(format_value(&value, None, "test"), "{test,test2}");
/// assert_eq!(format_value(&value, Some("distributed"), "build"), "test,build=test2");
/// ```
#[must_use]
pub fn format_value(value: &VariableValue, format: Option<&str>, name: &str) -> String {
    let format = format
        .and_then(|format| format.parse::<VariableFormat>().ok())
        .unwrap_or(VariableFormat::DEFAULT);
    BuiltinFormatter(format).format(value, name, None)
}

fn format_glob(value: &VariableValue) -> String {
    match value {
        VariableValue::Single(v) => v.clone(),
        VariableValue::Multi(values) => format!("{{{}}}", values.join(",")),
    }
}

fn join_multi(value: &VariableValue, separator: &str) -> String {
    match value {
        VariableValue::Single(v) => v.clone(),
        VariableValue::Multi(values) => values.join(separator),
    }
}

fn format_regex(value: &VariableValue) -> String {
    match value {
        VariableValue::Single(v) => regex_escape(v),
        VariableValue::Multi(values) => {
            let escaped: Vec<String> = values.iter().map(|v| regex_escape(v)).collect();
            if let [only] = escaped.as_slice() {
                return only.clone();
            }
            format!("({})", escaped.join("|"))
        }
    }
}

fn format_lucene(value: &VariableValue) -> String {
    match value {
        VariableValue::Single(v) => lucene_escape(v),
        VariableValue::Multi(values) if values.is_empty() => "__empty__".to_string(),
        VariableValue::Multi(values) => {
            let quoted: Vec<String> = values
                .iter()
                .map(|v| format!("\"{}\"", lucene_escape(v)))
                .collect();
            format!("({})", quoted.join(" OR "))
        }
    }
}

fn format_distributed(value: &VariableValue, name: &str) -> String {
    match value {
        VariableValue::Single(v) => v.clone(),
        VariableValue::Multi(values) => values
            .iter()
            .enumerate()
            .map(|(index, v)| {
                if index == 0 {
                    v.clone()
                } else {
                    format!("{name}={v}")
                }
            })
            .collect::<Vec<_>>()
            .join(","),
    }
}

/// Escapes regular expression metacharacters, including `/`.
#[must_use]
pub fn regex_escape(value: &str) -> String {
    escape_with(value, |c| {
        matches!(
            c,
            '\\' | '^' | '$' | '*' | '+' | '?' | '.' | '(' | ')' | '|' | '[' | ']' | '{' | '}' | '/'
        )
    })
}

/// Escapes Lucene query syntax characters and whitespace.
#[must_use]
pub fn lucene_escape(value: &str) -> String {
    escape_with(value, |c| {
        c.is_whitespace()
            || matches!(
                c,
                '!' | '*'
                    | '+'
                    | '-'
                    | '='
                    | '<'
                    | '>'
                    | '&'
                    | '|'
                    | '('
                    | ')'
                    | '['
                    | ']'
                    | '{'
                    | '}'
                    | '^'
                    | '~'
                    | '?'
                    | ':'
                    | '\\'
                    | '/'
                    | '"'
            )
    })
}

fn escape_with(value: &str, needs_escape: impl Fn(char) -> bool) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if needs_escape(c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Named formatters plus per-kind default formats.
///
/// Starts with every [`VariableFormat`]; hosts can register more or
/// replace a built-in under the same name.
#[derive(Clone)]
pub struct FormatterTable {
    formatters: HashMap<String, Arc<dyn ValueFormatter>>,
    kind_defaults: HashMap<String, String>,
}

impl FormatterTable {
    /// Creates a table holding the built-in formats.
    #[must_use]
    pub fn new() -> Self {
        let formatters = VariableFormat::ALL
            .into_iter()
            .map(|format| {
                let formatter: Arc<dyn ValueFormatter> = Arc::new(BuiltinFormatter(format));
                (format.as_str().to_string(), formatter)
            })
            .collect();

        Self {
            formatters,
            kind_defaults: HashMap::new(),
        }
    }

    /// Registers a formatter under `name`, replacing any previous one.
    pub fn register(&mut self, name: impl Into<String>, formatter: impl ValueFormatter + 'static) {
        self.formatters.insert(name.into(), Arc::new(formatter));
    }

    /// Sets the format used for variables of `kind` (e.g. `"custom"`) when
    /// no format is requested.
    pub fn set_kind_default(&mut self, kind: impl Into<String>, format: impl Into<String>) {
        self.kind_defaults.insert(kind.into(), format.into());
    }

    /// Returns true if a formatter is registered under `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.formatters.contains_key(name)
    }

    /// Returns the format applied when none is requested.
    #[must_use]
    pub fn default_format(&self, variable: Option<&Variable>) -> &str {
        variable
            .and_then(|v| self.kind_defaults.get(v.kind.type_name()))
            .map_or(VariableFormat::DEFAULT.as_str(), String::as_str)
    }

    /// Formats `value`, referenced as `name`, with the named format or the
    /// default one.
    ///
    /// Without a format, single values are left unchanged. Unknown format
    /// names fall back to the glob format.
    #[must_use]
    pub fn format_value(
        &self,
        value: &VariableValue,
        format: Option<&str>,
        name: &str,
        variable: Option<&Variable>,
    ) -> String {
        let format = match (format, value) {
            (Some(format), _) => format,
            (None, VariableValue::Single(v)) => return v.clone(),
            (None, VariableValue::Multi(_)) => self.default_format(variable),
        };
        self.formatters
            .get(format)
            .or_else(|| self.formatters.get(VariableFormat::DEFAULT.as_str()))
            .map_or_else(
                || format_glob(value),
                |formatter| formatter.format(value, name, variable),
            )
    }
}

impl Default for FormatterTable {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for FormatterTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.formatters.keys().collect();
        names.sort();
        f.debug_struct("FormatterTable")
            .field("formatters", &names)
            .field("kind_defaults", &self.kind_defaults)
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use templar_domain::VariableKind;

    fn multi(values: &[&str]) -> VariableValue {
        VariableValue::multi(values.iter().copied())
    }

    #[rstest]
    #[case(None, "{test,test2}")]
    #[case(Some("glob"), "{test,test2}")]
    #[case(Some("pipe"), "test|test2")]
    #[case(Some("csv"), "test,test2")]
    #[case(Some("regex"), "(test|test2)")]
    #[case(Some("lucene"), "(\"test\" OR \"test2\")")]
    #[case(Some("unknown"), "{test,test2}")]
    fn test_multi_value_formats(#[case] format: Option<&str>, #[case] expected: &str) {
        let value = multi(&["test", "test2"]);
        assert_eq!(format_value(&value, format, "test"), expected);
    }

    #[rstest]
    #[case(None)]
    #[case(Some("glob"))]
    #[case(Some("pipe"))]
    #[case(Some("csv"))]
    #[case(Some("distributed"))]
    fn test_single_value_unchanged(#[case] format: Option<&str>) {
        let value = VariableValue::from("a.b/c (d)");
        assert_eq!(format_value(&value, format, "test"), "a.b/c (d)");
    }

    #[test]
    fn test_regex_escapes_slash() {
        let value = VariableValue::from("Gi3/14");
        assert_eq!(format_value(&value, Some("regex"), "test"), "Gi3\\/14");
    }

    #[test]
    fn test_regex_escapes_each_value() {
        assert_eq!(
            format_value(&multi(&["test.", "test2"]), Some("regex"), "test"),
            "(test\\.|test2)"
        );
    }

    #[test]
    fn test_regex_single_element_has_no_group() {
        let value = multi(&["a+b"]);
        assert_eq!(format_value(&value, Some("regex"), "test"), "a\\+b");
    }

    #[test]
    fn test_regex_escape_all_metacharacters() {
        assert_eq!(
            regex_escape(r"\^$*+?.()|[]{}/"),
            r"\\\^\$\*\+\?\.\(\)\|\[\]\{\}\/"
        );
        assert_eq!(regex_escape("plain-text_1"), "plain-text_1");
    }

    #[test]
    fn test_lucene_escapes_slash() {
        let value = VariableValue::from("value/4");
        assert_eq!(format_value(&value, Some("lucene"), "test"), "value\\/4");
    }

    #[test]
    fn test_lucene_escape_specials() {
        assert_eq!(lucene_escape("a b"), "a\\ b");
        assert_eq!(lucene_escape("x&&y||z"), "x\\&\\&y\\|\\|z");
        assert_eq!(lucene_escape(r#"k:"v"~"#), r#"k\:\"v\"\~"#);
        assert_eq!(lucene_escape("plain"), "plain");
    }

    #[test]
    fn test_lucene_quotes_escaped_values() {
        assert_eq!(
            format_value(&multi(&["a-b", "c"]), Some("lucene"), "test"),
            "(\"a\\-b\" OR \"c\")"
        );
    }

    #[test]
    fn test_lucene_empty_multi_value() {
        let value = multi(&[]);
        assert_eq!(format_value(&value, Some("lucene"), "test"), "__empty__");
    }

    #[test]
    fn test_distributed_prefixes_following_values() {
        let value = multi(&["test", "test2", "test3"]);
        assert_eq!(
            format_value(&value, Some("distributed"), "build"),
            "test,build=test2,build=test3"
        );
    }

    #[test]
    fn test_distributed_single_element() {
        assert_eq!(
            format_value(&multi(&["test"]), Some("distributed"), "build"),
            "test"
        );
    }

    #[test]
    fn test_distributed_uses_reference_name_without_variable() {
        let table = FormatterTable::new();
        assert_eq!(
            table.format_value(&multi(&["a", "b"]), Some("distributed"), "build", None),
            "a,build=b"
        );
    }

    #[test]
    fn test_table_register_custom_formatter() {
        let mut table = FormatterTable::new();
        table.register("upper", |value: &VariableValue, _: &str, _: Option<&Variable>| {
            value.values().join(" ").to_uppercase()
        });

        assert!(table.contains("upper"));
        assert_eq!(
            table.format_value(&multi(&["a", "b"]), Some("upper"), "test", None),
            "A B"
        );
    }

    #[test]
    fn test_table_overrides_builtin() {
        let mut table = FormatterTable::new();
        table.register("csv", |value: &VariableValue, _: &str, _: Option<&Variable>| {
            value.values().join(";")
        });
        assert_eq!(
            table.format_value(&multi(&["a", "b"]), Some("csv"), "test", None),
            "a;b"
        );
    }

    #[test]
    fn test_table_kind_default() {
        let mut table = FormatterTable::new();
        table.set_kind_default("custom", "csv");

        let custom = Variable::new("c", VariableKind::Custom, vec!["a", "b"]);
        let query = Variable::query("q", vec!["a", "b"]);

        assert_eq!(table.default_format(Some(&custom)), "csv");
        assert_eq!(
            table.format_value(&custom.current.value, None, "c", Some(&custom)),
            "a,b"
        );
        assert_eq!(
            table.format_value(&query.current.value, None, "q", Some(&query)),
            "{a,b}"
        );
        assert_eq!(table.default_format(None), "glob");

        // Single values need an explicit format to change
        table.set_kind_default("query", "regex");
        let single = VariableValue::from("a.b");
        assert_eq!(table.format_value(&single, None, "q", Some(&query)), "a.b");
    }

    #[test]
    fn test_table_unknown_format_falls_back_to_glob() {
        let table = FormatterTable::default();
        assert_eq!(
            table.format_value(&multi(&["a", "b"]), Some("nope"), "test", None),
            "{a,b}"
        );
    }
}
