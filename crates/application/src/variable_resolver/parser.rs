//! Reference parser for `$name`, `${name}`, `${name:format}` and `[[name]]`
//!
//! Splits a string into literal spans and variable references in a single
//! left-to-right pass. References never overlap.

use std::ops::Range;

/// The syntax a reference was written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceSyntax {
    /// `$name`
    Dollar,
    /// `${name}` or `${name:format}`
    Braced,
    /// `[[name]]`
    Brackets,
}

/// Represents a parsed variable reference in a string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableReference {
    /// The variable name.
    pub name: String,

    /// Inline format (`${name:format}`), if any.
    pub format: Option<String>,

    /// How the reference was written.
    pub syntax: ReferenceSyntax,

    /// Byte range in the original string where this reference appears.
    pub span: Range<usize>,
}

impl VariableReference {
    /// Creates a new reference without an inline format.
    #[must_use]
    pub fn new(name: impl Into<String>, syntax: ReferenceSyntax, span: Range<usize>) -> Self {
        Self {
            name: name.into(),
            format: None,
            syntax,
            span,
        }
    }

    /// Sets the inline format.
    #[must_use]
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }
}

/// A piece of scanned input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token<'a> {
    /// Text copied to the output unchanged.
    Literal(&'a str),
    /// A variable reference.
    Reference(VariableReference),
}

/// Splits the input into literal and reference tokens.
///
/// # Examples
///
/// ```
/// use templar_application::variable_resolver::parser::{Token, tokenize};
///
/// let tokens = tokenize("host=$host");
/// assert_eq!(tokens.len(), 2);
/// assert_eq!(tokens[0], Token::Literal("host="));
/// assert!(matches!(&tokens[1], Token::Reference(r) if r.name == "host"));
/// ```
#[must_use]
pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    let bytes = input.as_bytes();
    let mut tokens = Vec::new();
    let mut literal_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        let reference = match bytes[i] {
            b'$' => scan_dollar(input, i),
            b'[' => scan_brackets(input, i),
            _ => None,
        };

        if let Some(reference) = reference {
            if literal_start < i {
                tokens.push(Token::Literal(&input[literal_start..i]));
            }
            i = reference.span.end;
            literal_start = i;
            tokens.push(Token::Reference(reference));
        } else {
            i += 1;
        }
    }

    if literal_start < input.len() {
        tokens.push(Token::Literal(&input[literal_start..]));
    }

    tokens
}

fn scan_dollar(input: &str, start: usize) -> Option<VariableReference> {
    let rest = &input[start + 1..];

    if let Some(body) = rest.strip_prefix('{') {
        let close = body.find('}')?;
        let content = &body[..close];
        let end = start + 2 + close + 1;

        let (name, format) = match content.split_once(':') {
            Some((name, format)) => (name, Some(format)),
            None => (content, None),
        };
        if name.is_empty() {
            return None;
        }

        let reference = VariableReference::new(name, ReferenceSyntax::Braced, start..end);
        return Some(match format {
            Some(format) if !format.is_empty() => reference.with_format(format),
            _ => reference,
        });
    }

    let len = rest.bytes().take_while(|b| is_name_byte(*b)).count();
    if len == 0 {
        return None;
    }

    Some(VariableReference::new(
        &rest[..len],
        ReferenceSyntax::Dollar,
        start..start + 1 + len,
    ))
}

fn scan_brackets(input: &str, start: usize) -> Option<VariableReference> {
    let body = input[start..].strip_prefix("[[")?;
    let close = body.find("]]")?;
    if close == 0 {
        return None;
    }

    Some(VariableReference::new(
        &body[..close],
        ReferenceSyntax::Brackets,
        start..start + 2 + close + 2,
    ))
}

const fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Extracts all variable references from the input.
#[must_use]
pub fn parse_references(input: &str) -> Vec<VariableReference> {
    tokenize(input)
        .into_iter()
        .filter_map(|token| match token {
            Token::Reference(reference) => Some(reference),
            Token::Literal(_) => None,
        })
        .collect()
}

/// Returns true if the input contains at least one reference.
#[must_use]
pub fn has_references(input: &str) -> bool {
    (input.contains('$') || input.contains("[[")) && !parse_references(input).is_empty()
}

/// Extracts just the variable names from the input, in order of appearance.
#[must_use]
pub fn extract_variable_names(input: &str) -> Vec<String> {
    parse_references(input)
        .into_iter()
        .map(|r| r.name)
        .collect()
}
