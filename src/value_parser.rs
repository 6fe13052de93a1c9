// Licensed under the MIT license or the Apache License, Version 2.0, at your option. You may not
// copy, modify, or distribute this file except in compliance with said license.

//! The value parser family: transforms a raw argv token into a typed [`Value`] or fails.

use std::sync::Arc;

use regex::Regex;
use url::Url;

/// A bound value, after parsing.
///
/// This is the "tagged union" storage strategy from the design notes: rather than boxing
/// `dyn Any` and downcasting at read time, matched values are kept as one of a small closed set of
/// shapes, with [`ArgMatches`](crate::matches::ArgMatches) providing typed accessors on top.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Render back to its textual form, for display purposes.
    pub fn to_display_string(&self) -> String {
        match self {
            Value::Str(s) => s.clone(),
            Value::Int(n) => n.to_string(),
            Value::Float(f) => f.to_string(),
            Value::Bool(b) => b.to_string(),
        }
    }
}

/// A failure from a [`ValueParser`], not yet attributed to an owning argument.
///
/// The parser driver ([`crate::parser::Parser`]) re-wraps this with the arg id and the parser's
/// `type_name` to produce [`crate::error::Error::InvalidValue`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseFailure {
    pub expected: String,
}

impl ParseFailure {
    fn new(expected: impl Into<String>) -> Self {
        Self { expected: expected.into() }
    }
}

/// Outcome of a [`ValueParser::Custom`] callback.
///
/// Mirrors the sentinel-string contract in the original implementation's dynamically typed
/// callback: returning the literal string `"false"` rejects the value, `"true"` accepts the raw
/// token unchanged, and any other string replaces it.
pub type CustomFn = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Transforms a raw argv token into a typed [`Value`], or fails with an [`expected`](ParseFailure)
/// description.
#[derive(Clone)]
pub enum ValueParser {
    /// Identity: accepts anything.
    String,
    /// Signed decimal integer.
    Int,
    /// IEEE-754 double.
    Float,
    /// Case-insensitive `{true, yes, 1, on}` / `{false, no, 0, off}`.
    Bool,
    /// Identity string; if `must_exist`, the token must name an existing filesystem entry.
    Path { must_exist: bool },
    /// Value must be a member of `values`; `ignore_case` allows case-insensitive matching, always
    /// returning the canonical (originally registered) spelling.
    Enum { values: Vec<String>, ignore_case: bool },
    /// Value must match `pattern`.
    Regex { pattern: Regex, source: String },
    /// Parsed as an integer, then bounds-checked against `[min, max]` inclusive.
    NumericRange { min: i64, max: i64 },
    /// Value must parse as `scheme://host[/path...]` for one of `schemes`.
    Url { schemes: Vec<String> },
    /// User-supplied callback; see [`CustomFn`] for its sentinel-string contract.
    Custom(CustomFn),
}

impl std::fmt::Debug for ValueParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValueParser::String => write!(f, "ValueParser::String"),
            ValueParser::Int => write!(f, "ValueParser::Int"),
            ValueParser::Float => write!(f, "ValueParser::Float"),
            ValueParser::Bool => write!(f, "ValueParser::Bool"),
            ValueParser::Path { must_exist } => {
                write!(f, "ValueParser::Path {{ must_exist: {must_exist} }}")
            }
            ValueParser::Enum { values, ignore_case } => {
                write!(f, "ValueParser::Enum {{ values: {values:?}, ignore_case: {ignore_case} }}")
            }
            ValueParser::Regex { source, .. } => write!(f, "ValueParser::Regex({source:?})"),
            ValueParser::NumericRange { min, max } => {
                write!(f, "ValueParser::NumericRange {{ min: {min}, max: {max} }}")
            }
            ValueParser::Url { schemes } => write!(f, "ValueParser::Url {{ schemes: {schemes:?} }}"),
            ValueParser::Custom(_) => write!(f, "ValueParser::Custom(..)"),
        }
    }
}

impl Default for ValueParser {
    fn default() -> Self {
        ValueParser::String
    }
}

impl ValueParser {
    /// Build a `Regex` variant, panicking (debug and release both, since a bad pattern is an
    /// authoring error, not user input) if `pattern` fails to compile.
    pub fn regex(pattern: &str) -> Self {
        let compiled = Regex::new(pattern)
            .unwrap_or_else(|e| panic!("invalid regex pattern {pattern:?}: {e}"));
        ValueParser::Regex { pattern: compiled, source: pattern.to_string() }
    }

    /// Build an `Enum` variant from any string-like iterable.
    pub fn enum_values<I, S>(values: I, ignore_case: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ValueParser::Enum {
            values: values.into_iter().map(Into::into).collect(),
            ignore_case,
        }
    }

    /// Build a `Url` variant restricted to `{http, https, ftp}`.
    pub fn url() -> Self {
        ValueParser::Url {
            schemes: vec!["http".into(), "https".into(), "ftp".into()],
        }
    }

    /// Display name of the value shape this parser produces, for use in `value_names`-less usage
    /// text and in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            ValueParser::String => "string",
            ValueParser::Int => "integer",
            ValueParser::Float => "float",
            ValueParser::Bool => "bool",
            ValueParser::Path { .. } => "path",
            ValueParser::Enum { .. } => "enum",
            ValueParser::Regex { .. } => "pattern",
            ValueParser::NumericRange { .. } => "integer",
            ValueParser::Url { .. } => "url",
            ValueParser::Custom(_) => "value",
        }
    }

    /// The fixed set of acceptable spellings, if this parser has one.
    pub fn possible_values(&self) -> Option<Vec<String>> {
        match self {
            ValueParser::Bool => Some(vec![
                "true".into(), "yes".into(), "1".into(), "on".into(),
                "false".into(), "no".into(), "0".into(), "off".into(),
            ]),
            ValueParser::Enum { values, .. } => Some(values.clone()),
            _ => None,
        }
    }

    /// Parse `raw` into a [`Value`], or fail with an [`expected`](ParseFailure) description. The
    /// returned error carries no arg id — see [`ParseFailure`].
    pub fn parse(&self, raw: &str) -> Result<Value, ParseFailure> {
        match self {
            ValueParser::String => Ok(Value::Str(raw.to_string())),

            ValueParser::Int => raw
                .parse::<i64>()
                .map(Value::Int)
                .map_err(|_| ParseFailure::new("an integer")),

            ValueParser::Float => raw
                .parse::<f64>()
                .map(Value::Float)
                .map_err(|_| ParseFailure::new("a number")),

            ValueParser::Bool => parse_bool(raw).map(Value::Bool),

            ValueParser::Path { must_exist } => {
                if *must_exist && !std::path::Path::new(raw).exists() {
                    return Err(ParseFailure::new("a path to an existing file or directory"));
                }
                Ok(Value::Str(raw.to_string()))
            }

            ValueParser::Enum { values, ignore_case } => {
                for candidate in values {
                    let hit = if *ignore_case {
                        candidate.eq_ignore_ascii_case(raw)
                    } else {
                        candidate == raw
                    };
                    if hit {
                        return Ok(Value::Str(candidate.clone()));
                    }
                }
                Err(ParseFailure::new(format!("one of: {}", values.join(", "))))
            }

            ValueParser::Regex { pattern, source } => {
                if pattern.is_match(raw) {
                    Ok(Value::Str(raw.to_string()))
                } else {
                    Err(ParseFailure::new(format!("matching pattern {source}")))
                }
            }

            ValueParser::NumericRange { min, max } => {
                let n: i64 = raw.parse().map_err(|_| ParseFailure::new("an integer"))?;
                if n < *min || n > *max {
                    return Err(ParseFailure::new(format!("an integer between {min} and {max}")));
                }
                Ok(Value::Int(n))
            }

            ValueParser::Url { schemes } => {
                let parsed = Url::parse(raw).map_err(|_| {
                    ParseFailure::new(format!("a URL ({})", schemes.join(", ")))
                })?;
                if schemes.iter().any(|s| s == parsed.scheme()) {
                    Ok(Value::Str(raw.to_string()))
                } else {
                    Err(ParseFailure::new(format!("a URL ({})", schemes.join(", "))))
                }
            }

            ValueParser::Custom(f) => match f(raw).as_str() {
                "false" => Err(ParseFailure::new("a valid value")),
                "true" => Ok(Value::Str(raw.to_string())),
                other => Ok(Value::Str(other.to_string())),
            },
        }
    }
}

fn parse_bool(raw: &str) -> Result<bool, ParseFailure> {
    let lower = raw.to_ascii_lowercase();
    match lower.as_str() {
        "true" | "yes" | "1" | "on" => Ok(true),
        "false" | "no" | "0" | "off" => Ok(false),
        _ => Err(ParseFailure::new("true/false (true, yes, 1, on / false, no, 0, off)")),
    }
}
