// Licensed under the MIT license or the Apache License, Version 2.0, at your option. You may not
// copy, modify, or distribute this file except in compliance with said license.

//! The error taxonomy.
//!
//! Every failure the parser or validator can produce is one variant here. Messages follow the
//! stable shapes documented in the external interface notes; callers that depend on the text are
//! expected to treat it as part of the contract, not an implementation detail.

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

/// A parse or validation failure.
///
/// The core never prints these or calls `std::process::exit`; it is the consuming application's
/// job to render and act on them (see the crate-level docs for the out-of-scope help/exit glue).
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum Error {
    /// A value failed to parse, or failed a parser's own validation (e.g. enum membership,
    /// pattern match, numeric bounds).
    #[error("invalid value '{raw}' for argument '{arg_id}': expected {expected}")]
    InvalidValue { arg_id: String, raw: String, expected: String },

    /// A `required` argument was absent from argv, env, and default.
    #[error("required argument '{arg_id}' was not provided{}", context_suffix(context))]
    MissingRequiredArgument { arg_id: String, context: Option<String> },

    /// More values were bound than `num_args` allows.
    #[error("argument '{arg_id}' received {actual} values but only accepts {bound}")]
    TooManyValues { arg_id: String, bound: u32, actual: u32 },

    /// Fewer values were bound than `num_args` requires.
    #[error("argument '{arg_id}' received {actual} values but requires at least {bound}")]
    TooFewValues { arg_id: String, bound: u32, actual: u32 },

    /// A token looked like an option but matched nothing known.
    #[error("unknown argument '{raw}'{}", suggestion_suffix(suggestions))]
    UnknownArgument { raw: String, suggestions: Vec<String> },

    /// Two present arguments declare each other (or were declared) as conflicting.
    #[error("argument '{first}' cannot be used with '{second}'")]
    ArgumentConflict { first: String, second: String },

    /// A present argument's `requires` id was absent.
    #[error("argument '{arg_id}' requires '{requires}' to also be provided")]
    MissingDependency { arg_id: String, requires: String },

    /// A positional token was expected to select a subcommand but matched none.
    #[error("unknown command '{name}'{}", suggestion_suffix(suggestions))]
    InvalidSubcommand { name: String, suggestions: Vec<String> },

    /// `subcommand_required` is set and no subcommand was selected.
    #[error("a subcommand is required but none was provided")]
    MissingSubcommand,

    /// A `required` group had none of its members present.
    #[error("one of the arguments in group '{group_id}' is required")]
    MissingRequiredGroup { group_id: String },

    /// `--help`/`-h` was encountered; `text` is the rendered payload the out-of-scope help
    /// formatter produced (or a placeholder, if none is wired up).
    #[error("{0}")]
    DisplayHelp(String),

    /// `--version`/`-V` was encountered; `text` is the rendered payload.
    #[error("{0}")]
    DisplayVersion(String),
}

impl Error {
    /// `true` for the two variants that signal "stop and print this", not failure.
    pub fn is_display_request(&self) -> bool {
        matches!(self, Error::DisplayHelp(_) | Error::DisplayVersion(_))
    }
}

fn suggestion_suffix(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else {
        format!("\n\n\tDid you mean: {}?", suggestions.join(", "))
    }
}

fn context_suffix(context: &Option<String>) -> String {
    match context {
        Some(c) => format!(" ({c})"),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_required_message() {
        let e = Error::MissingRequiredArgument { arg_id: "name".into(), context: None };
        assert_eq!(e.to_string(), "required argument 'name' was not provided");
    }

    #[test]
    fn unknown_argument_without_suggestions() {
        let e = Error::UnknownArgument { raw: "--wat".into(), suggestions: vec![] };
        assert_eq!(e.to_string(), "unknown argument '--wat'");
    }

    #[test]
    fn unknown_argument_with_suggestions() {
        let e = Error::UnknownArgument {
            raw: "--forc".into(),
            suggestions: vec!["--force".into(), "--foo".into()],
        };
        assert_eq!(e.to_string(), "unknown argument '--forc'\n\n\tDid you mean: --force, --foo?");
    }

    #[test]
    fn conflict_message() {
        let e = Error::ArgumentConflict { first: "verbose".into(), second: "quiet".into() };
        assert_eq!(e.to_string(), "argument 'verbose' cannot be used with 'quiet'");
    }

    #[test]
    fn invalid_value_message() {
        let e = Error::InvalidValue {
            arg_id: "count".into(),
            raw: "abc".into(),
            expected: "an integer".into(),
        };
        assert_eq!(e.to_string(), "invalid value 'abc' for argument 'count': expected an integer");
    }

    #[test]
    fn too_many_values_message() {
        let e = Error::TooManyValues { arg_id: "name".into(), bound: 1, actual: 3 };
        assert_eq!(e.to_string(), "argument 'name' received 3 values but only accepts 1");
    }
}
