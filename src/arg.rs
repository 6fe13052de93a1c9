// Licensed under the MIT license or the Apache License, Version 2.0, at your option. You may not
// copy, modify, or distribute this file except in compliance with said license.

//! Static description of a single option/positional argument.

use std::collections::HashSet;

use crate::value_parser::ValueParser;
use crate::value_range::ValueRange;

/// What binding a value, or encountering a flag, does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Replace any existing values with the newly bound one(s) (last-wins for a single-value
    /// contract — see the design notes on `Set` with multi-value `num_args`).
    Set,
    /// Append newly bound values to whatever has already been bound.
    Append,
    SetTrue,
    SetFalse,
    /// Increment an occurrence counter each time the flag is seen.
    Count,
    /// Synthesized for `-h`/`--help` unless suppressed.
    Help,
    /// Synthesized for `-V`/`--version` unless suppressed.
    Version,
}

impl Action {
    /// Does choosing this action force `num_args` to the zero range?
    pub fn is_flag_action(&self) -> bool {
        matches!(
            self,
            Action::SetTrue | Action::SetFalse | Action::Count | Action::Help | Action::Version
        )
    }
}

/// Display-only hint about what kind of value is expected (used by a help formatter; carried but
/// otherwise inert in the core).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValueHint {
    #[default]
    Unknown,
    AnyPath,
    FilePath,
    DirPath,
    ExecutablePath,
    CommandName,
    CommandString,
    Url,
}

/// Static description of one option/positional.
///
/// Immutable after being attached to a [`Command`](crate::command::Command). Every setter takes
/// and returns `self` by value, so a complete argument is usually built in one expression:
///
/// ```
/// use cmdforge::arg::Arg;
/// let arg = Arg::new("verbose").short('v').long("verbose").action(cmdforge::arg::Action::Count);
/// ```
#[derive(Debug, Clone)]
pub struct Arg {
    pub(crate) id: String,
    pub(crate) short: Option<char>,
    pub(crate) long: Option<String>,
    pub(crate) index: Option<i32>,
    pub(crate) required: bool,
    pub(crate) global: bool,
    pub(crate) hidden: bool,
    pub(crate) default_value: Option<String>,
    pub(crate) default_missing_value: Option<String>,
    pub(crate) env_var: Option<String>,
    pub(crate) num_args: ValueRange,
    pub(crate) value_delimiter: Option<char>,
    pub(crate) value_names: Vec<String>,
    pub(crate) action: Action,
    pub(crate) value_parser: ValueParser,
    pub(crate) value_hint: ValueHint,
    pub(crate) conflicts: HashSet<String>,
    pub(crate) requires: HashSet<String>,
    pub(crate) required_unless: HashSet<String>,
    pub(crate) required_if: Vec<(String, String)>,
    pub(crate) groups: HashSet<String>,
    pub(crate) allow_multiple: bool,
    pub(crate) hide_possible_values: bool,
    pub(crate) hide_default_value: bool,
}

impl Arg {
    /// Create a new positional-or-option descriptor with the given stable id. Neither `short` nor
    /// `long` is set, and `index` is `None` — call [`Arg::short`]/[`Arg::long`] to make this an
    /// option, or [`Arg::index`] to make it a positional.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            short: None,
            long: None,
            index: None,
            required: false,
            global: false,
            hidden: false,
            default_value: None,
            default_missing_value: None,
            env_var: None,
            num_args: ValueRange::one(),
            value_delimiter: None,
            value_names: Vec::new(),
            action: Action::Set,
            value_parser: ValueParser::String,
            value_hint: ValueHint::Unknown,
            conflicts: HashSet::new(),
            requires: HashSet::new(),
            required_unless: HashSet::new(),
            required_if: Vec::new(),
            groups: HashSet::new(),
            allow_multiple: false,
            hide_possible_values: false,
            hide_default_value: false,
        }
    }

    pub fn short(mut self, ch: char) -> Self {
        self.short = Some(ch);
        self
    }

    pub fn long(mut self, name: impl Into<String>) -> Self {
        self.long = Some(name.into());
        self
    }

    /// Set the positional slot. Pass `-1` to auto-assign the next slot when attached to a
    /// [`Command`](crate::command::Command).
    pub fn index(mut self, index: i32) -> Self {
        self.index = Some(index);
        self
    }

    pub fn required(mut self, yes: bool) -> Self {
        self.required = yes;
        self
    }

    pub fn global(mut self, yes: bool) -> Self {
        self.global = yes;
        self
    }

    pub fn hidden(mut self, yes: bool) -> Self {
        self.hidden = yes;
        self
    }

    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn default_missing_value(mut self, value: impl Into<String>) -> Self {
        self.default_missing_value = Some(value.into());
        self
    }

    pub fn env(mut self, var: impl Into<String>) -> Self {
        self.env_var = Some(var.into());
        self
    }

    pub fn num_args(mut self, range: ValueRange) -> Self {
        self.num_args = range;
        self
    }

    pub fn value_delimiter(mut self, delim: char) -> Self {
        self.value_delimiter = Some(delim);
        self
    }

    pub fn value_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.value_names = names.into_iter().map(Into::into).collect();
        self
    }

    /// Choosing a flag action (everything but `Set`/`Append`) forces `num_args` to
    /// [`ValueRange::zero`] — enforced here, not re-derived at parse time.
    pub fn action(mut self, action: Action) -> Self {
        if action.is_flag_action() {
            self.num_args = ValueRange::zero();
        }
        self.action = action;
        self
    }

    pub fn value_parser(mut self, parser: ValueParser) -> Self {
        self.value_parser = parser;
        self
    }

    pub fn value_hint(mut self, hint: ValueHint) -> Self {
        self.value_hint = hint;
        self
    }

    pub fn conflicts_with(mut self, id: impl Into<String>) -> Self {
        self.conflicts.insert(id.into());
        self
    }

    pub fn requires(mut self, id: impl Into<String>) -> Self {
        self.requires.insert(id.into());
        self
    }

    pub fn required_unless(mut self, id: impl Into<String>) -> Self {
        self.required_unless.insert(id.into());
        self
    }

    pub fn required_if(mut self, id: impl Into<String>, value: impl Into<String>) -> Self {
        self.required_if.push((id.into(), value.into()));
        self
    }

    pub fn group(mut self, id: impl Into<String>) -> Self {
        self.groups.insert(id.into());
        self
    }

    pub fn allow_multiple(mut self, yes: bool) -> Self {
        self.allow_multiple = yes;
        self
    }

    pub fn hide_possible_values(mut self, yes: bool) -> Self {
        self.hide_possible_values = yes;
        self
    }

    pub fn hide_default_value(mut self, yes: bool) -> Self {
        self.hide_default_value = yes;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Is this a positional (no `short`, no `long`, has an `index`)?
    pub fn is_positional(&self) -> bool {
        self.short.is_none() && self.long.is_none() && self.index.is_some()
    }

    /// Does this arg take no values (a flag or flag-like action)?
    pub fn is_flag(&self) -> bool {
        self.num_args.is_zero()
    }

    pub fn takes_value(&self) -> bool {
        !self.is_flag()
    }

    /// Long form preferred, then short form, then `<ID>` (upper-cased id in angle brackets).
    pub fn display_name(&self) -> String {
        if let Some(long) = &self.long {
            format!("--{long}")
        } else if let Some(short) = self.short {
            format!("-{short}")
        } else {
            format!("<{}>", self.id.to_uppercase())
        }
    }

    pub fn matches_short(&self, ch: char) -> bool {
        self.short == Some(ch)
    }

    pub fn matches_long(&self, name: &str) -> bool {
        self.long.as_deref() == Some(name)
    }

    /// Does `name` match this arg's `long` name or, failing that, its `id`?
    pub fn matches_name(&self, name: &str) -> bool {
        self.matches_long(name) || self.id == name
    }
}
