// Licensed under the MIT license or the Apache License, Version 2.0, at your option. You may not
// copy, modify, or distribute this file except in compliance with said license.

//! The structured, source-tagged parse result.

use std::collections::{HashMap, HashSet};

use crate::value_parser::Value;

/// Where a bound value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueSource {
    Default,
    Env,
    CommandLine,
}

/// A single bound value, tagged with its provenance.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchedValue {
    pub value: Value,
    pub source: ValueSource,
}

/// A completed subcommand's name and its own nested [`ArgMatches`].
#[derive(Debug, Clone, PartialEq)]
pub struct SubcommandMatches {
    pub name: String,
    pub matches: ArgMatches,
}

/// The result of parsing argv against a [`Command`](crate::command::Command).
///
/// Created empty by the [`Parser`](crate::parser::Parser), populated monotonically during parsing
/// and validation, and never mutated again once handed back to the caller.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArgMatches {
    values: HashMap<String, Vec<MatchedValue>>,
    flags: HashMap<String, u32>,
    present: HashSet<String>,
    subcommand: Option<Box<SubcommandMatches>>,
    trailing: Vec<String>,
}

impl ArgMatches {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    // ---- read API -----------------------------------------------------

    /// The last bound value for `id`, if any.
    pub fn get_one(&self, id: &str) -> Option<&Value> {
        self.values.get(id).and_then(|vs| vs.last()).map(|mv| &mv.value)
    }

    /// Like [`get_one`](Self::get_one), falling back to `default` when absent.
    pub fn get_one_or<'a>(&'a self, id: &str, default: &'a Value) -> &'a Value {
        self.get_one(id).unwrap_or(default)
    }

    /// All bound values for `id`, in insertion order (including across delimiter splits and
    /// repeated occurrences). Empty if absent.
    pub fn get_many(&self, id: &str) -> Vec<&Value> {
        self.values.get(id).map(|vs| vs.iter().map(|mv| &mv.value).collect()).unwrap_or_default()
    }

    /// Raw [`MatchedValue`]s (value + provenance) for `id`.
    pub fn get_raw(&self, id: &str) -> &[MatchedValue] {
        self.values.get(id).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// Occurrence count for a `Count`/`SetTrue`/`SetFalse` arg.
    pub fn get_count(&self, id: &str) -> u32 {
        self.flags.get(id).copied().unwrap_or(0)
    }

    /// `true` if `id`'s occurrence count is greater than zero.
    pub fn flag(&self, id: &str) -> bool {
        self.get_count(id) > 0
    }

    /// `true` if `id` has a value (any source), a non-zero flag count, or was explicitly toggled
    /// by `SetFalse`.
    pub fn contains(&self, id: &str) -> bool {
        self.present.contains(id)
    }

    /// Where `id`'s last bound value came from, if it has one.
    pub fn value_source(&self, id: &str) -> Option<ValueSource> {
        self.values.get(id).and_then(|vs| vs.last()).map(|mv| mv.source)
    }

    /// The selected subcommand's name and matches, if any.
    pub fn subcommand(&self) -> Option<(&str, &ArgMatches)> {
        self.subcommand.as_deref().map(|sc| (sc.name.as_str(), &sc.matches))
    }

    pub fn subcommand_name(&self) -> Option<&str> {
        self.subcommand.as_deref().map(|sc| sc.name.as_str())
    }

    /// Returns the subcommand's matches if its name is among `names`, or if `names` is empty.
    pub fn subcommand_matches(&self, names: &[&str]) -> Option<&ArgMatches> {
        self.subcommand
            .as_deref()
            .filter(|sc| names.is_empty() || names.contains(&sc.name.as_str()))
            .map(|sc| &sc.matches)
    }

    /// All arg ids that have either a value or a flag count recorded.
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> =
            self.values.keys().chain(self.flags.keys()).map(String::as_str).collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
            && self.flags.is_empty()
            && self.subcommand.is_none()
            && self.trailing.is_empty()
    }

    /// Tokens following a `--` separator, in order.
    pub fn trailing(&self) -> &[String] {
        &self.trailing
    }

    // ---- write API (parser-internal) -----------------------------------

    pub(crate) fn set_value(&mut self, id: &str, value: Value, source: ValueSource) {
        self.values.insert(id.to_string(), vec![MatchedValue { value, source }]);
        self.mark_present(id);
    }

    pub(crate) fn append_value(&mut self, id: &str, value: Value, source: ValueSource) {
        self.values.entry(id.to_string()).or_default().push(MatchedValue { value, source });
        self.mark_present(id);
    }

    pub(crate) fn set_values(&mut self, id: &str, values: Vec<Value>, source: ValueSource) {
        let bound: Vec<MatchedValue> =
            values.into_iter().map(|value| MatchedValue { value, source }).collect();
        self.values.insert(id.to_string(), bound);
        self.mark_present(id);
    }

    pub(crate) fn increment_flag(&mut self, id: &str) {
        *self.flags.entry(id.to_string()).or_insert(0) += 1;
        self.mark_present(id);
    }

    pub(crate) fn set_flag(&mut self, id: &str, value: bool) {
        self.flags.insert(id.to_string(), if value { 1 } else { 0 });
        self.mark_present(id);
    }

    pub(crate) fn set_subcommand(&mut self, name: String, matches: ArgMatches) {
        self.subcommand = Some(Box::new(SubcommandMatches { name, matches }));
    }

    pub(crate) fn add_trailing(&mut self, values: impl IntoIterator<Item = String>) {
        self.trailing.extend(values);
    }

    pub(crate) fn mark_present(&mut self, id: &str) {
        self.present.insert(id.to_string());
    }
}
