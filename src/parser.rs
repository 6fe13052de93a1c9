// Licensed under the MIT license or the Apache License, Version 2.0, at your option. You may not
// copy, modify, or distribute this file except in compliance with said license.

//! The tokenizer: walks a raw argv slice against a [`Command`] and produces an [`ArgMatches`].

use std::env;

use crate::arg::{Action, Arg};
use crate::command::{Command, Setting};
use crate::error::{Error, Result};
use crate::matches::{ArgMatches, ValueSource};
use crate::matching::suggest;
use crate::value_parser::Value;

/// One parse pass, scoped to a single [`Command`] (a fresh one is built per subcommand
/// recursion).
pub(crate) struct Parser<'c> {
    command: &'c Command,
}

impl<'c> Parser<'c> {
    pub(crate) fn new(command: &'c Command) -> Self {
        Self { command }
    }

    pub(crate) fn parse(&self, argv: &[String]) -> Result<ArgMatches> {
        self.run(argv, &[], &[])
    }

    fn run(
        &self,
        argv: &[String],
        inherited_values: &[(String, Value)],
        inherited_flags: &[(String, u32)],
    ) -> Result<ArgMatches> {
        let mut matches = ArgMatches::new();
        let synthesized = self.synthesize_builtins();
        let effective_args: Vec<&Arg> = self.command.args.iter().chain(synthesized.iter()).collect();
        let positionals = self.command.positional_args();

        for (id, value) in inherited_values {
            matches.append_value(id, value.clone(), ValueSource::Default);
        }
        for (id, count) in inherited_flags {
            for _ in 0..*count {
                matches.increment_flag(id);
            }
        }
        let mut i = 0usize;
        let mut trailing_mode = false;
        let mut current_arg_idx: Option<usize> = None;
        let mut pending: Vec<String> = Vec::new();
        let mut positional_index = 0usize;

        while i < argv.len() {
            let tok = argv[i].clone();

            if trailing_mode {
                matches.add_trailing(std::iter::once(tok));
                i += 1;
                continue;
            }

            if tok == "--" {
                self.flush(&mut matches, current_arg_idx.take().map(|idx| effective_args[idx]), &mut pending)?;
                trailing_mode = true;
                i += 1;
                continue;
            }

            let negative_number = tok.len() > 1
                && tok.starts_with('-')
                && tok[1..].chars().next().is_some_and(|c| c.is_ascii_digit())
                && self.command.has_setting(Setting::AllowNegativeNumbers);

            if tok.starts_with("--") {
                self.flush(&mut matches, current_arg_idx.take().map(|idx| effective_args[idx]), &mut pending)?;
                i += 1;
                self.handle_long(&tok, &effective_args, &mut matches, &mut current_arg_idx)?;
                continue;
            }

            if tok.starts_with('-') && tok.len() > 1 && !negative_number {
                self.flush(&mut matches, current_arg_idx.take().map(|idx| effective_args[idx]), &mut pending)?;
                i += 1;
                self.handle_short_cluster(&tok, &effective_args, &mut matches, &mut current_arg_idx)?;
                continue;
            }

            if let Some(idx) = current_arg_idx {
                pending.push(tok);
                i += 1;
                let arg = effective_args[idx];
                if pending.len() as u32 >= arg.num_args.max().unwrap_or(u32::MAX) {
                    current_arg_idx = None;
                    self.flush(&mut matches, Some(arg), &mut pending)?;
                }
                continue;
            }

            i += 1;
            self.handle_positional_or_subcommand(
                &tok,
                &argv[i..],
                &positionals,
                &mut positional_index,
                &mut matches,
            )?;
            if matches.subcommand().is_some() {
                // the subcommand path consumes the rest of argv
                i = argv.len();
            }
        }

        self.flush(&mut matches, current_arg_idx.take().map(|idx| effective_args[idx]), &mut pending)?;

        // Applied after the token walk, against a snapshot of which ids command-line tokens (or
        // inherited values) already bound, so a command-line binding (including one accumulated
        // across several `Append` occurrences) always wins outright instead of coexisting
        // alongside a pre-seeded default/env value under the same id. Env still overrides a
        // default applied in the first of these two loops.
        let bound_before_defaults: std::collections::HashSet<&str> =
            self.command.args.iter().map(|a| a.id.as_str()).filter(|id| matches.contains(id)).collect();
        for a in &self.command.args {
            if bound_before_defaults.contains(a.id.as_str()) {
                continue;
            }
            if let Some(default) = &a.default_value {
                let value = a
                    .value_parser
                    .parse(default)
                    .map_err(|f| invalid_value(a, default, f.expected))?;
                matches.set_value(&a.id, value, ValueSource::Default);
            }
        }
        for a in &self.command.args {
            if bound_before_defaults.contains(a.id.as_str()) {
                continue;
            }
            if let Some(var) = &a.env_var {
                if let Ok(raw) = env::var(var) {
                    if !raw.is_empty() {
                        let value =
                            a.value_parser.parse(&raw).map_err(|f| invalid_value(a, &raw, f.expected))?;
                        matches.set_value(&a.id, value, ValueSource::Env);
                    }
                }
            }
        }

        Ok(matches)
    }

    fn synthesize_builtins(&self) -> Vec<Arg> {
        let mut out = Vec::new();
        if !self.command.has_setting(Setting::DisableHelpFlag) && self.command.find_arg("help").is_none() {
            out.push(Arg::new("help").short('h').long("help").action(Action::Help));
        }
        if self.command.version.is_some()
            && !self.command.has_setting(Setting::DisableVersionFlag)
            && self.command.find_arg("version").is_none()
        {
            out.push(Arg::new("version").short('V').long("version").action(Action::Version));
        }
        out
    }

    fn apply_flag_action(&self, matches: &mut ArgMatches, arg: &Arg) -> Result<()> {
        match arg.action {
            Action::SetTrue => matches.set_flag(&arg.id, true),
            Action::SetFalse => matches.set_flag(&arg.id, false),
            Action::Count => matches.increment_flag(&arg.id),
            Action::Help => return Err(Error::DisplayHelp(self.render_help())),
            Action::Version => return Err(Error::DisplayVersion(self.render_version())),
            Action::Set | Action::Append => matches.increment_flag(&arg.id),
        }
        Ok(())
    }

    fn render_help(&self) -> String {
        let about = self.command.about.clone().unwrap_or_default();
        let mut text = format!("{}\n{}", self.command.full_name(), about);
        if !self.command.has_setting(Setting::HideAuthor) {
            if let Some(author) = &self.command.author {
                text.push('\n');
                text.push_str(author);
            }
        }
        text
    }

    fn render_version(&self) -> String {
        format!("{} {}", self.command.full_name(), self.command.version.clone().unwrap_or_default())
    }

    fn handle_long(
        &self,
        tok: &str,
        effective_args: &[&Arg],
        matches: &mut ArgMatches,
        current_arg_idx: &mut Option<usize>,
    ) -> Result<()> {
        let body = &tok[2..];
        let (name, attached) = match body.split_once('=') {
            Some((n, v)) => (n, Some(v.to_string())),
            None => (body, None),
        };

        let found = effective_args.iter().position(|a| a.matches_long(name)).or_else(|| {
            if self.command.has_setting(Setting::InferLongArgs) {
                unique_long_prefix(effective_args, name)
            } else {
                None
            }
        });

        let Some(idx) = found else {
            let candidates = candidate_names(effective_args);
            let suggestions = suggest(name, candidates.iter().map(String::as_str))
                .into_iter()
                .map(|s| format_suggestion(&s))
                .collect();
            return Err(Error::UnknownArgument { raw: tok.to_string(), suggestions });
        };

        let arg = effective_args[idx];

        if arg.action.is_flag_action() {
            // Attached values on a flag-action long option are silently discarded.
            return self.apply_flag_action(matches, arg);
        }

        if let Some(value) = attached {
            let mut pending = vec![value];
            self.flush(matches, Some(arg), &mut pending)?;
        } else {
            *current_arg_idx = Some(idx);
        }
        Ok(())
    }

    fn handle_short_cluster(
        &self,
        tok: &str,
        effective_args: &[&Arg],
        matches: &mut ArgMatches,
        current_arg_idx: &mut Option<usize>,
    ) -> Result<()> {
        let rest = &tok[1..];

        for (byte_off, ch) in rest.char_indices() {
            let Some(found_idx) = effective_args.iter().position(|a| a.matches_short(ch)) else {
                let candidates = candidate_names(effective_args);
                let suggestions = suggest(&ch.to_string(), candidates.iter().map(String::as_str))
                    .into_iter()
                    .map(|s| format_suggestion(&s))
                    .collect();
                return Err(Error::UnknownArgument { raw: format!("-{ch}"), suggestions });
            };

            let arg = effective_args[found_idx];

            if arg.action.is_flag_action() {
                self.apply_flag_action(matches, arg)?;
                continue;
            }

            let next_byte = byte_off + ch.len_utf8();
            if next_byte < rest.len() {
                let mut pending = vec![rest[next_byte..].to_string()];
                self.flush(matches, Some(arg), &mut pending)?;
            } else {
                *current_arg_idx = Some(found_idx);
            }
            break;
        }
        Ok(())
    }

    fn handle_positional_or_subcommand(
        &self,
        tok: &str,
        rest_of_argv: &[String],
        positionals: &[&Arg],
        positional_index: &mut usize,
        matches: &mut ArgMatches,
    ) -> Result<()> {
        if !self.command.subcommands.is_empty() {
            let sub = self.command.find_subcommand(tok).or_else(|| {
                if self.command.has_setting(Setting::InferSubcommands) {
                    self.command.find_subcommand_by_prefix(tok)
                } else {
                    None
                }
            });

            if let Some(sub) = sub {
                let (inherited_values, inherited_flags) = self.collect_inherited(matches);
                let sub_matches =
                    Parser::new(sub).run(rest_of_argv, &inherited_values, &inherited_flags)?;
                matches.set_subcommand(sub.name.clone(), sub_matches);
                return Ok(());
            }
        }

        if *positional_index < positionals.len() {
            let arg = positionals[*positional_index];
            let value = arg.value_parser.parse(tok).map_err(|f| invalid_value(arg, tok, f.expected))?;
            match arg.action {
                Action::Append => matches.append_value(&arg.id, value, ValueSource::CommandLine),
                _ => matches.set_value(&arg.id, value, ValueSource::CommandLine),
            }
            if !(arg.action == Action::Append || arg.allow_multiple) {
                *positional_index += 1;
            }
            return Ok(());
        }

        if !self.command.subcommands.is_empty() {
            let candidates: Vec<String> = self.command.subcommands.iter().map(|c| c.name.clone()).collect();
            let suggestions = suggest(tok, candidates.iter().map(String::as_str));
            Err(Error::InvalidSubcommand { name: tok.to_string(), suggestions })
        } else {
            Err(Error::UnknownArgument { raw: tok.to_string(), suggestions: Vec::new() })
        }
    }

    /// Gather the current matches' values/flags for every `global` arg on this command, so a
    /// subcommand parser can seed them with `source=Default`.
    fn collect_inherited(&self, matches: &ArgMatches) -> (Vec<(String, Value)>, Vec<(String, u32)>) {
        let mut values = Vec::new();
        let mut flags = Vec::new();
        for a in self.command.args.iter().filter(|a| a.global) {
            if a.is_flag() {
                let count = matches.get_count(&a.id);
                if count > 0 {
                    flags.push((a.id.clone(), count));
                }
            } else if matches.contains(&a.id) {
                for v in matches.get_many(&a.id) {
                    values.push((a.id.clone(), v.clone()));
                }
            }
        }
        (values, flags)
    }

    /// Finish accumulating an option's value(s) and bind them.
    ///
    /// A delimiter (if set) splits each *raw* token before parsing, per the documented deviation
    /// from splitting the parsed value's rendered form.
    fn flush(&self, matches: &mut ArgMatches, arg: Option<&Arg>, pending: &mut Vec<String>) -> Result<()> {
        let Some(arg) = arg else {
            pending.clear();
            return Ok(());
        };

        if pending.is_empty() {
            if let Some(missing) = &arg.default_missing_value {
                pending.push(missing.clone());
            } else if arg.num_args.min() > 0 {
                return Err(Error::TooFewValues { arg_id: arg.id.clone(), bound: arg.num_args.min(), actual: 0 });
            } else {
                return Ok(());
            }
        }

        let mut raw_pieces: Vec<String> = Vec::new();
        for raw in pending.iter() {
            match arg.value_delimiter {
                Some(delim) => raw_pieces.extend(raw.split(delim).map(str::to_string)),
                None => raw_pieces.push(raw.clone()),
            }
        }
        pending.clear();

        // For Append/allow_multiple args, num_args bounds one occurrence, not the total
        // accumulated across repeated occurrences — checked here rather than against the
        // cumulative count later (see validator::check_value_counts).
        if arg.action == Action::Append || arg.allow_multiple {
            let n = raw_pieces.len() as u32;
            if !arg.num_args.includes(n) {
                return Err(match arg.num_args.max() {
                    Some(max) if n > max => {
                        Error::TooManyValues { arg_id: arg.id.clone(), bound: max, actual: n }
                    }
                    _ => Error::TooFewValues { arg_id: arg.id.clone(), bound: arg.num_args.min(), actual: n },
                });
            }
        }

        let mut parsed = Vec::with_capacity(raw_pieces.len());
        for raw in &raw_pieces {
            parsed.push(arg.value_parser.parse(raw).map_err(|f| invalid_value(arg, raw, f.expected))?);
        }

        match arg.action {
            Action::Append => {
                for value in parsed {
                    matches.append_value(&arg.id, value, ValueSource::CommandLine);
                }
            }
            _ => matches.set_values(&arg.id, parsed, ValueSource::CommandLine),
        }
        Ok(())
    }
}

fn invalid_value(arg: &Arg, raw: &str, expected: String) -> Error {
    Error::InvalidValue { arg_id: arg.id.clone(), raw: raw.to_string(), expected }
}

fn candidate_names(args: &[&Arg]) -> Vec<String> {
    args.iter().filter_map(|a| a.long.clone().or_else(|| a.short.map(|c| c.to_string()))).collect()
}

fn format_suggestion(name: &str) -> String {
    if name.chars().count() == 1 {
        format!("-{name}")
    } else {
        format!("--{name}")
    }
}

/// Returns the index of the single arg whose long name has `prefix` as a prefix, or `None` if
/// zero or more than one qualify.
fn unique_long_prefix(args: &[&Arg], prefix: &str) -> Option<usize> {
    let mut matched = None;
    let mut count = 0usize;
    for (idx, a) in args.iter().enumerate() {
        if let Some(long) = &a.long {
            if long.starts_with(prefix) {
                count += 1;
                matched = Some(idx);
            }
        }
    }
    if count == 1 {
        matched
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arg_group::ArgGroup;
    use crate::value_range::ValueRange;

    fn argv(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn long_option_with_attached_value() {
        let cmd = Command::new("tool").arg(Arg::new("name").long("name"));
        let matches = Parser::new(&cmd).parse(&argv(&["--name=alice"])).unwrap();
        assert_eq!(matches.get_one("name").unwrap().as_str(), Some("alice"));
    }

    #[test]
    fn long_option_with_separate_value() {
        let cmd = Command::new("tool").arg(Arg::new("name").long("name"));
        let matches = Parser::new(&cmd).parse(&argv(&["--name", "alice"])).unwrap();
        assert_eq!(matches.get_one("name").unwrap().as_str(), Some("alice"));
    }

    #[test]
    fn short_cluster_of_flags() {
        let cmd = Command::new("tool")
            .arg(Arg::new("a").short('a').action(Action::SetTrue))
            .arg(Arg::new("b").short('b').action(Action::SetTrue))
            .arg(Arg::new("c").short('c').action(Action::SetTrue));
        let matches = Parser::new(&cmd).parse(&argv(&["-abc"])).unwrap();
        assert!(matches.flag("a") && matches.flag("b") && matches.flag("c"));
    }

    #[test]
    fn short_cluster_with_attached_value() {
        let cmd = Command::new("tool").arg(Arg::new("path").short('c'));
        let matches = Parser::new(&cmd).parse(&argv(&["-cpath/to/file"])).unwrap();
        assert_eq!(matches.get_one("path").unwrap().as_str(), Some("path/to/file"));
    }

    #[test]
    fn count_action_counts_repetitions() {
        let cmd = Command::new("tool").arg(Arg::new("verbose").short('v').action(Action::Count));
        let matches = Parser::new(&cmd).parse(&argv(&["-vvv"])).unwrap();
        assert_eq!(matches.get_count("verbose"), 3);
    }

    #[test]
    fn trailing_tokens_after_double_dash() {
        let cmd = Command::new("tool").arg(Arg::new("verbose").short('v').action(Action::SetTrue));
        let matches = Parser::new(&cmd).parse(&argv(&["-v", "--", "-a", "-b"])).unwrap();
        assert!(matches.flag("verbose"));
        assert_eq!(matches.trailing(), ["-a", "-b"]);
    }

    #[test]
    fn append_collects_repeated_occurrences_in_order() {
        let cmd = Command::new("tool").arg(Arg::new("include").short('I').action(Action::Append));
        let matches = Parser::new(&cmd).parse(&argv(&["-I", "a", "-I", "b", "-I", "c"])).unwrap();
        let got: Vec<&str> = matches.get_many("include").into_iter().map(|v| v.as_str().unwrap()).collect();
        assert_eq!(got, vec!["a", "b", "c"]);
    }

    #[test]
    fn append_enforces_num_args_per_occurrence() {
        use crate::value_range::ValueRange;
        let cmd = Command::new("tool")
            .arg(Arg::new("pair").long("pair").num_args(ValueRange::new(2, Some(2))).action(Action::Append));
        let err = Parser::new(&cmd).parse(&argv(&["--pair", "a"])).unwrap_err();
        assert_eq!(err, Error::TooFewValues { arg_id: "pair".into(), bound: 2, actual: 1 });

        let matches = Parser::new(&cmd).parse(&argv(&["--pair", "a", "b"])).unwrap();
        let got: Vec<&str> = matches.get_many("pair").into_iter().map(|v| v.as_str().unwrap()).collect();
        assert_eq!(got, vec!["a", "b"]);
    }

    #[test]
    fn append_occurrences_replace_default_entirely() {
        let cmd = Command::new("tool")
            .arg(Arg::new("include").short('I').action(Action::Append).default_value("base"));
        let matches = Parser::new(&cmd).parse(&argv(&["-I", "a", "-I", "b"])).unwrap();
        let got: Vec<&str> = matches.get_many("include").into_iter().map(|v| v.as_str().unwrap()).collect();
        assert_eq!(got, vec!["a", "b"]);
        assert_eq!(matches.value_source("include"), Some(ValueSource::CommandLine));
    }

    #[test]
    fn default_value_applies_when_absent() {
        let cmd = Command::new("tool").arg(Arg::new("config").long("config").default_value("default.conf"));
        let matches = Parser::new(&cmd).parse(&argv(&[])).unwrap();
        assert_eq!(matches.get_one("config").unwrap().as_str(), Some("default.conf"));
        assert_eq!(matches.value_source("config"), Some(ValueSource::Default));
    }

    #[test]
    fn unknown_long_option_suggests_alternatives() {
        let cmd = Command::new("tool").arg(Arg::new("force").long("force"));
        let err = Parser::new(&cmd).parse(&argv(&["--forc"])).unwrap_err();
        match err {
            Error::UnknownArgument { suggestions, .. } => assert_eq!(suggestions, vec!["--force"]),
            other => panic!("expected UnknownArgument, got {other:?}"),
        }
    }

    #[test]
    fn negative_number_allowed_as_positional_value() {
        let cmd = Command::new("tool")
            .setting(Setting::AllowNegativeNumbers)
            .arg(Arg::new("offset").index(-1).value_parser(crate::value_parser::ValueParser::Int));
        let matches = Parser::new(&cmd).parse(&argv(&["-123"])).unwrap();
        assert_eq!(matches.get_one("offset").unwrap().as_int(), Some(-123));
    }

    #[test]
    fn subcommand_inherits_global_values_with_default_source() {
        let cmd = Command::new("tool")
            .arg(Arg::new("verbose").short('v').action(Action::SetTrue).global(true))
            .subcommand(Command::new("run"));
        let matches = Parser::new(&cmd).parse(&argv(&["-v", "run"])).unwrap();
        let (name, sub) = matches.subcommand().unwrap();
        assert_eq!(name, "run");
        assert!(sub.flag("verbose"));
    }

    #[test]
    fn value_delimiter_splits_raw_token_before_parsing() {
        let cmd = Command::new("tool").arg(
            Arg::new("list").long("list").value_delimiter(',').num_args(ValueRange::any()),
        );
        let matches = Parser::new(&cmd).parse(&argv(&["--list", "a,b,c"])).unwrap();
        let got: Vec<&str> = matches.get_many("list").into_iter().map(|v| v.as_str().unwrap()).collect();
        assert_eq!(got, vec!["a", "b", "c"]);
    }

    #[test]
    fn help_render_includes_author_unless_hidden() {
        let cmd = Command::new("tool").author("Jane Doe");
        let err = Parser::new(&cmd).parse(&argv(&["--help"])).unwrap_err();
        let Error::DisplayHelp(text) = err else { panic!("expected DisplayHelp") };
        assert!(text.contains("Jane Doe"));

        let hidden = Command::new("tool").author("Jane Doe").setting(Setting::HideAuthor);
        let err = Parser::new(&hidden).parse(&argv(&["--help"])).unwrap_err();
        let Error::DisplayHelp(text) = err else { panic!("expected DisplayHelp") };
        assert!(!text.contains("Jane Doe"));
    }

    #[test]
    fn group_metadata_is_attachable_without_affecting_parse() {
        let cmd = Command::new("tool")
            .arg(Arg::new("verbose").short('v').action(Action::SetTrue).group("output"))
            .arg(Arg::new("quiet").short('q').action(Action::SetTrue).group("output"))
            .group(ArgGroup::new("output").arg("verbose").arg("quiet"));
        let matches = Parser::new(&cmd).parse(&argv(&["-v"])).unwrap();
        assert!(matches.flag("verbose"));
    }
}
