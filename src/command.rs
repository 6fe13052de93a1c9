// Licensed under the MIT license or the Apache License, Version 2.0, at your option. You may not
// copy, modify, or distribute this file except in compliance with said license.

//! The command tree: the root object an application builds and calls `get_matches` on.

use std::collections::HashSet;
use std::sync::Arc;

use crate::arg::{Action, Arg};
use crate::arg_group::ArgGroup;
use crate::error::Result;
use crate::matches::ArgMatches;
use crate::matching::find_unique_prefix_match;
use crate::parser::Parser;
use crate::validator;

/// A behavior switch recognized by the core.
///
/// Every variant listed here is accepted and stored; only the ones named in the field docs below
/// actually change parser/validator behavior. The rest are reserved for a help formatter that is
/// out of scope for this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Setting {
    /// A subcommand with no version of its own inherits its parent's, at attach time.
    PropagateVersion,
    /// The validator's final check fails with `MissingSubcommand` if none was selected.
    SubcommandRequired,
    AllowExternalSubcommands,
    SubcommandPrecedenceOverArg,
    HideAuthor,
    /// Paired with `SubcommandRequired`: if nothing else was matched either, surface a help
    /// condition instead of a bare error.
    ArgRequiredElseHelp,
    /// Suppresses synthesizing the builtin `-h`/`--help` arg.
    DisableHelpFlag,
    /// Suppresses synthesizing the builtin `-V`/`--version` arg.
    DisableVersionFlag,
    DisableColoredHelp,
    DeriveDisplayOrder,
    AllowHyphenValues,
    /// `-123`/`-1.5`-shaped tokens are treated as values, not options.
    AllowNegativeNumbers,
    IgnoreErrors,
    FlattenHelp,
    NextLineHelp,
    HidePossibleValues,
    DontCollapseArgsInUsage,
    /// An unmatched `--name` is retried as a unique-prefix match among long option names.
    InferLongArgs,
    /// An unmatched positional is retried as a unique-prefix match among subcommand names.
    InferSubcommands,
}

pub type ActionFn = Arc<dyn Fn(&ArgMatches) + Send + Sync>;

/// A command or subcommand: the tree node the whole argument model hangs off of.
///
/// Built with the same owned-`Self` fluent style as [`Arg`]:
///
/// ```
/// use cmdforge::arg::Arg;
/// use cmdforge::command::Command;
/// let cli = Command::new("tool")
///     .version("1.0")
///     .arg(Arg::new("verbose").short('v').long("verbose"));
/// ```
#[derive(Clone)]
pub struct Command {
    pub(crate) name: String,
    pub(crate) display_name: Option<String>,
    pub(crate) version: Option<String>,
    pub(crate) author: Option<String>,
    pub(crate) about: Option<String>,
    pub(crate) long_about: Option<String>,
    pub(crate) usage_override: Option<String>,
    pub(crate) before_help: Option<String>,
    pub(crate) after_help: Option<String>,
    pub(crate) args: Vec<Arg>,
    pub(crate) subcommands: Vec<Command>,
    pub(crate) groups: Vec<ArgGroup>,
    pub(crate) aliases: Vec<String>,
    pub(crate) hidden_aliases: Vec<String>,
    pub(crate) settings: HashSet<Setting>,
    /// Ancestor names from the root down to (not including) this command. A path, not a pointer —
    /// avoids an ownership cycle since subcommands live inside `subcommands`.
    pub(crate) parent_path: Vec<String>,
    pub(crate) positional_counter: u32,
    pub(crate) action_handler: Option<ActionFn>,
}

impl Command {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            display_name: None,
            version: None,
            author: None,
            about: None,
            long_about: None,
            usage_override: None,
            before_help: None,
            after_help: None,
            args: Vec::new(),
            subcommands: Vec::new(),
            groups: Vec::new(),
            aliases: Vec::new(),
            hidden_aliases: Vec::new(),
            settings: HashSet::new(),
            parent_path: Vec::new(),
            positional_counter: 0,
            action_handler: None,
        }
    }

    pub fn display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn about(mut self, about: impl Into<String>) -> Self {
        self.about = Some(about.into());
        self
    }

    pub fn long_about(mut self, text: impl Into<String>) -> Self {
        self.long_about = Some(text.into());
        self
    }

    pub fn usage_override(mut self, text: impl Into<String>) -> Self {
        self.usage_override = Some(text.into());
        self
    }

    pub fn before_help(mut self, text: impl Into<String>) -> Self {
        self.before_help = Some(text.into());
        self
    }

    pub fn after_help(mut self, text: impl Into<String>) -> Self {
        self.after_help = Some(text.into());
        self
    }

    pub fn alias(mut self, name: impl Into<String>) -> Self {
        self.aliases.push(name.into());
        self
    }

    pub fn hidden_alias(mut self, name: impl Into<String>) -> Self {
        self.hidden_aliases.push(name.into());
        self
    }

    pub fn setting(mut self, setting: Setting) -> Self {
        self.settings.insert(setting);
        self
    }

    pub fn action_handler(mut self, handler: impl Fn(&ArgMatches) + Send + Sync + 'static) -> Self {
        self.action_handler = Some(Arc::new(handler));
        self
    }

    /// Attach an argument. If its `index` was set to `-1` (auto-assign), resolve it to the next
    /// positional slot here, at attach time.
    pub fn arg(mut self, mut a: Arg) -> Self {
        if a.index == Some(-1) {
            a.index = Some(self.positional_counter as i32);
            self.positional_counter += 1;
        } else if let Some(idx) = a.index {
            self.positional_counter = self.positional_counter.max(idx as u32 + 1);
        }
        self.args.push(a);
        self
    }

    /// Attach a subcommand, setting its parent path and, if `PropagateVersion` is set and the
    /// child has no version of its own, inheriting this command's version string.
    pub fn subcommand(mut self, mut sub: Command) -> Self {
        let mut path = self.parent_path.clone();
        path.push(self.display_name.clone().unwrap_or_else(|| self.name.clone()));
        sub.parent_path = path;
        if self.settings.contains(&Setting::PropagateVersion) && sub.version.is_none() {
            sub.version = self.version.clone();
        }
        self.subcommands.push(sub);
        self
    }

    pub fn group(mut self, g: ArgGroup) -> Self {
        self.groups.push(g);
        self
    }

    pub fn has_setting(&self, setting: Setting) -> bool {
        self.settings.contains(&setting)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// All declared args. Builtin `help`/`version` flags are synthesized per-parse by
    /// [`Parser`](crate::parser::Parser) and are not reflected here.
    pub(crate) fn all_args(&self) -> impl Iterator<Item = &Arg> {
        self.args.iter()
    }

    pub fn find_arg(&self, id: &str) -> Option<&Arg> {
        self.all_args().find(|a| a.id == id)
    }

    pub fn find_arg_by_short(&self, ch: char) -> Option<&Arg> {
        self.all_args().find(|a| a.matches_short(ch))
    }

    pub fn find_arg_by_long(&self, name: &str) -> Option<&Arg> {
        self.all_args().find(|a| a.matches_long(name))
    }

    pub fn find_subcommand(&self, name_or_alias: &str) -> Option<&Command> {
        self.subcommands.iter().find(|c| {
            c.name == name_or_alias
                || c.aliases.iter().any(|a| a == name_or_alias)
                || c.hidden_aliases.iter().any(|a| a == name_or_alias)
        })
    }

    /// Unique-subcommand-name-prefix fallback, used when `InferSubcommands` is set.
    pub(crate) fn find_subcommand_by_prefix(&self, prefix: &str) -> Option<&Command> {
        find_unique_prefix_match(prefix, self.subcommands.iter(), |c| c.name.as_str())
    }

    /// Positional args, sorted by resolved index.
    pub fn positional_args(&self) -> Vec<&Arg> {
        let mut positionals: Vec<&Arg> = self.args.iter().filter(|a| a.is_positional()).collect();
        positionals.sort_by_key(|a| a.index.unwrap_or(i32::MAX));
        positionals
    }

    /// The complement of [`positional_args`](Self::positional_args): every non-positional arg,
    /// declared or builtin.
    pub fn optional_args(&self) -> Vec<&Arg> {
        self.all_args().filter(|a| !a.is_positional()).collect()
    }

    /// Space-joined chain from the root command down to this one, using each command's
    /// `display_name` if set, else its `name`.
    pub fn full_name(&self) -> String {
        let mut parts = self.parent_path.clone();
        parts.push(self.display_name.clone().unwrap_or_else(|| self.name.clone()));
        parts.join(" ")
    }

    /// Parse `argv` against this command tree, then validate the result.
    ///
    /// `argv` should not include the program name (`argv[0]`); callers typically pass
    /// `std::env::args().skip(1).collect::<Vec<_>>()`.
    pub fn get_matches(&self, argv: &[String]) -> Result<ArgMatches> {
        let matches = Parser::new(self).parse(argv)?;
        validator::validate(self, &matches)?;
        Ok(matches)
    }

    /// The action handler attached via [`Command::action_handler`], if any. Invoking it is left to
    /// the caller — dispatch is out of scope for this crate.
    pub fn action(&self) -> Option<&ActionFn> {
        self.action_handler.as_ref()
    }
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("display_name", &self.display_name)
            .field("args", &self.args)
            .field("subcommands", &self.subcommands)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auto_index_assigns_in_attach_order() {
        let cmd = Command::new("cp")
            .arg(Arg::new("src").index(-1))
            .arg(Arg::new("dst").index(-1));
        let positionals = cmd.positional_args();
        assert_eq!(positionals[0].id(), "src");
        assert_eq!(positionals[1].id(), "dst");
    }

    #[test]
    fn subcommand_inherits_version_when_propagating() {
        let child = Command::new("init");
        let root = Command::new("tool").version("2.0").setting(Setting::PropagateVersion).subcommand(child);
        assert_eq!(root.subcommands[0].version.as_deref(), Some("2.0"));
    }

    #[test]
    fn full_name_joins_ancestor_chain() {
        let grandchild = Command::new("list");
        let child = Command::new("remote").subcommand(grandchild);
        let root = Command::new("git").subcommand(child);
        let remote = root.find_subcommand("remote").unwrap();
        let list = remote.find_subcommand("list").unwrap();
        assert_eq!(list.full_name(), "git remote list");
    }

    #[test]
    fn find_subcommand_matches_alias() {
        let root = Command::new("tool").subcommand(Command::new("remove").alias("rm"));
        assert!(root.find_subcommand("rm").is_some());
        assert!(root.find_subcommand("remove").is_some());
        assert!(root.find_subcommand("nope").is_none());
    }

    #[test]
    fn flag_action_args_excluded_from_positionals() {
        let cmd = Command::new("tool")
            .arg(Arg::new("verbose").short('v').action(Action::Count))
            .arg(Arg::new("name").index(-1));
        assert_eq!(cmd.positional_args().len(), 1);
        assert_eq!(cmd.optional_args().len(), 1);
    }
}
