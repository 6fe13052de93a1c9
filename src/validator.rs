// Licensed under the MIT license or the Apache License, Version 2.0, at your option. You may not
// copy, modify, or distribute this file except in compliance with said license.

//! Post-parse constraint checking, driven by a [`Command`] and its [`ArgMatches`].
//!
//! Checks run in a fixed order; the first violation aborts with the corresponding error.

use crate::arg::{Action, Arg};
use crate::command::{Command, Setting};
use crate::error::{Error, Result};
use crate::matches::ArgMatches;

pub(crate) fn validate(command: &Command, matches: &ArgMatches) -> Result<()> {
    check_required_args(command, matches)?;
    check_required_groups(command, matches)?;
    check_conflicts(command, matches)?;
    check_requires(command, matches)?;
    check_required_if(command, matches)?;
    check_required_unless(command, matches)?;
    check_value_counts(command, matches)?;
    check_group_exclusivity(command, matches)?;
    check_subcommand_requirement(command, matches)?;

    if let Some((name, sub_matches)) = matches.subcommand() {
        let sub = command
            .find_subcommand(name)
            .expect("matches.subcommand() always names an attached subcommand");
        validate(sub, sub_matches)?;
    }

    Ok(())
}

fn check_required_args(command: &Command, matches: &ArgMatches) -> Result<()> {
    for a in &command.args {
        if a.required && !matches.contains(&a.id) {
            return Err(Error::MissingRequiredArgument { arg_id: a.id.clone(), context: None });
        }
    }
    Ok(())
}

fn check_required_groups(command: &Command, matches: &ArgMatches) -> Result<()> {
    for g in &command.groups {
        if g.required && !g.args.iter().any(|id| matches.contains(id)) {
            return Err(Error::MissingRequiredGroup { group_id: g.id().to_string() });
        }
    }
    Ok(())
}

fn check_conflicts(command: &Command, matches: &ArgMatches) -> Result<()> {
    for a in &command.args {
        if !matches.contains(&a.id) {
            continue;
        }
        for other in &a.conflicts {
            if matches.contains(other) {
                return Err(Error::ArgumentConflict { first: a.id.clone(), second: other.clone() });
            }
        }
    }
    Ok(())
}

fn check_requires(command: &Command, matches: &ArgMatches) -> Result<()> {
    for a in &command.args {
        if !matches.contains(&a.id) {
            continue;
        }
        for needed in &a.requires {
            if !matches.contains(needed) {
                return Err(Error::MissingDependency { arg_id: a.id.clone(), requires: needed.clone() });
            }
        }
    }
    Ok(())
}

fn check_required_if(command: &Command, matches: &ArgMatches) -> Result<()> {
    for a in &command.args {
        for (cond_id, cond_value) in &a.required_if {
            let condition_met = matches
                .get_one(cond_id)
                .map(|v| &v.to_display_string() == cond_value)
                .unwrap_or(false);
            if condition_met && !matches.contains(&a.id) {
                return Err(Error::MissingRequiredArgument {
                    arg_id: a.id.clone(),
                    context: Some(format!("required when '{cond_id}' is '{cond_value}'")),
                });
            }
        }
    }
    Ok(())
}

fn check_required_unless(command: &Command, matches: &ArgMatches) -> Result<()> {
    for a in &command.args {
        if a.required_unless.is_empty() || matches.contains(&a.id) {
            continue;
        }
        if !a.required_unless.iter().any(|id| matches.contains(id)) {
            return Err(Error::MissingRequiredArgument { arg_id: a.id.clone(), context: None });
        }
    }
    Ok(())
}

fn check_value_counts(command: &Command, matches: &ArgMatches) -> Result<()> {
    for a in &command.args {
        if a.is_flag() || !matches.contains(&a.id) {
            continue;
        }
        // Append/allow_multiple args bind `num_args` per occurrence (already enforced by the
        // parser's flush, once per occurrence); the accumulated total across occurrences has no
        // such bound.
        if a.action == Action::Append || a.allow_multiple {
            continue;
        }
        let n = matches.get_many(&a.id).len() as u32;
        if !a.num_args.includes(n) {
            return Err(count_error(a, n));
        }
    }
    Ok(())
}

fn count_error(a: &Arg, actual: u32) -> Error {
    match a.num_args.max() {
        Some(max) if actual > max => {
            Error::TooManyValues { arg_id: a.id.clone(), bound: max, actual }
        }
        _ => Error::TooFewValues { arg_id: a.id.clone(), bound: a.num_args.min(), actual },
    }
}

fn check_group_exclusivity(command: &Command, matches: &ArgMatches) -> Result<()> {
    for g in &command.groups {
        if g.is_exclusive() {
            let present: Vec<&String> = g.args.iter().filter(|id| matches.contains(id)).collect();
            if present.len() > 1 {
                return Err(Error::ArgumentConflict {
                    first: present[0].clone(),
                    second: present[1].clone(),
                });
            }
        }
    }
    Ok(())
}

fn check_subcommand_requirement(command: &Command, matches: &ArgMatches) -> Result<()> {
    if command.has_setting(Setting::SubcommandRequired)
        && !command.subcommands.is_empty()
        && matches.subcommand().is_none()
    {
        if command.has_setting(Setting::ArgRequiredElseHelp) && matches.is_empty() {
            return Err(Error::DisplayHelp(format!("{}\nno arguments provided", command.full_name())));
        }
        return Err(Error::MissingSubcommand);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arg::Action;
    use crate::arg_group::ArgGroup;
    use crate::matches::ValueSource;
    use crate::value_parser::Value;

    #[test]
    fn required_argument_absent_fails() {
        let cmd = Command::new("tool").arg(Arg::new("name").long("name").required(true));
        let matches = ArgMatches::new();
        assert_eq!(
            validate(&cmd, &matches).unwrap_err(),
            Error::MissingRequiredArgument { arg_id: "name".into(), context: None }
        );
    }

    #[test]
    fn conflict_between_present_args_fails_in_declared_order() {
        let cmd = Command::new("tool")
            .arg(Arg::new("verbose").short('v').action(Action::SetTrue).conflicts_with("quiet"))
            .arg(Arg::new("quiet").short('q').action(Action::SetTrue));
        let mut matches = ArgMatches::new();
        matches.set_flag("verbose", true);
        matches.set_flag("quiet", true);
        assert_eq!(
            validate(&cmd, &matches).unwrap_err(),
            Error::ArgumentConflict { first: "verbose".into(), second: "quiet".into() }
        );
    }

    #[test]
    fn required_group_with_no_members_present_fails() {
        let cmd = Command::new("tool")
            .arg(Arg::new("json").long("json").action(Action::SetTrue))
            .arg(Arg::new("yaml").long("yaml").action(Action::SetTrue))
            .group(ArgGroup::new("format").arg("json").arg("yaml").required(true));
        let matches = ArgMatches::new();
        assert_eq!(
            validate(&cmd, &matches).unwrap_err(),
            Error::MissingRequiredGroup { group_id: "format".into() }
        );
    }

    #[test]
    fn exclusive_group_with_two_members_present_fails() {
        let cmd = Command::new("tool")
            .arg(Arg::new("json").long("json").action(Action::SetTrue))
            .arg(Arg::new("yaml").long("yaml").action(Action::SetTrue))
            .group(ArgGroup::new("format").arg("json").arg("yaml"));
        let mut matches = ArgMatches::new();
        matches.set_flag("json", true);
        matches.set_flag("yaml", true);
        assert_eq!(
            validate(&cmd, &matches).unwrap_err(),
            Error::ArgumentConflict { first: "json".into(), second: "yaml".into() }
        );
    }

    #[test]
    fn required_if_triggers_only_when_condition_value_matches() {
        let cmd = Command::new("tool")
            .arg(Arg::new("mode").long("mode"))
            .arg(Arg::new("target").long("target").required_if("mode", "deploy"));
        let mut matches = ArgMatches::new();
        matches.set_value("mode", Value::Str("deploy".into()), ValueSource::CommandLine);
        assert!(matches!(validate(&cmd, &matches), Err(Error::MissingRequiredArgument { .. })));

        let mut matches = ArgMatches::new();
        matches.set_value("mode", Value::Str("dryrun".into()), ValueSource::CommandLine);
        assert!(validate(&cmd, &matches).is_ok());
    }

    #[test]
    fn required_unless_satisfied_by_alternative() {
        let cmd = Command::new("tool")
            .arg(Arg::new("config").long("config").required_unless("defaults"))
            .arg(Arg::new("defaults").long("defaults").action(Action::SetTrue));
        let mut matches = ArgMatches::new();
        matches.set_flag("defaults", true);
        assert!(validate(&cmd, &matches).is_ok());

        let matches = ArgMatches::new();
        assert!(validate(&cmd, &matches).is_err());
    }

    #[test]
    fn value_count_out_of_bounds_fails() {
        use crate::value_range::ValueRange;
        let cmd = Command::new("tool")
            .arg(Arg::new("pair").long("pair").num_args(ValueRange::new(2, Some(2))));
        let mut matches = ArgMatches::new();
        matches.set_values("pair", vec![Value::Str("a".into())], ValueSource::CommandLine);
        assert_eq!(
            validate(&cmd, &matches).unwrap_err(),
            Error::TooFewValues { arg_id: "pair".into(), bound: 2, actual: 1 }
        );
    }

    #[test]
    fn subcommand_required_without_selection_fails() {
        let cmd = Command::new("tool")
            .setting(Setting::SubcommandRequired)
            .subcommand(Command::new("init"));
        let matches = ArgMatches::new();
        assert_eq!(validate(&cmd, &matches).unwrap_err(), Error::MissingSubcommand);
    }

    #[test]
    fn nested_subcommand_matches_are_validated_too() {
        let cmd = Command::new("tool")
            .subcommand(Command::new("init").arg(Arg::new("name").index(-1).required(true)));
        let mut matches = ArgMatches::new();
        matches.set_subcommand("init".to_string(), ArgMatches::new());
        assert_eq!(
            validate(&cmd, &matches).unwrap_err(),
            Error::MissingRequiredArgument { arg_id: "name".into(), context: None }
        );
    }
}
