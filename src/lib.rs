// Licensed under the MIT license or the Apache License, Version 2.0, at your option. You may not
// copy, modify, or distribute this file except in compliance with said license.

//! A declarative, builder-style command line argument parser.
//!
//! Describe the shape of a command line interface — options, positionals, subcommands, value
//! parsers, and cross-argument constraints — with the [`Command`]/[`Arg`] builder DSL, then call
//! [`Command::get_matches`] on a raw argv slice to get back a structured, source-tagged
//! [`ArgMatches`].
//!
//! ```
//! use cmdforge::arg::{Action, Arg};
//! use cmdforge::command::Command;
//!
//! let cli = Command::new("greet")
//!     .arg(Arg::new("name").index(-1).required(true))
//!     .arg(Arg::new("loud").short('l').long("loud").action(Action::SetTrue));
//!
//! let argv: Vec<String> = vec!["world".into(), "--loud".into()];
//! let matches = cli.get_matches(&argv).unwrap();
//! assert_eq!(matches.get_one("name").unwrap().as_str(), Some("world"));
//! assert!(matches.flag("loud"));
//! ```
//!
//! # What this crate does not do
//!
//! Rendering help/usage text, dispatching to an action handler, and printing errors then exiting
//! the process are left to the consuming application; see [`error::Error`] for the structured
//! failure data a caller needs to build that glue.

pub mod arg;
pub mod arg_group;
pub mod command;
pub mod error;
pub mod matches;
mod matching;
mod parser;
mod validator;
pub mod value_parser;
pub mod value_range;

pub use arg::{Action, Arg, ValueHint};
pub use arg_group::ArgGroup;
pub use command::{ActionFn, Command, Setting};
pub use error::{Error, Result};
pub use matches::{ArgMatches, MatchedValue, ValueSource};
pub use value_parser::{Value, ValueParser};
pub use value_range::ValueRange;
