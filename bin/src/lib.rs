//! Command-line front end for gapedit.
//!
//! Subcommands live in [`commands`]; each takes its parsed arguments, the
//! loaded [`gapedit::Config`] and an output sink so tests can capture what it
//! prints.

pub mod cli;
pub mod commands;
