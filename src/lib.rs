//! Core library entry for the `plan-guard` CLI.
//!
//! A run extracts every repo path a phase-structured plan mentions, checks
//! that the enforced ones exist, scans the watched roots for files the plan
//! never authorized, and records the outcome as a JSON manifest.

pub mod adapters;
pub mod classify;
pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod error;
pub mod guard;
pub mod logging;
pub mod manifest;
pub mod plan;
pub mod ports;
pub mod report;
pub mod scaffold;
pub mod scan;

#[cfg(test)]
mod testing;

use clap::Parser;

pub use classify::{Verdict, FATAL_EXIT_CODE};
pub use error::GuardError;

/// Run the CLI with the provided arguments.
///
/// # Errors
///
/// Returns [`GuardError::Usage`] when argument parsing fails (including
/// help and version requests) and any other [`GuardError`] when the run does.
pub fn run<I, T>(args: I) -> Result<Verdict, GuardError>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = cli::Cli::try_parse_from(args)?;
    logging::init(cli.verbose);
    commands::dispatch(&cli)
}
