//! Command dispatch.

use std::io::{self, Write};

use crate::classify::Verdict;
use crate::cli::Cli;
use crate::config::RunConfig;
use crate::context::ServiceContext;
use crate::error::GuardError;
use crate::guard::run_guard;
use crate::report::render;

/// Resolves the parsed arguments and runs the guard against real disk.
///
/// # Errors
///
/// Returns a [`GuardError`] if configuration is invalid or the run fails.
pub fn dispatch(cli: &Cli) -> Result<Verdict, GuardError> {
    let config = RunConfig::resolve(cli)?;
    run_with_context(&ServiceContext::live(), &config)
}

/// Runs the guard with the given service context, printing the report when
/// the configuration asks for one.
///
/// The verdict is returned whether or not anything was printed.
///
/// # Errors
///
/// Returns a [`GuardError`] if the run or rendering fails.
pub fn run_with_context(ctx: &ServiceContext, config: &RunConfig) -> Result<Verdict, GuardError> {
    let outcome = run_guard(ctx, config)?;
    if config.report {
        let text = render(config.format, &outcome)?;
        emit(&mut io::stdout().lock(), &text)?;
    }
    Ok(outcome.verdict())
}

/// Writes the report followed by a newline.
///
/// A reader that went away (`plan-guard --report | head`) is not an error:
/// the manifest is already written and the verdict still stands.
fn emit(out: &mut impl Write, text: &str) -> Result<(), GuardError> {
    match writeln!(out, "{text}").and_then(|()| out.flush()) {
        Err(err) if err.kind() != io::ErrorKind::BrokenPipe => Err(GuardError::Output(err)),
        _ => Ok(()),
    }
}
