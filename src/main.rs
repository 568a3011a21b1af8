//! Binary entrypoint for the `plan-guard` CLI.

use std::process::ExitCode;

use plan_guard::{GuardError, FATAL_EXIT_CODE};

fn main() -> ExitCode {
    match plan_guard::run(std::env::args()) {
        Ok(verdict) => ExitCode::from(verdict.exit_code()),
        Err(GuardError::Usage(err)) => {
            // Help and version go to stdout and succeed.
            let _ = err.print();
            if err.use_stderr() {
                ExitCode::from(FATAL_EXIT_CODE)
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(err) => {
            eprintln!("[plan-guard] FATAL: {err}");
            ExitCode::from(FATAL_EXIT_CODE)
        }
    }
}
