//! `run` and `check` command implementations.
//!
//! Both operate on a whole script: `run` executes it once in a fresh
//! namespace, `check` only compiles it.

use std::process::ExitCode;

use pycell_core::{Executor, ExecutorConfig};

use crate::colors;
use crate::output::print_outcome;
use crate::source;

/// Execute a script once and print its captured output.
pub fn execute(script: &str, config: ExecutorConfig) -> anyhow::Result<ExitCode> {
    let code = source::load(script)?;
    tracing::debug!(script = source::display_name(script), bytes = code.len(), "running script");

    let executor = Executor::with_config(config);
    let outcome = executor.execute(&code);
    let failed = outcome.is_error();

    print_outcome(outcome, colors::enabled());

    Ok(if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

/// Compile a script without running it and print the status line.
pub fn check(script: &str, config: ExecutorConfig) -> anyhow::Result<ExitCode> {
    let code = source::load(script)?;
    let executor = Executor::with_config(config);
    let status = executor.check(&code);

    if status.is_ok() {
        println!("{status}");
        Ok(ExitCode::SUCCESS)
    } else {
        println!(
            "{}",
            colors::paint(&status.to_string(), colors::RED, colors::enabled())
        );
        Ok(ExitCode::FAILURE)
    }
}
