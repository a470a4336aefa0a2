//! burrow CLI entry point
//!
//! Parses arguments, sets up logging and runs the selected command. Errors
//! are rendered through [`user_friendly_error`] and end the process with
//! status 1. Ctrl-C anywhere in a command ends it the same way.

use anyhow::Result;
use burrow_cli::cli::Cli;
use burrow_cli::constants::NO_PROGRESS_ENV;
use burrow_cli::core::{BurrowError, user_friendly_error};
use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.no_progress() {
        // SAFETY: no other thread exists before the runtime is built.
        unsafe { std::env::set_var(NO_PROGRESS_ENV, "1") };
    }

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_filter()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let runtime = tokio::runtime::Runtime::new()?;
    let result = runtime.block_on(async {
        tokio::select! {
            result = cli.execute() => result,
            _ = tokio::signal::ctrl_c() => Err(BurrowError::Interrupted.into()),
        }
    });

    // process::exit skips dropping the runtime, which can block on a pending stdin read
    match result {
        Ok(()) => Ok(()),
        Err(e) => {
            user_friendly_error(e).display();
            std::process::exit(1);
        }
    }
}
