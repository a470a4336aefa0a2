//! Spinners for long-running operations.
//!
//! Cache rebuilds and downloads can take several seconds, so the CLI shows an
//! [`indicatif`] spinner while they run. Setting `BURROW_NO_PROGRESS` (or
//! passing `--no-progress`) hides it, which keeps output clean in scripts.
//!
//! [`with_spinner`] also watches for Ctrl-C: an interrupt stops the spinner
//! and resolves to [`BurrowError::Interrupted`], dropping the in-flight future
//! without any partial cleanup. The binary turns that into exit status 1.
//!
//! # Examples
//!
//! ```rust,no_run
//! use burrow_cli::utils::progress::with_spinner;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let value = with_spinner("Updating package list", async { Ok(42) }).await?;
//! # Ok(())
//! # }
//! ```

use anyhow::Result;
use indicatif::{ProgressBar as IndicatifBar, ProgressStyle};
use std::future::Future;
use std::time::Duration;

use crate::constants::NO_PROGRESS_ENV;
use crate::core::BurrowError;

fn is_progress_disabled() -> bool {
    std::env::var(NO_PROGRESS_ENV).is_ok()
}

fn spinner_style() -> ProgressStyle {
    ProgressStyle::default_spinner()
        .template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
}

/// A spinner that hides itself when progress output is disabled.
#[derive(Clone)]
pub struct Spinner {
    inner: IndicatifBar,
}

impl Spinner {
    /// Start a spinner with a message.
    pub fn new(msg: impl Into<String>) -> Self {
        let bar = if is_progress_disabled() {
            IndicatifBar::hidden()
        } else {
            let bar = IndicatifBar::new_spinner();
            bar.set_style(spinner_style());
            bar.enable_steady_tick(Duration::from_millis(100));
            bar
        };
        bar.set_message(msg.into());
        Self {
            inner: bar,
        }
    }

    /// Replace the message.
    pub fn set_message(&self, msg: impl Into<String>) {
        self.inner.set_message(msg.into());
    }

    /// Stop and leave a final message.
    pub fn finish_with_message(&self, msg: impl Into<String>) {
        self.inner.finish_with_message(msg.into());
    }

    /// Stop and erase the spinner line.
    pub fn finish_and_clear(&self) {
        self.inner.finish_and_clear();
    }
}

/// Run `future` behind a spinner, aborting on Ctrl-C.
///
/// # Errors
///
/// Returns the future's own error, or [`BurrowError::Interrupted`] when an
/// interrupt signal arrives first.
pub async fn with_spinner<F, T>(msg: impl Into<String>, future: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    let spinner = Spinner::new(msg);

    let result = tokio::select! {
        result = future => result,
        _ = tokio::signal::ctrl_c() => {
            spinner.finish_and_clear();
            return Err(BurrowError::Interrupted.into());
        }
    };

    spinner.finish_and_clear();
    result
}
