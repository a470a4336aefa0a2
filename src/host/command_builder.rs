//! Fluent builder for `gh` CLI invocations.
//!
//! Every host API call that goes through the GitHub CLI is built here so that
//! logging, output capture and error mapping stay consistent.
//!
//! ```rust,no_run
//! use burrow_cli::host::command_builder::GhCommand;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let tag = GhCommand::new()
//!     .args(["api", "repos/cli/cli/releases/latest", "--jq", ".tag_name"])
//!     .with_context("latest tag")
//!     .execute_stdout()
//!     .await?;
//! # Ok(())
//! # }
//! ```

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;

use crate::constants::HOST_CLI;
use crate::core::BurrowError;

/// Builder for one `gh` subprocess.
///
/// Subprocess calls run without a timeout unless one is set explicitly.
pub struct GhCommand {
    args: Vec<String>,
    current_dir: Option<PathBuf>,
    timeout_duration: Option<Duration>,
    context: Option<String>,
}

impl Default for GhCommand {
    fn default() -> Self {
        Self {
            args: Vec::new(),
            current_dir: None,
            timeout_duration: None,
            context: None,
        }
    }
}

/// Captured output of a successful command.
#[derive(Debug, Clone)]
pub struct GhCommandOutput {
    pub stdout: String,
    pub stderr: String,
}

impl GhCommand {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Run the command inside `dir` (downloads land there).
    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.current_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    pub const fn with_timeout(mut self, duration: Option<Duration>) -> Self {
        self.timeout_duration = duration;
        self
    }

    /// Label used in log lines, usually the repository being queried.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Run the command and capture its output.
    ///
    /// # Errors
    ///
    /// - [`BurrowError::HostCliNotFound`] when `gh` cannot be spawned
    /// - [`BurrowError::HostCommand`] on timeout or non-zero exit, carrying stderr
    pub async fn execute(self) -> Result<GhCommandOutput> {
        let start = std::time::Instant::now();
        let mut cmd = Command::new(HOST_CLI);
        cmd.args(&self.args);
        if let Some(ref dir) = self.current_dir {
            cmd.current_dir(dir);
        }
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        cmd.stdin(Stdio::null());

        let label = self.context.as_deref().unwrap_or("gh");
        tracing::debug!(target: "host", "({}) Executing command: gh {}", label, self.args.join(" "));

        let output_future = cmd.output();
        let output = match self.timeout_duration {
            Some(duration) => match timeout(duration, output_future).await {
                Ok(result) => result,
                Err(_) => {
                    tracing::warn!(
                        target: "host",
                        "Command timed out after {} seconds: gh {}",
                        duration.as_secs(),
                        self.args.join(" ")
                    );
                    return Err(BurrowError::HostCommand {
                        operation: self.operation(),
                        stderr: format!("timed out after {} seconds", duration.as_secs()),
                    }
                    .into());
                }
            },
            None => output_future.await,
        };

        let output = match output {
            Ok(output) => output,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(BurrowError::HostCliNotFound.into());
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to execute gh {}", self.args.join(" ")));
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        if !output.status.success() {
            tracing::debug!(
                target: "host",
                "({}) Command failed with exit code: {:?}",
                label,
                output.status.code()
            );
            if !stderr.is_empty() {
                tracing::debug!(target: "host", "({}) Error: {}", label, stderr.trim());
            }

            return Err(BurrowError::HostCommand {
                operation: self.operation(),
                stderr: if stderr.is_empty() {
                    stdout
                } else {
                    stderr
                },
            }
            .into());
        }

        tracing::trace!(
            target: "host",
            "({}) Command completed in {:.2}s",
            label,
            start.elapsed().as_secs_f64()
        );

        Ok(GhCommandOutput {
            stdout,
            stderr,
        })
    }

    /// Run the command and return its trimmed stdout.
    pub async fn execute_stdout(self) -> Result<String> {
        let output = self.execute().await?;
        Ok(output.stdout.trim().to_string())
    }

    /// Run the command, discarding output.
    pub async fn execute_success(self) -> Result<()> {
        self.execute().await?;
        Ok(())
    }

    fn operation(&self) -> String {
        self.args.iter().take(2).cloned().collect::<Vec<_>>().join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_collects_args() {
        let cmd = GhCommand::new()
            .arg("release")
            .args(["download", "--repo", "owner/tool"])
            .with_context("owner/tool");
        assert_eq!(cmd.args, vec!["release", "download", "--repo", "owner/tool"]);
        assert_eq!(cmd.operation(), "release download");
        assert!(cmd.timeout_duration.is_none());
    }
}
