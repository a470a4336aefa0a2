//! `burrow doctor`
//!
//! Runs a handful of environment checks and prints one line per check. The
//! command fails when any check fails so that scripts can rely on its status.

use anyhow::{Result, bail};
use clap::Args;
use colored::Colorize;
use std::path::Path;
use std::time::Duration;

use super::common::load_context;
use crate::config::Context;
use crate::constants::HOST_CLI;
use crate::host::command_builder::GhCommand;
use crate::utils::fs::{atomic_write, remove_file_if_exists};

#[derive(Args, Debug)]
pub struct DoctorCommand {}

/// Outcome of one check.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Check {
    name: &'static str,
    passed: bool,
    detail: String,
}

impl Check {
    fn pass(name: &'static str, detail: impl Into<String>) -> Self {
        Self {
            name,
            passed: true,
            detail: detail.into(),
        }
    }

    fn fail(name: &'static str, detail: impl Into<String>) -> Self {
        Self {
            name,
            passed: false,
            detail: detail.into(),
        }
    }
}

impl DoctorCommand {
    pub async fn execute(self) -> Result<()> {
        let ctx = load_context().await?;

        let mut checks = static_checks(&ctx);
        if checks.iter().any(|c| c.name == "gh" && c.passed) {
            checks.push(auth_check().await);
        }

        for check in &checks {
            let mark = if check.passed {
                "✓".green()
            } else {
                "✗".red()
            };
            println!("{} {:<22}{}", mark, check.name, check.detail);
        }

        let failed = checks.iter().filter(|c| !c.passed).count();
        if failed > 0 {
            bail!("{failed} check(s) failed");
        }
        Ok(())
    }
}

fn static_checks(ctx: &Context) -> Vec<Check> {
    vec![
        Check::pass("autoUpdate", ctx.user.auto_update.to_string()),
        Check::pass("notifyOutdatedVersions", ctx.user.notify_outdated_versions.to_string()),
        Check::pass("platform", ctx.platform.to_string()),
        gh_check(),
        writable_check(ctx.paths.root()),
    ]
}

fn gh_check() -> Check {
    match which::which(HOST_CLI) {
        Ok(path) => Check::pass("gh", path.display().to_string()),
        Err(_) => Check::fail("gh", "not found in PATH, see https://cli.github.com/"),
    }
}

fn writable_check(root: &Path) -> Check {
    let probe = root.join(".doctor-probe");
    let result = atomic_write(&probe, b"ok").and_then(|()| remove_file_if_exists(&probe));
    match result {
        Ok(()) => Check::pass("root directory", root.display().to_string()),
        Err(e) => Check::fail("root directory", format!("{} is not writable: {e}", root.display())),
    }
}

async fn auth_check() -> Check {
    let result = GhCommand::new()
        .args(["auth", "status"])
        .with_context("auth")
        .with_timeout(Some(Duration::from_secs(10)))
        .execute_success()
        .await;
    match result {
        Ok(()) => Check::pass("gh auth", "logged in"),
        Err(_) => Check::fail("gh auth", "not logged in, run 'gh auth login'"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Paths;
    use tempfile::TempDir;

    #[test]
    fn test_writable_root_passes() {
        let temp = TempDir::new().unwrap();
        let check = writable_check(temp.path());
        assert!(check.passed);
        assert!(!temp.path().join(".doctor-probe").exists());
    }

    #[test]
    fn test_static_checks_report_configuration() {
        let temp = TempDir::new().unwrap();
        let ctx = Context::new(Paths::new(temp.path()));
        let checks = static_checks(&ctx);
        let auto_update = checks.iter().find(|c| c.name == "autoUpdate").unwrap();
        assert_eq!(auto_update.detail, "true");
        assert!(checks.iter().any(|c| c.name == "platform" && c.passed));
    }
}
