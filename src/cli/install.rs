//! `burrow install`

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use super::common::{load_catalog, load_context};
use crate::host::GhClient;
use crate::installations::InstallationStore;
use crate::installer::{InstallOptions, InstallOutcome, Installer};
use crate::upgrade::print_outdated;

#[derive(Args, Debug)]
pub struct InstallCommand {
    /// Packages to install, as `name` or `name@version`
    #[arg(required = true)]
    pub packages: Vec<String>,

    /// Install under a different executable name (single package only)
    #[arg(short, long)]
    pub alias: Option<String>,

    /// Reinstall even when the latest version is already installed
    #[arg(short, long)]
    pub force: bool,

    /// Do not ask for confirmation before downloading
    #[arg(short, long)]
    pub yes: bool,
}

impl InstallCommand {
    pub async fn execute(self) -> Result<()> {
        let ctx = load_context().await?;
        let host = GhClient::new()?;
        let catalog = load_catalog(&ctx, &host, false).await?;

        let interactive = !self.yes;
        if interactive && ctx.user.notify_outdated_versions {
            let store = InstallationStore::open(&ctx.paths.installations_file())?;
            print_outdated(&catalog, &store);
        }

        let options = InstallOptions {
            alias: self.alias,
            force: self.force,
            interactive,
            allow_self: false,
        };
        let outcomes =
            Installer::new(&ctx, &host).install_many(&catalog, &self.packages, &options).await?;
        print_outcomes(&outcomes);
        Ok(())
    }
}

/// The reminder printed after installing a package with dependencies.
fn dependency_notice(executable: &str, depends_on: &[String]) -> Option<String> {
    if depends_on.is_empty() {
        return None;
    }
    Some(format!(
        " {executable} depends on [{}], make sure those are installed",
        depends_on.join(", ")
    ))
}

pub(super) fn print_outcomes(outcomes: &[InstallOutcome]) {
    for outcome in outcomes {
        match outcome {
            InstallOutcome::Installed {
                record,
                path,
                depends_on,
                ..
            } => {
                println!(
                    "{} {} {} to {}",
                    "✓".green(),
                    record.real_name.bold(),
                    record.version.cyan(),
                    path.display()
                );
                if let Some(notice) = dependency_notice(&record.executable_name, depends_on) {
                    println!("{}", notice.yellow());
                }
            }
            InstallOutcome::AlreadyLatest {
                name,
                version,
            } => {
                println!(
                    " {} is already at the latest version ({}). Use --force to reinstall it",
                    name.bold(),
                    version
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dependency_notice() {
        assert_eq!(dependency_notice("deploy", &[]), None);
        assert_eq!(
            dependency_notice("deploy", &["jq".to_string(), "bash".to_string()]).as_deref(),
            Some(" deploy depends on [jq, bash], make sure those are installed")
        );
    }
}
