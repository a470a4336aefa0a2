//! `burrow upgrade`

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use super::common::{load_catalog, load_context, print_empty};
use super::install::print_outcomes;
use crate::constants::SELF_NAME;
use crate::host::GhClient;
use crate::installations::InstallationStore;
use crate::upgrade::{self_upgrade, upgrade};

#[derive(Args, Debug)]
pub struct UpgradeCommand {
    /// Packages to upgrade; all upgradable packages when empty
    pub names: Vec<String>,
}

impl UpgradeCommand {
    pub async fn execute(self) -> Result<()> {
        let ctx = load_context().await?;
        let host = GhClient::new()?;

        if let [name] = self.names.as_slice() {
            if name.trim().eq_ignore_ascii_case(SELF_NAME) {
                let catalog = load_catalog(&ctx, &host, true).await?;
                let path = self_upgrade(&ctx, &host, &catalog).await?;
                println!("{} burrow upgraded at {}", "✓".green(), path.display());
                return Ok(());
            }
        }

        let store = InstallationStore::open(&ctx.paths.installations_file())?;
        if store.list().is_empty() {
            print_empty("There are no installed packages");
            return Ok(());
        }

        let catalog = load_catalog(&ctx, &host, true).await?;
        let report = upgrade(&ctx, &host, &catalog, &self.names).await?;

        if !report.aliased.is_empty() {
            println!(
                "{}",
                format!(
                    " Skipping aliased installs, reinstall them to upgrade: [{}]",
                    report.aliased.join(", ")
                )
                .yellow()
            );
        }
        for name in &report.not_installed {
            println!("{}", format!(" {name} is not installed").yellow());
        }
        for name in &report.already_latest {
            println!(" {} is already at the latest version", name.bold());
        }
        if report.upgraded.is_empty() {
            print_empty("No packages need to be upgraded");
        } else {
            print_outcomes(&report.upgraded);
        }
        Ok(())
    }
}
