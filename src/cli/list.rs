//! `burrow list`

use anyhow::Result;
use clap::Args;

use super::common::{load_catalog, load_context, package_line, print_empty, visible};
use crate::host::GhClient;
use crate::installations::InstallationStore;

#[derive(Args, Debug)]
pub struct ListCommand {
    /// Only show installed packages with a newer release
    #[arg(short, long)]
    pub upgradable: bool,
}

impl ListCommand {
    pub async fn execute(self) -> Result<()> {
        let ctx = load_context().await?;
        let host = GhClient::new()?;
        let catalog = load_catalog(&ctx, &host, false).await?;

        let lines: Vec<String> = if self.upgradable {
            let store = InstallationStore::open(&ctx.paths.installations_file())?;
            let mut names: Vec<String> = Vec::new();
            for entry in store.list_upgradable(&catalog) {
                if entry.package.is_visible() && !names.contains(&entry.package.executable_name) {
                    names.push(entry.package.executable_name);
                }
            }
            visible(&catalog)
                .filter(|p| names.contains(&p.executable_name))
                .map(package_line)
                .collect()
        } else {
            visible(&catalog).map(package_line).collect()
        };

        if lines.is_empty() {
            print_empty(if self.upgradable {
                "No packages need to be upgraded"
            } else {
                "The package list is empty, run 'burrow update' to refresh it"
            });
        }
        for line in lines {
            println!("{line}");
        }
        Ok(())
    }
}
