//! `burrow repositories`

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use super::common::{load_context, print_empty};
use crate::source::global_remote;

#[derive(Args, Debug)]
pub struct RepositoriesCommand {}

impl RepositoriesCommand {
    pub async fn execute(self) -> Result<()> {
        let ctx = load_context().await?;
        let repositories = &ctx.repositories;

        println!("{}", "Remotes:".bold());
        for remote in &repositories.remotes {
            println!("  {} ({})", remote.url, remote.kind);
        }
        let global = global_remote();
        println!("  {} ({})", global.url.dimmed(), "global".dimmed());

        println!("{}", "Packages:".bold());
        if repositories.packages.is_empty() {
            print_empty(" No private packages");
        }
        for package in &repositories.packages {
            let mut line = format!("  {} {} ({})", package.executable_name.bold(), package.path, package.kind);
            if !package.depends_on.is_empty() {
                line.push_str(&format!(" depends on [{}]", package.depends_on.join(", ")));
            }
            println!("{line}");
        }
        Ok(())
    }
}
