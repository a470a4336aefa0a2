//! `burrow add remote|package`
//!
//! Both subcommands edit `repositories.yaml`. The new entry is picked up by
//! the next cache refresh, so `burrow update` makes it visible right away.

use anyhow::{Result, bail};
use clap::{Args, Subcommand};
use colored::Colorize;

use super::common::load_context;
use crate::models::{PackageKind, RemoteKind};

#[derive(Args, Debug)]
pub struct AddCommand {
    #[command(subcommand)]
    command: AddSubcommand,
}

#[derive(Subcommand, Debug)]
enum AddSubcommand {
    /// Add a remote package list
    Remote {
        /// URL of the list (a GitHub contents API URL for `github` remotes)
        url: String,

        /// `github` or `open`
        #[arg(short = 't', long = "type", default_value = "open")]
        kind: String,
    },

    /// Add a private package
    Package {
        /// Repository path, `owner/repo`
        path: String,

        /// Name of the installed executable
        executable: String,

        /// `binary` or `script`
        #[arg(short = 't', long = "type", default_value = "binary")]
        kind: String,

        /// Advisory dependencies
        #[arg(long, value_delimiter = ',')]
        depends_on: Vec<String>,
    },
}

impl AddCommand {
    pub async fn execute(self) -> Result<()> {
        let ctx = load_context().await?;
        let mut repositories = ctx.repositories.clone();

        match self.command {
            AddSubcommand::Remote {
                url,
                kind,
            } => {
                let Some(kind) = RemoteKind::parse(&kind) else {
                    bail!("Unknown remote type '{kind}', expected 'github' or 'open'");
                };
                repositories.add_remote(url.trim(), kind)?;
                repositories.save_to(&ctx.paths.repositories_file()).await?;
                println!("{} Added remote {}", "✓".green(), url.trim().bold());
            }
            AddSubcommand::Package {
                path,
                executable,
                kind,
                depends_on,
            } => {
                let Some(kind) = PackageKind::parse(&kind) else {
                    bail!("Unknown package type '{kind}', expected 'binary' or 'script'");
                };
                let depends_on = depends_on
                    .into_iter()
                    .map(|d| d.trim().to_string())
                    .filter(|d| !d.is_empty())
                    .collect();
                repositories.add_package(path.trim(), executable.trim(), kind, depends_on)?;
                repositories.save_to(&ctx.paths.repositories_file()).await?;
                println!("{} Added package {} ({})", "✓".green(), executable.trim().bold(), path.trim());
            }
        }
        Ok(())
    }
}
