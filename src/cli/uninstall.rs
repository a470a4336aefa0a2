//! `burrow uninstall`

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use super::common::load_context;
use crate::installer::uninstall;

#[derive(Args, Debug)]
pub struct UninstallCommand {
    /// Installed names (executable name or alias)
    #[arg(required = true)]
    pub names: Vec<String>,
}

impl UninstallCommand {
    pub async fn execute(self) -> Result<()> {
        let ctx = load_context().await?;

        for name in &self.names {
            let record = uninstall(&ctx, name)?;
            println!("{} Removed {} {}", "✓".green(), record.real_name.bold(), record.version);
        }
        Ok(())
    }
}
