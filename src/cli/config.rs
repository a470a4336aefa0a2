//! `burrow config`

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use super::common::load_context;
use crate::config::UserConfig;

#[derive(Args, Debug)]
pub struct ConfigCommand {
    /// Refresh a stale package cache automatically
    #[arg(long, value_name = "BOOL")]
    pub auto_update: Option<bool>,

    /// Print upgradable packages before installing
    #[arg(long = "notify-outdated", value_name = "BOOL")]
    pub notify_outdated: Option<bool>,
}

impl ConfigCommand {
    pub async fn execute(self) -> Result<()> {
        let ctx = load_context().await?;
        let mut user = ctx.user.clone();

        if self.auto_update.is_none() && self.notify_outdated.is_none() {
            print_config(&user);
            return Ok(());
        }

        if let Some(value) = self.auto_update {
            user.auto_update = value;
        }
        if let Some(value) = self.notify_outdated {
            user.notify_outdated_versions = value;
        }
        user.save_to(&ctx.paths.config_file()).await?;
        println!("{} Configuration saved", "✓".green());
        print_config(&user);
        Ok(())
    }
}

fn print_config(user: &UserConfig) {
    println!(" {:<26}{}", "autoUpdate:".bold(), user.auto_update);
    println!(" {:<26}{}", "notifyOutdatedVersions:".bold(), user.notify_outdated_versions);
}
