//! `burrow installed`

use anyhow::Result;
use chrono::{Local, TimeZone};
use clap::Args;
use colored::Colorize;

use super::common::{load_context, print_empty};
use crate::installations::InstallationStore;
use crate::models::InstallationRecord;

#[derive(Args, Debug)]
pub struct InstalledCommand {}

impl InstalledCommand {
    pub async fn execute(self) -> Result<()> {
        let ctx = load_context().await?;
        let store = InstallationStore::open(&ctx.paths.installations_file())?;

        let records: Vec<&InstallationRecord> =
            store.list().iter().filter(|r| r.is_visible()).collect();
        if records.is_empty() {
            print_empty("There are no installed packages");
            return Ok(());
        }
        for record in records {
            println!("{}", record_line(record));
        }
        Ok(())
    }
}

fn record_line(record: &InstallationRecord) -> String {
    let mut line = format!(" {} {}", record.real_name.bold(), record.version.cyan());
    if record.is_aliased() {
        line.push_str(&format!(" (alias of {})", record.executable_name));
    }
    line.push_str(&format!(" from {}", record.package_full_name));
    if let Some(when) = Local.timestamp_millis_opt(record.timestamp).single() {
        line.push_str(&format!(", installed {}", when.format("%Y-%m-%d %H:%M")));
    }
    line
}
