//! `burrow update`

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use super::common::load_context;
use crate::cache::PackageCache;
use crate::host::GhClient;
use crate::utils::progress::with_spinner;

#[derive(Args, Debug)]
pub struct UpdateCommand {}

impl UpdateCommand {
    pub async fn execute(self) -> Result<()> {
        let ctx = load_context().await?;
        let host = GhClient::new()?;
        let cache = PackageCache::new(&ctx, &host);

        // The first update of a fresh root only creates the snapshot file.
        if !ctx.paths.cache_file().exists() {
            cache.update(false).await?;
        }
        with_spinner("Updating package list", cache.update(true)).await?;

        let count = cache.read()?.iter().filter(|p| p.is_visible()).count();
        println!("{} Package list updated ({} packages)", "✓".green(), count);
        Ok(())
    }
}
