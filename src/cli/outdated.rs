//! `burrow outdated`

use anyhow::Result;
use clap::Args;

use super::common::{load_catalog, load_context};
use crate::host::GhClient;
use crate::installations::InstallationStore;
use crate::upgrade::print_outdated;

#[derive(Args, Debug)]
pub struct OutdatedCommand {}

impl OutdatedCommand {
    pub async fn execute(self) -> Result<()> {
        let ctx = load_context().await?;
        let host = GhClient::new()?;
        let catalog = load_catalog(&ctx, &host, false).await?;
        let store = InstallationStore::open(&ctx.paths.installations_file())?;
        print_outdated(&catalog, &store);
        Ok(())
    }
}
