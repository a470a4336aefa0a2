//! Package cache.
//!
//! `cache.yaml` holds the whole catalog, sorted by name, as `{packages: [...]}`.
//! It is a read model rebuilt from:
//!
//! - the remotes (configured ones, then the global remote)
//! - the private packages of `repositories.yaml` plus the hardcoded packages
//!   burrow needs to upgrade itself and the host CLI
//! - the installation store (`installedVersions`, `aliases`)
//! - the `PATH` (`conflictPath` for uninstalled packages whose executable
//!   already exists)
//!
//! Freshness comes from the file's modification time alone. A snapshot
//! younger than the context's TTL (30 minutes) is reused unless a refresh is
//! forced.

use anyhow::{Context as _, Result};
use serde::{Deserialize, Serialize};
use std::time::SystemTime;

use crate::config::Context;
use crate::constants::{HOST_CLI, HOST_CLI_REPOSITORY, SELF_NAME, SELF_REPOSITORY};
use crate::host::HostApi;
use crate::installations::InstallationStore;
use crate::metadata::fetch_packages;
use crate::models::{Package, PackageDefinition, PackageKind};
use crate::source::load_definitions;
use crate::utils::fs::{get_modified_time, read_yaml_file, write_yaml_file};
use crate::utils::platform::find_on_path;

/// On-disk layout of the cache snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheSnapshot {
    #[serde(default)]
    pub packages: Vec<Package>,
}

/// Packages that are always in the catalog, whatever the remotes say.
#[must_use]
pub fn hardcoded_definitions() -> Vec<PackageDefinition> {
    vec![
        PackageDefinition::new(SELF_REPOSITORY, SELF_NAME, PackageKind::Binary),
        PackageDefinition::new(HOST_CLI_REPOSITORY, HOST_CLI, PackageKind::Binary),
    ]
}

/// Fill in the derived installation and conflict fields of every package.
pub fn annotate(packages: &mut [Package], store: &InstallationStore, ctx: &Context) {
    for package in packages.iter_mut() {
        let records = store.find_all(&package.executable_name);
        if records.is_empty() {
            package.installed_versions.clear();
            package.aliases.clear();
            package.conflict_path = find_on_path(&package.executable_name, ctx.search_path.as_ref())
                .map(|path| path.display().to_string());
        } else {
            package.installed_versions = records.iter().map(|r| r.version.clone()).collect();
            package.aliases = records
                .iter()
                .filter(|r| r.is_aliased())
                .map(|r| r.alias.clone())
                .collect();
            package.conflict_path = None;
        }
    }
}

/// The catalog snapshot of one burrow root.
pub struct PackageCache<'a, H: HostApi> {
    ctx: &'a Context,
    host: &'a H,
}

impl<'a, H: HostApi> PackageCache<'a, H> {
    pub const fn new(ctx: &'a Context, host: &'a H) -> Self {
        Self {
            ctx,
            host,
        }
    }

    /// Whether the snapshot was written less than one TTL ago.
    pub fn is_fresh(&self) -> Result<bool> {
        let modified = get_modified_time(&self.ctx.paths.cache_file())?;
        let age = SystemTime::now().duration_since(modified).unwrap_or_default();
        Ok(age < self.ctx.cache_ttl)
    }

    /// Rebuild the snapshot when it is stale or `force` is set.
    ///
    /// A missing snapshot is created empty and left for the next call to fill.
    pub async fn update(&self, force: bool) -> Result<()> {
        let cache_file = self.ctx.paths.cache_file();
        if !cache_file.exists() {
            tracing::debug!("Creating empty package cache at {}", cache_file.display());
            return write_yaml_file(&cache_file, &CacheSnapshot::default());
        }

        if !force && self.is_fresh()? {
            tracing::debug!("Package cache is fresh, skipping update");
            return Ok(());
        }

        let definitions: Vec<PackageDefinition> =
            load_definitions(&self.ctx.repositories.remotes, self.host, false)
                .await?
                .into_iter()
                .map(|sourced| sourced.definition)
                .collect();
        let mut packages = fetch_packages(&definitions, self.host).await;

        let mut private = self.ctx.repositories.packages.clone();
        private.extend(hardcoded_definitions());
        packages.extend(fetch_packages(&private, self.host).await);

        let store = InstallationStore::open(&self.ctx.paths.installations_file())?;
        annotate(&mut packages, &store, self.ctx);
        packages.sort_by(|a, b| a.name.cmp(&b.name));

        tracing::info!("Writing {} packages to {}", packages.len(), cache_file.display());
        write_yaml_file(
            &cache_file,
            &CacheSnapshot {
                packages,
            },
        )
        .context("Failed to write package cache")
    }

    /// Read the snapshot without refreshing it.
    ///
    /// A missing or empty snapshot reads as an empty catalog.
    pub fn read(&self) -> Result<Vec<Package>> {
        let cache_file = self.ctx.paths.cache_file();
        if !cache_file.exists() {
            return Ok(Vec::new());
        }
        let content = std::fs::read_to_string(&cache_file)
            .with_context(|| format!("Failed to read {}", cache_file.display()))?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(read_yaml_file::<CacheSnapshot>(&cache_file)?.packages)
    }

    /// Refresh the snapshot when auto-update is on or `force` is set, then read it.
    pub async fn load(&self, force: bool) -> Result<Vec<Package>> {
        if self.ctx.user.auto_update || force {
            self.update(force).await?;
        }
        self.read()
    }

    /// Catalog entry whose executable is `executable_name`.
    pub async fn find(&self, executable_name: &str, force: bool) -> Result<Option<Package>> {
        Ok(self.load(force).await?.into_iter().find(|p| p.executable_name == executable_name))
    }
}
