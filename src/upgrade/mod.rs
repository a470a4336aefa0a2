//! Upgrades and outdated-version reporting.
//!
//! Bulk upgrades only touch unaliased installs: an alias (including the
//! `name@tag` form given to pinned side-by-side installs) marks an install the
//! user chose deliberately, so it is reported and left alone.
//!
//! Burrow upgrades itself through the ordinary install path: its package is
//! installed under the temporary alias `burrow-upgrade` and then renamed over
//! `bin/burrow`. Burrow itself never gets an installation record.

use anyhow::{Context as _, Result};
use colored::Colorize;
use std::path::PathBuf;

use crate::config::Context;
use crate::constants::{SELF_NAME, SELF_UPGRADE_ALIAS};
use crate::core::BurrowError;
use crate::host::HostApi;
use crate::installations::{InstallationStore, Upgradable};
use crate::installer::{InstallOptions, InstallOutcome, Installer};
use crate::models::Package;
use crate::utils::fs::move_file;

/// A package with a newer release than what is installed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outdated {
    pub executable_name: String,
    pub latest_version: String,
    pub installed_versions: Vec<String>,
}

/// Upgradable packages, one entry per package.
#[must_use]
pub fn outdated(catalog: &[Package], store: &InstallationStore) -> Vec<Outdated> {
    let mut list: Vec<Outdated> = Vec::new();
    for Upgradable { package, .. } in store.list_upgradable(catalog) {
        if list.iter().any(|o| o.executable_name == package.executable_name) {
            continue;
        }
        let installed_versions = store
            .find_all(&package.executable_name)
            .iter()
            .map(|r| r.version.clone())
            .collect();
        list.push(Outdated {
            executable_name: package.executable_name,
            latest_version: package.latest_version,
            installed_versions,
        });
    }
    list
}

/// The newer burrow release, when the catalog knows of one.
#[must_use]
pub fn self_update_available(catalog: &[Package]) -> Option<String> {
    let current = env!("CARGO_PKG_VERSION");
    catalog
        .iter()
        .find(|p| p.executable_name == SELF_NAME)
        .map(|p| p.latest_version.trim().to_string())
        .filter(|latest| !latest.is_empty() && !latest.to_lowercase().contains(current))
}

/// Print the outdated notice shown by `outdated` and before interactive installs.
pub fn print_outdated(catalog: &[Package], store: &InstallationStore) {
    println!("{}", " Checking for available package updates:".magenta());

    if let Some(latest) = self_update_available(catalog) {
        println!("{}", format!(" There is a new version of burrow available: {latest}").yellow());
        println!("{}", format!("    Your version is: {}", env!("CARGO_PKG_VERSION")).yellow());
        println!("{}", "    run 'burrow upgrade burrow' to install it".yellow());
    }

    let list = outdated(catalog, store);
    if list.is_empty() {
        println!("{}", " No packages need to be upgraded".magenta());
        return;
    }
    for entry in &list {
        println!(
            "{}",
            format!(" {} has a newer version: {}", entry.executable_name, entry.latest_version)
                .yellow()
        );
        println!(
            "{}",
            format!("    Your version is: [{}]", entry.installed_versions.join(", ")).yellow()
        );
    }
    println!("{}", " run 'burrow upgrade' to upgrade all packages".yellow());
}

/// What a bulk upgrade did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpgradeReport {
    /// Aliased installs that were left alone
    pub aliased: Vec<String>,
    /// Requested names with no installation
    pub not_installed: Vec<String>,
    /// Requested names already at the latest version
    pub already_latest: Vec<String>,
    /// Installs performed, in order
    pub upgraded: Vec<InstallOutcome>,
}

/// Upgrade the named packages, or every upgradable one when `names` is empty.
///
/// `catalog` should be freshly loaded so that latest versions are current.
pub async fn upgrade<H: HostApi>(
    ctx: &Context,
    host: &H,
    catalog: &[Package],
    names: &[String],
) -> Result<UpgradeReport> {
    let names: Vec<String> = names.iter().map(|n| n.trim().to_string()).collect();
    if names.len() > 1 && names.iter().any(|n| n.eq_ignore_ascii_case(SELF_NAME)) {
        return Err(BurrowError::InvalidPackageSpec {
            spec: format!(
                "burrow cannot be upgraded together with other packages, given: [{}]",
                names.join(", ")
            ),
        }
        .into());
    }

    let store = InstallationStore::open(&ctx.paths.installations_file())?;
    let mut report = UpgradeReport {
        aliased: store
            .list()
            .iter()
            .filter(|r| r.is_aliased())
            .map(|r| r.real_name.clone())
            .collect(),
        ..UpgradeReport::default()
    };

    let upgradable = store.list_upgradable(catalog);
    let targets: Vec<String> = if names.is_empty() {
        upgradable.iter().map(|u| u.package.executable_name.clone()).collect()
    } else {
        let mut targets = Vec::new();
        for name in names {
            let Some(existing) = store.find(&name) else {
                report.not_installed.push(name);
                continue;
            };
            let current = catalog
                .iter()
                .find(|p| p.executable_name == existing.executable_name)
                .is_some_and(|p| existing.is_current_against(&p.latest_version));
            if current {
                report.already_latest.push(name);
            } else {
                targets.push(name);
            }
        }
        targets
    };

    let mut specs: Vec<String> = Vec::new();
    for entry in &upgradable {
        let executable = &entry.package.executable_name;
        if targets.contains(executable) && !specs.contains(executable) {
            specs.push(executable.clone());
        }
    }
    if specs.is_empty() {
        return Ok(report);
    }

    tracing::info!("Upgrading {}", specs.join(", "));
    let installer = Installer::new(ctx, host);
    report.upgraded = installer.install_many(catalog, &specs, &InstallOptions::default()).await?;
    Ok(report)
}

/// Replace `bin/burrow` with the latest release.
pub async fn self_upgrade<H: HostApi>(ctx: &Context, host: &H, catalog: &[Package]) -> Result<PathBuf> {
    let options = InstallOptions {
        alias: Some(SELF_UPGRADE_ALIAS.to_string()),
        force: true,
        interactive: false,
        allow_self: true,
    };
    Installer::new(ctx, host).install(catalog, SELF_NAME, &options).await?;

    let bin_dir = ctx.paths.bin_dir();
    let staged = bin_dir.join(SELF_UPGRADE_ALIAS);
    let target = bin_dir.join(SELF_NAME);
    move_file(&staged, &target)
        .with_context(|| format!("Failed to replace {}", target.display()))?;
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Paths;
    use crate::constants::SELF_REPOSITORY;
    use crate::models::{InstallationRecord, PackageKind};
    use crate::test_utils::{FakeHost, tar_gz};
    use crate::utils::platform::Platform;
    use tempfile::TempDir;

    fn package(executable: &str, latest: &str) -> Package {
        Package {
            name: executable.to_string(),
            full_name: format!("owner/{executable}"),
            executable_name: executable.to_string(),
            latest_version: latest.to_string(),
            kind: PackageKind::Binary,
            ..Package::default()
        }
    }

    fn record(real_name: &str, executable: &str, alias: &str, version: &str) -> InstallationRecord {
        InstallationRecord {
            timestamp: 1,
            package_full_name: format!("owner/{executable}"),
            executable_name: executable.to_string(),
            alias: alias.to_string(),
            real_name: real_name.to_string(),
            version: version.to_string(),
        }
    }

    fn context(temp: &TempDir) -> Context {
        Context::new(Paths::new(temp.path().join("root")))
            .with_platform(Platform::new("linux", "amd64"))
            .with_search_path(temp.path().join("empty-path"))
    }

    fn seeded_store(ctx: &Context) -> InstallationStore {
        let mut store = InstallationStore::open(&ctx.paths.installations_file()).unwrap();
        store.save(record("tool", "tool", "", "v1.0.0")).unwrap();
        store.save(record("t", "tool", "t", "v0.9.0")).unwrap();
        store.save(record("fresh", "fresh", "", "v3.0.0")).unwrap();
        store
    }

    #[test]
    fn test_outdated_lists_each_package_once() {
        let temp = TempDir::new().unwrap();
        let ctx = context(&temp);
        let store = seeded_store(&ctx);
        let catalog = vec![package("tool", "v2.0.0"), package("fresh", "v3.0.0")];

        let list = outdated(&catalog, &store);
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].executable_name, "tool");
        assert_eq!(list[0].installed_versions, vec!["v1.0.0", "v0.9.0"]);
    }

    #[test]
    fn test_self_update_available() {
        let mut me = package(SELF_NAME, "v999.0.0");
        me.full_name = SELF_REPOSITORY.to_string();
        assert_eq!(self_update_available(&[me.clone()]), Some("v999.0.0".to_string()));

        me.latest_version = format!("v{}", env!("CARGO_PKG_VERSION"));
        assert_eq!(self_update_available(&[me]), None);
        assert_eq!(self_update_available(&[]), None);
    }

    #[tokio::test]
    async fn test_upgrade_all() {
        let temp = TempDir::new().unwrap();
        let ctx = context(&temp);
        seeded_store(&ctx);
        let host = FakeHost::new().with_release("owner/tool", "v2.0.0", &[(
            "tool_linux_amd64.tar.gz",
            tar_gz(&[("tool", b"new")]),
        )]);
        let catalog = vec![package("tool", "v2.0.0"), package("fresh", "v3.0.0")];

        let report = upgrade(&ctx, &host, &catalog, &[]).await.unwrap();
        assert_eq!(report.aliased, vec!["t"]);
        assert_eq!(report.upgraded.len(), 1);

        let store = InstallationStore::open(&ctx.paths.installations_file()).unwrap();
        assert_eq!(store.find("tool").unwrap().version, "v2.0.0");
        assert_eq!(store.find("t").unwrap().version, "v0.9.0");
    }

    #[tokio::test]
    async fn test_upgrade_named() {
        let temp = TempDir::new().unwrap();
        let ctx = context(&temp);
        seeded_store(&ctx);
        let host = FakeHost::new();
        let catalog = vec![package("tool", "v2.0.0"), package("fresh", "v3.0.0")];

        let names = vec!["fresh".to_string(), "ghost".to_string()];
        let report = upgrade(&ctx, &host, &catalog, &names).await.unwrap();
        assert_eq!(report.already_latest, vec!["fresh"]);
        assert_eq!(report.not_installed, vec!["ghost"]);
        assert!(report.upgraded.is_empty());
        assert_eq!(host.total_calls(), 0);

        let names = vec!["burrow".to_string(), "tool".to_string()];
        assert!(upgrade(&ctx, &host, &catalog, &names).await.is_err());
    }

    #[tokio::test]
    async fn test_self_upgrade_replaces_binary_without_record() {
        let temp = TempDir::new().unwrap();
        let ctx = context(&temp);
        let mut me = package(SELF_NAME, "v9.0.0");
        me.full_name = SELF_REPOSITORY.to_string();
        let host = FakeHost::new().with_release(SELF_REPOSITORY, "v9.0.0", &[(
            "burrow_linux_amd64.tar.gz",
            tar_gz(&[("burrow", b"new burrow")]),
        )]);

        let path = self_upgrade(&ctx, &host, &[me]).await.unwrap();
        assert_eq!(path, ctx.paths.bin_dir().join("burrow"));
        assert_eq!(std::fs::read(&path).unwrap(), b"new burrow");
        assert!(!ctx.paths.bin_dir().join(SELF_UPGRADE_ALIAS).exists());

        let store = InstallationStore::open(&ctx.paths.installations_file()).unwrap();
        assert!(store.list().is_empty());
    }
}
