//! Install orchestrator.
//!
//! One install walks these stages, logged at debug level as it enters each:
//!
//! ```text
//! Resolving -> ConflictChecking -> VersionSelecting -> Downloading
//!           -> Extracting -> Placing -> Recording -> Done
//! ```
//!
//! Any error aborts the install where it stands. Nothing already placed is
//! rolled back, and a failure in a batch leaves earlier packages installed.
//!
//! Versions are opaque tags. An unaliased package counts as current when the
//! catalog's latest tag contains the installed version, in which case the
//! install is a no-op unless forced.

mod download;

pub use download::{DownloadPlan, fetch_executable, format_size, plan_download};

use anyhow::{Context as _, Result};
use std::fmt;
use std::path::PathBuf;

use crate::config::Context;
use crate::constants::{SELF_NAME, SELF_REPOSITORY};
use crate::core::BurrowError;
use crate::host::HostApi;
use crate::installations::InstallationStore;
use crate::models::{InstallationRecord, Package, Release};
use crate::utils::fs::{
    ensure_dir, make_executable, move_file, remove_dir_all_if_exists, remove_file_if_exists,
};
use crate::utils::platform::find_on_path;
use crate::utils::prompt::{Confirm, TerminalPrompt};

/// Version keyword selecting the newest published release.
pub const LATEST: &str = "latest";

/// Where an install currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallStage {
    Resolving,
    ConflictChecking,
    VersionSelecting,
    Downloading,
    Extracting,
    Placing,
    Recording,
    Done,
}

impl fmt::Display for InstallStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Resolving => "resolving",
            Self::ConflictChecking => "checking conflicts",
            Self::VersionSelecting => "selecting version",
            Self::Downloading => "downloading",
            Self::Extracting => "extracting",
            Self::Placing => "placing",
            Self::Recording => "recording",
            Self::Done => "done",
        };
        f.write_str(name)
    }
}

/// Knobs of a single install.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallOptions {
    /// Install under this name instead of the executable name
    pub alias: Option<String>,
    /// Reinstall even when already current
    pub force: bool,
    /// Ask before downloading a binary asset
    pub interactive: bool,
    /// Allow operating on burrow itself
    pub allow_self: bool,
}

/// Result of a successful install.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallOutcome {
    Installed {
        /// Record describing the placed executable
        record: InstallationRecord,
        /// Where the executable now lives
        path: PathBuf,
        /// False for burrow itself, which is never recorded
        recorded: bool,
        /// Advisory dependencies of the package
        depends_on: Vec<String>,
    },
    /// The installed version is already current
    AlreadyLatest { name: String, version: String },
}

/// Split `name[@version]`, defaulting the version to `latest`.
pub fn parse_package_spec(spec: &str) -> Result<(String, String)> {
    let invalid = || BurrowError::InvalidPackageSpec {
        spec: spec.to_string(),
    };

    let parts: Vec<&str> = spec.split('@').map(str::trim).collect();
    match parts.as_slice() {
        [name] if !name.is_empty() => Ok(((*name).to_string(), LATEST.to_string())),
        [name, version] if !name.is_empty() && !version.is_empty() => {
            Ok(((*name).to_string(), (*version).to_string()))
        }
        _ => Err(invalid().into()),
    }
}

/// Drives installs and uninstalls against one burrow root.
///
/// Interactive installs ask `P` before downloading; the terminal by default.
pub struct Installer<'a, H: HostApi, P: Confirm = TerminalPrompt> {
    ctx: &'a Context,
    host: &'a H,
    prompt: P,
}

impl<'a, H: HostApi> Installer<'a, H> {
    pub const fn new(ctx: &'a Context, host: &'a H) -> Self {
        Self {
            ctx,
            host,
            prompt: TerminalPrompt,
        }
    }

    /// Answer confirmation prompts with `prompt` instead of the terminal.
    pub fn with_prompt<P: Confirm>(self, prompt: P) -> Installer<'a, H, P> {
        Installer {
            ctx: self.ctx,
            host: self.host,
            prompt,
        }
    }
}

impl<H: HostApi, P: Confirm> Installer<'_, H, P> {
    fn enter(stage: &mut InstallStage, next: InstallStage, name: &str) {
        *stage = next;
        tracing::debug!("[{}] {}", name, next);
    }

    /// Install one `name[@version]` from `catalog`.
    pub async fn install(
        &self,
        catalog: &[Package],
        spec: &str,
        options: &InstallOptions,
    ) -> Result<InstallOutcome> {
        let mut stage = InstallStage::Resolving;
        let result = self.run(catalog, spec, options, &mut stage).await;
        if let Err(e) = &result {
            tracing::debug!("[{}] aborted while {}: {:#}", spec, stage, e);
        }
        result
    }

    async fn run(
        &self,
        catalog: &[Package],
        spec: &str,
        options: &InstallOptions,
        stage: &mut InstallStage,
    ) -> Result<InstallOutcome> {
        Self::enter(stage, InstallStage::Resolving, spec);
        let (name, version) = parse_package_spec(spec)?;
        let alias = options.alias.as_deref().map(str::trim).filter(|a| !a.is_empty());

        if !options.allow_self {
            for candidate in std::iter::once(name.as_str()).chain(alias) {
                if candidate.eq_ignore_ascii_case(SELF_NAME) {
                    return Err(BurrowError::ReservedName {
                        name: candidate.to_string(),
                    }
                    .into());
                }
            }
        }

        let mut store = InstallationStore::open(&self.ctx.paths.installations_file())?;

        Self::enter(stage, InstallStage::ConflictChecking, spec);
        if !options.allow_self {
            for candidate in alias.into_iter().chain(std::iter::once(name.as_str())) {
                if let Some(path) = find_on_path(candidate, self.ctx.search_path.as_ref()) {
                    if store.find(candidate).is_none() {
                        return Err(BurrowError::Conflict {
                            name: candidate.to_string(),
                            path: path.display().to_string(),
                        }
                        .into());
                    }
                }
            }
        }

        let package = catalog
            .iter()
            .find(|p| p.executable_name == name)
            .ok_or_else(|| BurrowError::PackageNotFound {
                name: name.clone(),
            })?;

        Self::enter(stage, InstallStage::VersionSelecting, spec);
        if alias.is_none() && !options.force {
            if let Some(existing) = store.find(&name) {
                let current = existing.is_current_against(&package.latest_version)
                    || (version != LATEST && existing.version.eq_ignore_ascii_case(&version));
                if current {
                    return Ok(InstallOutcome::AlreadyLatest {
                        name,
                        version: existing.version.clone(),
                    });
                }
            }
        }

        let releases = self.host.list_releases(&package.full_name).await?;
        let release = select_release(package, &releases, &version)?;
        tracing::debug!("[{}] using release {}", spec, release.tag);

        Self::enter(stage, InstallStage::Downloading, spec);
        let work_dir = self.ctx.paths.staging_dir();
        remove_dir_all_if_exists(&work_dir)?;
        ensure_dir(&work_dir)?;
        let prompt = options.interactive.then_some(&self.prompt);
        let plan = plan_download(package, release, &self.ctx.platform, prompt).await?;

        Self::enter(stage, InstallStage::Extracting, spec);
        let extracted = fetch_executable(self.host, package, release, &plan, &work_dir).await?;

        Self::enter(stage, InstallStage::Placing, spec);
        let mut real_name = alias.unwrap_or(&package.executable_name).to_string();
        if version != LATEST && store.find(&real_name).is_some() {
            real_name = format!("{real_name}@{}", release.tag);
        }
        let bin_dir = self.ctx.paths.bin_dir();
        ensure_dir(&bin_dir)?;
        let destination = bin_dir.join(&real_name);
        remove_file_if_exists(&destination)?;
        move_file(&extracted, &destination)
            .with_context(|| format!("Failed to place {}", destination.display()))?;
        make_executable(&destination)?;

        if !package.depends_on.is_empty() {
            tracing::debug!("[{}] depends on [{}]", spec, package.depends_on.join(", "));
        }

        Self::enter(stage, InstallStage::Recording, spec);
        let record = InstallationRecord {
            timestamp: chrono::Utc::now().timestamp_millis(),
            package_full_name: package.full_name.clone(),
            executable_name: package.executable_name.clone(),
            alias: if real_name == package.executable_name {
                String::new()
            } else {
                real_name.clone()
            },
            real_name,
            version: release.tag.clone(),
        };
        let recorded = package.full_name != SELF_REPOSITORY;
        if recorded {
            store.save(record.clone())?;
        }

        Self::enter(stage, InstallStage::Done, spec);
        Ok(InstallOutcome::Installed {
            record,
            path: destination,
            recorded,
            depends_on: package.depends_on.clone(),
        })
    }

    /// Install several packages one after the other.
    ///
    /// The first failure stops the batch. Its error carries the lists of
    /// packages already installed and of packages left over.
    pub async fn install_many(
        &self,
        catalog: &[Package],
        specs: &[String],
        options: &InstallOptions,
    ) -> Result<Vec<InstallOutcome>> {
        if options.alias.is_some() && specs.len() != 1 {
            return Err(BurrowError::InvalidPackageSpec {
                spec: format!(
                    "only one package can be installed with an alias, given: [{}]",
                    specs.join(", ")
                ),
            }
            .into());
        }

        let specs: Vec<&String> = if specs.len() > 1 {
            specs.iter().filter(|s| !s.eq_ignore_ascii_case(SELF_NAME)).collect()
        } else {
            specs.iter().collect()
        };

        let mut outcomes = Vec::new();
        let mut succeeded: Vec<&str> = Vec::new();
        for spec in &specs {
            match self.install(catalog, spec, options).await {
                Ok(outcome) => {
                    outcomes.push(outcome);
                    succeeded.push(spec.as_str());
                }
                Err(e) if specs.len() == 1 => return Err(e),
                Err(e) => {
                    let leftover: Vec<&str> = specs
                        .iter()
                        .map(|s| s.as_str())
                        .filter(|s| !succeeded.contains(s))
                        .collect();
                    return Err(e.context(format!(
                        "Error while installing {spec}. Installed: [{}]. Left over: [{}]",
                        succeeded.join(", "),
                        leftover.join(", ")
                    )));
                }
            }
        }
        Ok(outcomes)
    }

    /// Remove the executable installed as `name` and its record.
    pub fn uninstall(&self, name: &str) -> Result<InstallationRecord> {
        uninstall(self.ctx, name)
    }
}

/// Remove the executable installed as `name` and its record.
///
/// Only the local root is touched, so no host is needed.
pub fn uninstall(ctx: &Context, name: &str) -> Result<InstallationRecord> {
    let name = name.trim();
    if name.eq_ignore_ascii_case(SELF_NAME) {
        return Err(BurrowError::ReservedName {
            name: name.to_string(),
        }
        .into());
    }

    let mut store = InstallationStore::open(&ctx.paths.installations_file())?;
    let record = store.find(name).cloned().ok_or_else(|| BurrowError::InstallationNotFound {
        name: name.to_string(),
    })?;

    remove_file_if_exists(&ctx.paths.bin_dir().join(&record.real_name))?;
    store.delete(&record)?;
    tracing::debug!("Uninstalled {} ({})", record.real_name, record.package_full_name);
    Ok(record)
}

/// The release `version` refers to: the first one for `latest`, otherwise the
/// one whose tag or name matches, ignoring case.
pub fn select_release<'r>(
    package: &Package,
    releases: &'r [Release],
    version: &str,
) -> Result<&'r Release> {
    if releases.is_empty() {
        return Err(BurrowError::NoReleases {
            package: package.full_name.clone(),
        }
        .into());
    }

    if version == LATEST {
        return Ok(&releases[0]);
    }

    releases.iter().find(|r| r.matches_version(version)).ok_or_else(|| {
        BurrowError::VersionNotFound {
            package: package.full_name.clone(),
            version: version.to_string(),
        }
        .into()
    })
}
