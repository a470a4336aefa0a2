//! Installation store.
//!
//! Durable record of every executable burrow placed under `bin/`, kept in
//! `installations.yaml`:
//!
//! ```yaml
//! installations:
//!   - timestamp: 1718000000000
//!     packageFullName: owner/tool
//!     executableName: tool
//!     alias: ""
//!     realName: tool
//!     version: v1.2.0
//! ```
//!
//! `realName` is the file name on disk and the unique key: [`InstallationStore::save`]
//! replaces any record with the same `realName`. Every mutation rewrites the
//! whole document. Concurrent burrow processes are not supported.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::models::{InstallationRecord, Package};
use crate::utils::fs::{read_yaml_file, write_yaml_file};

/// On-disk layout of the installation record document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallationDocument {
    #[serde(default)]
    pub installations: Vec<InstallationRecord>,
}

/// An upgradable installation and the catalog entry it should move to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upgradable {
    pub record: InstallationRecord,
    pub package: Package,
}

/// File-backed set of [`InstallationRecord`]s keyed by `real_name`.
#[derive(Debug, Clone)]
pub struct InstallationStore {
    path: PathBuf,
    records: Vec<InstallationRecord>,
}

impl InstallationStore {
    /// Open the store at `path`, creating an empty document on first access.
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            write_yaml_file(path, &InstallationDocument::default())
                .with_context(|| format!("Failed to create {}", path.display()))?;
            return Ok(Self {
                path: path.to_path_buf(),
                records: Vec::new(),
            });
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let records = if content.trim().is_empty() {
            Vec::new()
        } else {
            read_yaml_file::<InstallationDocument>(path)?.installations
        };

        Ok(Self {
            path: path.to_path_buf(),
            records,
        })
    }

    /// Path of the backing document.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The record installed on disk as `real_name`.
    #[must_use]
    pub fn find(&self, real_name: &str) -> Option<&InstallationRecord> {
        self.records.iter().find(|r| r.real_name == real_name)
    }

    /// Every record of the package whose executable is `executable_name`.
    #[must_use]
    pub fn find_all(&self, executable_name: &str) -> Vec<&InstallationRecord> {
        self.records.iter().filter(|r| r.executable_name == executable_name).collect()
    }

    /// All records in insertion order.
    #[must_use]
    pub fn list(&self) -> &[InstallationRecord] {
        &self.records
    }

    /// Insert or replace the record with the same `real_name`, then persist.
    pub fn save(&mut self, record: InstallationRecord) -> Result<()> {
        self.records.retain(|r| r.real_name != record.real_name);
        tracing::debug!(
            "Recording {} {} as {}",
            record.package_full_name,
            record.version,
            record.real_name
        );
        self.records.push(record);
        self.persist()
    }

    /// Remove the record with the same `real_name` as `record`, then persist.
    pub fn delete(&mut self, record: &InstallationRecord) -> Result<()> {
        self.records.retain(|r| r.real_name != record.real_name);
        self.persist()
    }

    /// Unaliased records whose catalog entry has moved past them.
    ///
    /// A record is up to date when
    /// [`is_current_against`](InstallationRecord::is_current_against) the
    /// catalog's latest tag. Records without a catalog entry are skipped.
    #[must_use]
    pub fn list_upgradable(&self, catalog: &[Package]) -> Vec<Upgradable> {
        self.records
            .iter()
            .filter(|r| !r.is_aliased())
            .filter_map(|record| {
                let package = catalog.iter().find(|p| p.full_name == record.package_full_name)?;
                if record.is_current_against(&package.latest_version) {
                    return None;
                }
                Some(Upgradable {
                    record: record.clone(),
                    package: package.clone(),
                })
            })
            .collect()
    }

    fn persist(&self) -> Result<()> {
        let document = InstallationDocument {
            installations: self.records.clone(),
        };
        write_yaml_file(&self.path, &document)
            .with_context(|| format!("Failed to save installations to {}", self.path.display()))
    }
}
