//! The user's declared remotes and private packages (`repositories.yaml`).
//!
//! ```yaml
//! remotes:
//!   - url: owner/catalog/contents/packages.yaml
//!     type: github
//!   - url: https://example.com/packages.yaml
//!     type: open
//! packages:
//!   - path: owner/tool
//!     executableName: tool
//!     type: binary
//! ```
//!
//! `remotes` feed the remote catalog loader. `packages` form the user's
//! private remote and are always fetched alongside the hardcoded packages.

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;

use crate::models::{PackageDefinition, PackageKind, Remote, RemoteKind};

/// Contents of `repositories.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoriesConfig {
    /// Remotes in declaration order
    #[serde(default)]
    pub remotes: Vec<Remote>,

    /// Locally declared package definitions
    #[serde(default)]
    pub packages: Vec<PackageDefinition>,
}

impl RepositoriesConfig {
    /// Load the file, writing an empty document first when it is missing.
    pub async fn load_or_init(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load_from(path).await
        } else {
            let config = Self::default();
            config.save_to(path).await?;
            tracing::debug!("Created empty repositories configuration at {}", path.display());
            Ok(config)
        }
    }

    /// Load the file from a specific path.
    pub async fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).await.with_context(|| {
            format!("Failed to read repositories config from {}", path.display())
        })?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        serde_yaml::from_str(&content).with_context(|| {
            format!("Failed to parse repositories config from {}", path.display())
        })
    }

    /// Save the file, creating parent directories as needed.
    pub async fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let content =
            serde_yaml::to_string(self).context("Failed to serialize repositories config")?;
        fs::write(path, content).await.with_context(|| {
            format!("Failed to write repositories config to {}", path.display())
        })?;
        Ok(())
    }

    /// Declare a new remote.
    ///
    /// # Errors
    ///
    /// Fails when a remote with the same URL is already declared.
    pub fn add_remote(&mut self, url: &str, kind: RemoteKind) -> Result<()> {
        if url.trim().is_empty() {
            bail!("The remote URL can't be empty");
        }
        if self.remotes.iter().any(|r| r.url == url) {
            bail!("The remote with the url '{url}' already exists");
        }

        self.remotes.push(Remote::new(url, kind));
        Ok(())
    }

    /// Declare a new private package.
    ///
    /// # Errors
    ///
    /// Fails when a package with the same repository path is already declared.
    pub fn add_package(
        &mut self,
        path: &str,
        executable_name: &str,
        kind: PackageKind,
        depends_on: Vec<String>,
    ) -> Result<()> {
        if path.trim().is_empty() || executable_name.trim().is_empty() {
            bail!("Both the repository path and the executable name are required");
        }
        if self.packages.iter().any(|p| p.path.eq_ignore_ascii_case(path)) {
            bail!("The package with the path '{path}' already exists");
        }

        let mut definition = PackageDefinition::new(path, executable_name, kind);
        definition.depends_on = depends_on;
        self.packages.push(definition);
        Ok(())
    }
}
