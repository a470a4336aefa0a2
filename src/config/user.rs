//! User preferences stored in `config.yaml`.
//!
//! ```yaml
//! autoUpdate: true
//! notifyOutdatedVersions: true
//! ```
//!
//! Both flags default to `true`. A missing file is created with the defaults
//! the first time it is loaded.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;

const fn default_true() -> bool {
    true
}

/// Preferences that change how commands behave.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserConfig {
    /// Refresh a stale cache automatically before reading it
    #[serde(default = "default_true")]
    pub auto_update: bool,

    /// Print upgradable packages before installing
    #[serde(default = "default_true")]
    pub notify_outdated_versions: bool,
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            auto_update: true,
            notify_outdated_versions: true,
        }
    }
}

impl UserConfig {
    /// Load the configuration, writing the defaults first when the file is missing.
    ///
    /// # Errors
    ///
    /// Fails when the file exists but is not valid YAML, or when the default
    /// file cannot be written.
    pub async fn load_or_init(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load_from(path).await
        } else {
            let config = Self::default();
            config.save_to(path).await?;
            tracing::debug!("Created default user configuration at {}", path.display());
            Ok(config)
        }
    }

    /// Load the configuration from a specific file.
    pub async fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read user config from {}", path.display()))?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse user config from {}", path.display()))
    }

    /// Save the configuration, creating parent directories as needed.
    pub async fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let content = serde_yaml::to_string(self).context("Failed to serialize user config")?;
        fs::write(path, content)
            .await
            .with_context(|| format!("Failed to write user config to {}", path.display()))?;
        Ok(())
    }
}
