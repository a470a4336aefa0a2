//! Configuration and the per-invocation [`Context`].
//!
//! Everything a command needs to know about its environment is gathered once
//! at startup into a [`Context`] and passed by reference to every component:
//!
//! - [`Paths`]: the root directory and the well-known files inside it
//! - [`UserConfig`]: preferences from `config.yaml`
//! - [`RepositoriesConfig`]: remotes and private packages from `repositories.yaml`
//! - the host [`Platform`], an optional command search path override and the
//!   cache TTL
//!
//! The context is immutable for the duration of a command. Commands that edit
//! configuration write the file and exit; the next invocation sees the change.
//!
//! # Root directory layout
//!
//! ```text
//! ~/.burrow/                  (or $BURROW_HOME)
//! ├── bin/                    installed executables
//! ├── staging/                downloads and extraction
//! ├── cache.yaml              cache snapshot
//! ├── installations.yaml      installation records
//! ├── config.yaml             user preferences
//! └── repositories.yaml       remotes and private packages
//! ```

pub mod repositories;
pub mod user;

pub use repositories::RepositoriesConfig;
pub use user::UserConfig;

use anyhow::Result;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::constants::{
    BIN_DIR_NAME, CACHE_FILE_NAME, CACHE_TTL, CONFIG_FILE_NAME, HOME_ENV,
    INSTALLATIONS_FILE_NAME, REPOSITORIES_FILE_NAME, ROOT_DIR_NAME, STAGING_DIR_NAME,
};
use crate::utils::platform::{Platform, get_home_dir};

/// Locations of every file burrow reads or writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paths {
    root: PathBuf,
}

impl Paths {
    /// Use `root` as the burrow root directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
        }
    }

    /// `$BURROW_HOME` when set, otherwise `~/.burrow`.
    pub fn from_env() -> Result<Self> {
        if let Some(root) = std::env::var_os(HOME_ENV) {
            if !root.is_empty() {
                return Ok(Self::new(PathBuf::from(root)));
            }
        }
        Ok(Self::new(get_home_dir()?.join(ROOT_DIR_NAME)))
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn bin_dir(&self) -> PathBuf {
        self.root.join(BIN_DIR_NAME)
    }

    #[must_use]
    pub fn staging_dir(&self) -> PathBuf {
        self.root.join(STAGING_DIR_NAME)
    }

    #[must_use]
    pub fn cache_file(&self) -> PathBuf {
        self.root.join(CACHE_FILE_NAME)
    }

    #[must_use]
    pub fn installations_file(&self) -> PathBuf {
        self.root.join(INSTALLATIONS_FILE_NAME)
    }

    #[must_use]
    pub fn config_file(&self) -> PathBuf {
        self.root.join(CONFIG_FILE_NAME)
    }

    #[must_use]
    pub fn repositories_file(&self) -> PathBuf {
        self.root.join(REPOSITORIES_FILE_NAME)
    }
}

/// Immutable environment of one command invocation.
#[derive(Debug, Clone)]
pub struct Context {
    pub paths: Paths,
    pub user: UserConfig,
    pub repositories: RepositoriesConfig,
    pub platform: Platform,
    /// Overrides `PATH` for conflict probes when set
    pub search_path: Option<OsString>,
    /// How long a cache snapshot stays fresh
    pub cache_ttl: Duration,
}

impl Context {
    /// A context with default configuration for the current platform.
    ///
    /// Nothing is read from disk; use [`Context::load`] for that.
    #[must_use]
    pub fn new(paths: Paths) -> Self {
        Self {
            paths,
            user: UserConfig::default(),
            repositories: RepositoriesConfig::default(),
            platform: Platform::current(),
            search_path: None,
            cache_ttl: CACHE_TTL,
        }
    }

    /// Read (or bootstrap) both configuration files under `paths`.
    pub async fn load(paths: Paths) -> Result<Self> {
        let user = UserConfig::load_or_init(&paths.config_file()).await?;
        let repositories = RepositoriesConfig::load_or_init(&paths.repositories_file()).await?;
        tracing::debug!(
            "Loaded configuration from {} ({} remotes, {} private packages)",
            paths.root().display(),
            repositories.remotes.len(),
            repositories.packages.len()
        );

        Ok(Self {
            user,
            repositories,
            ..Self::new(paths)
        })
    }

    #[must_use]
    pub fn with_user_config(mut self, user: UserConfig) -> Self {
        self.user = user;
        self
    }

    #[must_use]
    pub fn with_repositories(mut self, repositories: RepositoriesConfig) -> Self {
        self.repositories = repositories;
        self
    }

    #[must_use]
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    #[must_use]
    pub fn with_search_path(mut self, search_path: impl Into<OsString>) -> Self {
        self.search_path = Some(search_path.into());
        self
    }

    #[must_use]
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    #[test]
    fn test_paths_layout() {
        let paths = Paths::new("/opt/burrow");
        assert_eq!(paths.bin_dir(), PathBuf::from("/opt/burrow/bin"));
        assert_eq!(paths.cache_file(), PathBuf::from("/opt/burrow/cache.yaml"));
        assert_eq!(paths.installations_file(), PathBuf::from("/opt/burrow/installations.yaml"));
        assert_eq!(paths.staging_dir(), PathBuf::from("/opt/burrow/staging"));
    }

    #[test]
    #[serial]
    fn test_paths_from_env_prefers_burrow_home() {
        let temp = TempDir::new().unwrap();
        let previous = std::env::var_os(HOME_ENV);

        // SAFETY: serialized with every other env-mutating test.
        unsafe { std::env::set_var(HOME_ENV, temp.path()) };
        assert_eq!(Paths::from_env().unwrap().root(), temp.path());

        unsafe { std::env::set_var(HOME_ENV, "") };
        assert!(Paths::from_env().unwrap().root().ends_with(ROOT_DIR_NAME));

        match previous {
            Some(value) => unsafe { std::env::set_var(HOME_ENV, value) },
            None => unsafe { std::env::remove_var(HOME_ENV) },
        }
    }

    #[tokio::test]
    async fn test_load_bootstraps_config_files() {
        let temp = TempDir::new().unwrap();
        let paths = Paths::new(temp.path());

        let ctx = Context::load(paths.clone()).await.unwrap();
        assert!(ctx.user.auto_update);
        assert!(ctx.repositories.remotes.is_empty());
        assert!(paths.config_file().exists());
        assert!(paths.repositories_file().exists());
        assert_eq!(ctx.cache_ttl, CACHE_TTL);
    }
}
