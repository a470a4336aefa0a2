//! Test utilities for burrow
//!
//! [`FakeHost`] is an in-memory [`HostApi`] with canned repositories, releases
//! and remote documents. It counts the calls it receives so tests can assert
//! that a fresh cache or a no-op install never reaches the network.
//! [`ScriptedPrompt`] stands in for the user at confirmation prompts.
//!
//! # Example
//!
//! ```rust,no_run
//! use burrow_cli::test_utils::{FakeHost, tar_gz};
//!
//! let host = FakeHost::new()
//!     .with_repository("owner/tool", "v1.2.0")
//!     .with_release("owner/tool", "v1.2.0", &[(
//!         "tool_linux_amd64.tar.gz",
//!         tar_gz(&[("tool", b"binary")]),
//!     )]);
//! assert_eq!(host.describe_calls(), 0);
//! ```

use anyhow::{Result, anyhow};
use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Once;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::Level;
use tracing_subscriber::EnvFilter;

use crate::core::BurrowError;
use crate::host::{HostApi, Language, RepositoryInfo};
use crate::models::{Asset, Release};
use crate::utils::prompt::Confirm;

static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests, once per process.
///
/// Uses `level` when given, otherwise `RUST_LOG`. Without either nothing is
/// logged.
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .try_init();
    });
}

/// A gzipped tarball holding `files`, every entry mode `0755`.
#[must_use]
pub fn tar_gz(files: &[(&str, &[u8])]) -> Vec<u8> {
    let encoder = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
    let mut builder = tar::Builder::new(encoder);
    for (name, content) in files {
        let mut header = tar::Header::new_gnu();
        header.set_size(content.len() as u64);
        header.set_mode(0o755);
        header.set_cksum();
        builder.append_data(&mut header, name, *content).expect("append tar entry");
    }
    builder.into_inner().and_then(|gz| gz.finish()).expect("finish tarball")
}

/// A zip archive holding `files`.
#[must_use]
pub fn zip(files: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
    for (name, content) in files {
        writer
            .start_file(*name, zip::write::SimpleFileOptions::default())
            .expect("start zip entry");
        writer.write_all(content).expect("write zip entry");
    }
    writer.finish().expect("finish zip").into_inner()
}

/// In-memory [`HostApi`].
#[derive(Debug, Default)]
pub struct FakeHost {
    repositories: HashMap<String, RepositoryInfo>,
    latest: HashMap<String, String>,
    releases: HashMap<String, Vec<Release>>,
    asset_bytes: HashMap<(String, String, String), Vec<u8>>,
    source_archives: HashMap<(String, String), (String, Vec<u8>)>,
    content_urls: HashMap<String, String>,
    urls: HashMap<String, Vec<u8>>,
    describe_calls: AtomicUsize,
    latest_calls: AtomicUsize,
    release_calls: AtomicUsize,
    download_calls: AtomicUsize,
    fetch_calls: AtomicUsize,
}

impl FakeHost {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A repository whose latest release is `latest_tag`.
    #[must_use]
    pub fn with_repository(mut self, full_name: &str, latest_tag: &str) -> Self {
        self = self.with_repository_without_releases(full_name);
        self.latest.insert(full_name.to_string(), latest_tag.to_string());
        self
    }

    /// A repository that exists but has never published a release.
    #[must_use]
    pub fn with_repository_without_releases(mut self, full_name: &str) -> Self {
        let name = full_name.rsplit('/').next().unwrap_or(full_name).to_string();
        self.repositories.insert(
            full_name.to_string(),
            RepositoryInfo {
                description: Some(format!("The {name} tool")),
                updated_at: "2024-01-01T00:00:00Z".to_string(),
                url: format!("https://github.com/{full_name}"),
                primary_language: Some(Language {
                    name: "Go".to_string(),
                }),
                name_with_owner: full_name.to_string(),
                name,
            },
        );
        self
    }

    /// Append a published release with the given assets and their contents.
    ///
    /// Releases are returned in insertion order, so add the newest first.
    #[must_use]
    pub fn with_release(mut self, full_name: &str, tag: &str, assets: &[(&str, Vec<u8>)]) -> Self {
        let release = Release {
            tag: tag.to_string(),
            name: tag.to_string(),
            created_at: "2024-01-01T00:00:00Z".to_string(),
            draft: false,
            prerelease: false,
            assets: assets
                .iter()
                .map(|(name, bytes)| Asset {
                    name: (*name).to_string(),
                    size: bytes.len() as u64,
                    download_url: format!("https://github.com/{full_name}/releases/download/{tag}/{name}"),
                    tag: tag.to_string(),
                })
                .collect(),
        };
        for (name, bytes) in assets {
            self.asset_bytes.insert(
                (full_name.to_string(), tag.to_string(), (*name).to_string()),
                bytes.clone(),
            );
        }
        self.releases.entry(full_name.to_string()).or_default().push(release);
        self
    }

    /// The source zip downloaded for `tag` when no asset fits a script.
    #[must_use]
    pub fn with_source_archive(mut self, full_name: &str, tag: &str, file_name: &str, bytes: Vec<u8>) -> Self {
        self.source_archives
            .insert((full_name.to_string(), tag.to_string()), (file_name.to_string(), bytes));
        self
    }

    /// Map a contents API endpoint to its raw download URL.
    #[must_use]
    pub fn with_content_url(mut self, api_url: &str, download_url: &str) -> Self {
        self.content_urls.insert(api_url.to_string(), download_url.to_string());
        self
    }

    /// Serve `body` for a plain HTTP GET of `url`.
    #[must_use]
    pub fn with_url(mut self, url: &str, body: impl AsRef<[u8]>) -> Self {
        self.urls.insert(url.to_string(), body.as_ref().to_vec());
        self
    }

    pub fn describe_calls(&self) -> usize {
        self.describe_calls.load(Ordering::SeqCst)
    }

    pub fn latest_calls(&self) -> usize {
        self.latest_calls.load(Ordering::SeqCst)
    }

    pub fn release_calls(&self) -> usize {
        self.release_calls.load(Ordering::SeqCst)
    }

    pub fn download_calls(&self) -> usize {
        self.download_calls.load(Ordering::SeqCst)
    }

    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    /// Every call of any kind received so far.
    pub fn total_calls(&self) -> usize {
        self.describe_calls()
            + self.latest_calls()
            + self.release_calls()
            + self.download_calls()
            + self.fetch_calls()
    }
}

impl HostApi for FakeHost {
    async fn describe_repository(&self, path: &str) -> Result<RepositoryInfo> {
        self.describe_calls.fetch_add(1, Ordering::SeqCst);
        self.repositories.get(path).cloned().ok_or_else(|| {
            BurrowError::HostCommand {
                operation: "repo view".to_string(),
                stderr: format!("GraphQL: Could not resolve to a Repository with the name '{path}'."),
            }
            .into()
        })
    }

    async fn latest_release_tag(&self, full_name: &str) -> Result<String> {
        self.latest_calls.fetch_add(1, Ordering::SeqCst);
        self.latest.get(full_name).cloned().ok_or_else(|| {
            BurrowError::NoReleases {
                package: full_name.to_string(),
            }
            .into()
        })
    }

    async fn list_releases(&self, full_name: &str) -> Result<Vec<Release>> {
        self.release_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .releases
            .get(full_name)
            .map(|releases| releases.iter().filter(|r| r.is_published()).cloned().collect())
            .unwrap_or_default())
    }

    async fn download_asset(&self, full_name: &str, asset: &Asset, dir: &Path) -> Result<PathBuf> {
        self.download_calls.fetch_add(1, Ordering::SeqCst);
        let key = (full_name.to_string(), asset.tag.clone(), asset.name.clone());
        let bytes = self
            .asset_bytes
            .get(&key)
            .ok_or_else(|| anyhow!("no asset {} in {}@{}", asset.name, full_name, asset.tag))?;
        let target = dir.join(&asset.name);
        std::fs::write(&target, bytes)?;
        Ok(target)
    }

    async fn download_source_archive(&self, full_name: &str, tag: &str, dir: &Path) -> Result<()> {
        self.download_calls.fetch_add(1, Ordering::SeqCst);
        let (file_name, bytes) = self
            .source_archives
            .get(&(full_name.to_string(), tag.to_string()))
            .ok_or_else(|| anyhow!("no source archive for {full_name}@{tag}"))?;
        std::fs::write(dir.join(file_name), bytes)?;
        Ok(())
    }

    async fn resolve_content_url(&self, api_url: &str) -> Result<String> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        self.content_urls
            .get(api_url)
            .cloned()
            .ok_or_else(|| anyhow!("gh api {api_url}: Not Found"))
    }

    async fn fetch_url(&self, url: &str) -> Result<Vec<u8>> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        self.urls.get(url).cloned().ok_or_else(|| {
            BurrowError::Http {
                url: url.to_string(),
                reason: "404 Not Found".to_string(),
            }
            .into()
        })
    }
}

/// A [`Confirm`] that answers every question the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptedPrompt {
    Accept,
    Decline,
    /// Behave as if Ctrl-C arrived at the prompt
    Interrupt,
}

impl Confirm for ScriptedPrompt {
    async fn confirm(&self, question: &str) -> Result<bool> {
        tracing::debug!("Scripted answer {:?} to: {}", self, question);
        match self {
            Self::Accept => Ok(true),
            Self::Decline => Ok(false),
            Self::Interrupt => Err(BurrowError::Interrupted.into()),
        }
    }
}
