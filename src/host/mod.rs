//! Access to the repository host (GitHub).
//!
//! burrow never talks to the host directly from its core logic. Everything
//! goes through the [`HostApi`] trait so the catalog loader, metadata fetcher
//! and install orchestrator can run against a fake in tests.
//!
//! The production implementation, [`GhClient`], shells out to the GitHub CLI
//! (`gh`) for authenticated API calls and downloads, and uses `reqwest` for
//! plain HTTP fetches of remote definition lists.
//!
//! # Operations
//!
//! | Operation | Backing call |
//! |-----------|--------------|
//! | [`describe_repository`](HostApi::describe_repository) | `gh repo view --json ...` |
//! | [`latest_release_tag`](HostApi::latest_release_tag) | `gh api repos/<repo>/releases/latest` |
//! | [`list_releases`](HostApi::list_releases) | `gh api repos/<repo>/releases` |
//! | [`download_asset`](HostApi::download_asset) | `gh release download --pattern` |
//! | [`download_source_archive`](HostApi::download_source_archive) | `gh release download --archive zip` |
//! | [`resolve_content_url`](HostApi::resolve_content_url) | `gh api <url> --jq .download_url` |
//! | [`fetch_url`](HostApi::fetch_url) | HTTP GET, 2 second timeout |

pub mod client;
pub mod command_builder;

pub use client::GhClient;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::path::{Path, PathBuf};

use crate::models::{Asset, Release};

/// What the host reports about a repository.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryInfo {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub updated_at: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub primary_language: Option<Language>,
    /// `owner/repo`
    pub name_with_owner: String,
}

/// A repository's primary language.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Language {
    pub name: String,
}

/// The repository host as burrow sees it.
pub trait HostApi: Sync {
    /// Describe a repository by its `owner/repo` path.
    fn describe_repository(
        &self,
        path: &str,
    ) -> impl Future<Output = Result<RepositoryInfo>> + Send;

    /// Tag of the newest release.
    ///
    /// Fails with [`BurrowError::NoReleases`](crate::core::BurrowError::NoReleases)
    /// when the repository has never published one.
    fn latest_release_tag(&self, full_name: &str) -> impl Future<Output = Result<String>> + Send;

    /// Published releases, newest first. Drafts and prereleases are excluded.
    fn list_releases(&self, full_name: &str) -> impl Future<Output = Result<Vec<Release>>> + Send;

    /// Download one release asset into `dir`, returning the downloaded file.
    fn download_asset(
        &self,
        full_name: &str,
        asset: &Asset,
        dir: &Path,
    ) -> impl Future<Output = Result<PathBuf>> + Send;

    /// Download the auto-generated source zip of a release into `dir`.
    fn download_source_archive(
        &self,
        full_name: &str,
        tag: &str,
        dir: &Path,
    ) -> impl Future<Output = Result<()>> + Send;

    /// Resolve a contents API URL to a raw download URL.
    fn resolve_content_url(&self, api_url: &str) -> impl Future<Output = Result<String>> + Send;

    /// Plain HTTP GET.
    fn fetch_url(&self, url: &str) -> impl Future<Output = Result<Vec<u8>>> + Send;
}
