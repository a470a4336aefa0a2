//! [`HostApi`] backed by the GitHub CLI and `reqwest`.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use super::command_builder::GhCommand;
use super::{HostApi, RepositoryInfo};
use crate::constants::HTTP_TIMEOUT;
use crate::core::BurrowError;
use crate::models::{Asset, Release};
use crate::utils::fs::remove_file_if_exists;

const REPOSITORY_FIELDS: &str = "name,description,updatedAt,primaryLanguage,url,nameWithOwner";

/// Release as returned by the REST API.
#[derive(Debug, Deserialize)]
struct ReleasePayload {
    tag_name: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    created_at: Option<String>,
    #[serde(default)]
    draft: bool,
    #[serde(default)]
    prerelease: bool,
    #[serde(default)]
    assets: Vec<AssetPayload>,
}

#[derive(Debug, Deserialize)]
struct AssetPayload {
    name: String,
    #[serde(default)]
    size: u64,
    #[serde(default)]
    browser_download_url: String,
}

impl From<ReleasePayload> for Release {
    fn from(payload: ReleasePayload) -> Self {
        let tag = payload.tag_name;
        let assets = payload
            .assets
            .into_iter()
            .map(|a| Asset {
                name: a.name,
                size: a.size,
                download_url: a.browser_download_url,
                tag: tag.clone(),
            })
            .collect();

        Self {
            name: payload.name.unwrap_or_default(),
            created_at: payload.created_at.unwrap_or_default(),
            draft: payload.draft,
            prerelease: payload.prerelease,
            assets,
            tag,
        }
    }
}

/// Parse the releases endpoint output, keeping only published releases.
fn parse_releases(json: &str) -> Result<Vec<Release>> {
    let payloads: Vec<ReleasePayload> =
        serde_json::from_str(json).context("Failed to parse releases response")?;
    Ok(payloads.into_iter().map(Release::from).filter(Release::is_published).collect())
}

/// Production host client.
#[derive(Debug, Clone)]
pub struct GhClient {
    http: reqwest::Client,
}

impl GhClient {
    /// Build a client whose HTTP fetches time out after two seconds.
    pub fn new() -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .user_agent(concat!("burrow/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            http,
        })
    }
}

impl HostApi for GhClient {
    async fn describe_repository(&self, path: &str) -> Result<RepositoryInfo> {
        let stdout = GhCommand::new()
            .args(["repo", "view", path, "--json", REPOSITORY_FIELDS])
            .with_context(path)
            .execute_stdout()
            .await?;

        serde_json::from_str(&stdout)
            .with_context(|| format!("Failed to parse repository description of {path}"))
    }

    async fn latest_release_tag(&self, full_name: &str) -> Result<String> {
        let result = GhCommand::new()
            .args(["api", &format!("repos/{full_name}/releases/latest"), "--jq", ".tag_name"])
            .with_context(full_name)
            .execute_stdout()
            .await;

        match result {
            Ok(tag) if tag.is_empty() => Err(BurrowError::NoReleases {
                package: full_name.to_string(),
            }
            .into()),
            Ok(tag) => Ok(tag),
            Err(e) => {
                let not_found = matches!(
                    e.downcast_ref::<BurrowError>(),
                    Some(BurrowError::HostCommand { stderr, .. }) if stderr.contains("Not Found")
                );
                if not_found {
                    Err(BurrowError::NoReleases {
                        package: full_name.to_string(),
                    }
                    .into())
                } else {
                    Err(e)
                }
            }
        }
    }

    async fn list_releases(&self, full_name: &str) -> Result<Vec<Release>> {
        let stdout = GhCommand::new()
            .args(["api", &format!("repos/{full_name}/releases")])
            .with_context(full_name)
            .execute_stdout()
            .await?;
        parse_releases(&stdout)
    }

    async fn download_asset(&self, full_name: &str, asset: &Asset, dir: &Path) -> Result<PathBuf> {
        let target = dir.join(&asset.name);
        remove_file_if_exists(&target)?;

        GhCommand::new()
            .args(["release", "download", "--repo", full_name, "--pattern", &asset.name])
            .arg(&asset.tag)
            .args(["--dir", "."])
            .current_dir(dir)
            .with_context(full_name)
            .execute_success()
            .await
            .with_context(|| format!("Failed to download {} from {full_name}", asset.name))?;

        Ok(target)
    }

    async fn download_source_archive(&self, full_name: &str, tag: &str, dir: &Path) -> Result<()> {
        GhCommand::new()
            .args(["release", "download", "--repo", full_name, tag])
            .args(["--archive", "zip", "--dir", "."])
            .current_dir(dir)
            .with_context(full_name)
            .execute_success()
            .await
            .with_context(|| format!("Failed to download the source archive of {full_name}@{tag}"))
    }

    async fn resolve_content_url(&self, api_url: &str) -> Result<String> {
        GhCommand::new()
            .args(["api", api_url, "--jq", ".download_url"])
            .with_context(api_url)
            .execute_stdout()
            .await
    }

    async fn fetch_url(&self, url: &str) -> Result<Vec<u8>> {
        let http_error = |e: reqwest::Error| BurrowError::Http {
            url: url.to_string(),
            reason: e.to_string(),
        };

        tracing::debug!(target: "host", "GET {}", url);
        let response = self.http.get(url).send().await.map_err(http_error)?;
        let response = response.error_for_status().map_err(http_error)?;
        let bytes = response.bytes().await.map_err(http_error)?;
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_releases_filters_drafts_and_prereleases() {
        let json = r#"[
            {"tag_name": "v2.0.0-rc1", "name": "rc", "draft": false, "prerelease": true, "assets": []},
            {"tag_name": "v1.1.0", "name": null, "draft": true, "prerelease": false, "assets": []},
            {"tag_name": "v1.0.0", "name": "First", "created_at": "2024-01-01T00:00:00Z",
             "draft": false, "prerelease": false,
             "assets": [{"name": "tool_linux_amd64.tar.gz", "size": 1024,
                         "browser_download_url": "https://example.com/tool.tar.gz"}]}
        ]"#;

        let releases = parse_releases(json).unwrap();
        assert_eq!(releases.len(), 1);
        assert_eq!(releases[0].tag, "v1.0.0");
        assert_eq!(releases[0].assets[0].tag, "v1.0.0");
        assert_eq!(releases[0].assets[0].size, 1024);
    }

    #[test]
    fn test_repository_info_parsing() {
        let json = r#"{"name":"cli","description":"GitHub's CLI","updatedAt":"2024-05-01T00:00:00Z",
            "primaryLanguage":{"name":"Go"},"url":"https://github.com/cli/cli","nameWithOwner":"cli/cli"}"#;
        let info: RepositoryInfo = serde_json::from_str(json).unwrap();
        assert_eq!(info.name_with_owner, "cli/cli");
        assert_eq!(info.primary_language.unwrap().name, "Go");
    }

    #[test]
    fn test_repository_info_without_language() {
        let json = r#"{"name":"x","description":null,"updatedAt":"","primaryLanguage":null,"url":"","nameWithOwner":"o/x"}"#;
        let info: RepositoryInfo = serde_json::from_str(json).unwrap();
        assert!(info.primary_language.is_none());
        assert!(info.description.is_none());
    }
}
