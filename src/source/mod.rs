//! Remote catalog loader.
//!
//! A remote is a YAML document listing package definitions:
//!
//! ```yaml
//! packages:
//!   - path: owner/tool
//!     executableName: tool
//!     type: binary
//!     dependsOn: [other]
//! ```
//!
//! `github` remotes point at a contents API endpoint that is first resolved
//! to its raw download URL through the host CLI. `open` remotes are fetched
//! with a plain HTTP GET. The curated global remote is always appended after
//! the configured ones.
//!
//! A remote is rejected as a whole when any definition has an unknown type or
//! when two definitions share an `executableName`. Rejected or unreachable
//! remotes are skipped with a warning unless the caller asks for a strict load.

use anyhow::{Context, Result};
use std::collections::HashSet;

use crate::constants::GLOBAL_REMOTE_URL;
use crate::core::BurrowError;
use crate::host::HostApi;
use crate::models::{DefinitionList, PackageDefinition, Remote, RemoteKind};

/// A validated definition and the remote it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcedDefinition {
    pub remote: String,
    pub definition: PackageDefinition,
}

/// The curated remote every catalog includes.
#[must_use]
pub fn global_remote() -> Remote {
    Remote::new(GLOBAL_REMOTE_URL, RemoteKind::GenericUrl)
}

/// Names that occur more than once, each listed once in first-repeat order.
fn duplicate_names(definitions: &[PackageDefinition]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut duplicates: Vec<String> = Vec::new();
    for definition in definitions {
        let name = &definition.executable_name;
        if !seen.insert(name.as_str()) && !duplicates.contains(name) {
            duplicates.push(name.clone());
        }
    }
    duplicates
}

/// Parse and validate the definition document of `url`.
pub fn parse_definitions(url: &str, bytes: &[u8]) -> Result<Vec<PackageDefinition>> {
    let remote_error = |reason: String| BurrowError::RemoteLoad {
        url: url.to_string(),
        reason,
    };

    let list: DefinitionList = if bytes.iter().all(u8::is_ascii_whitespace) {
        DefinitionList::default()
    } else {
        serde_yaml::from_slice(bytes).map_err(|e| remote_error(e.to_string()))?
    };

    if list.packages.is_empty() {
        tracing::warn!("The remote '{}' has no packages defined", url);
    }

    if let Some(bad) = list.packages.iter().find(|d| d.package_kind().is_none()) {
        return Err(remote_error(format!(
            "the package '{}' has an unsupported type '{}', only 'script' and 'binary' are valid",
            bad.path, bad.kind
        ))
        .into());
    }

    let duplicates = duplicate_names(&list.packages);
    if !duplicates.is_empty() {
        return Err(remote_error(format!(
            "the repos list contains duplicate repos with the same executableName [{}]",
            duplicates.join(", ")
        ))
        .into());
    }

    Ok(list.packages)
}

/// Fetch and validate the definitions of a single remote.
pub async fn load_remote<H: HostApi>(remote: &Remote, host: &H) -> Result<Vec<PackageDefinition>> {
    let Some(kind) = RemoteKind::parse(&remote.kind) else {
        return Err(BurrowError::RemoteLoad {
            url: remote.url.clone(),
            reason: format!(
                "the remote type '{}' is not supported, only 'github' and 'open' are valid",
                remote.kind
            ),
        }
        .into());
    };

    tracing::debug!("Loading {} remote {}", kind.as_str(), remote.url);
    let bytes = match kind {
        RemoteKind::HostedCatalog => {
            let download_url = host
                .resolve_content_url(&remote.url)
                .await
                .with_context(|| format!("Failed to resolve remote {}", remote.url))?;
            host.fetch_url(download_url.trim()).await?
        }
        RemoteKind::GenericUrl => host.fetch_url(&remote.url).await?,
    };

    parse_definitions(&remote.url, &bytes)
}

/// Load the configured remotes followed by the global remote.
///
/// With `strict` unset a failing remote is logged and skipped; with `strict`
/// set the first failure is returned.
pub async fn load_definitions<H: HostApi>(
    remotes: &[Remote],
    host: &H,
    strict: bool,
) -> Result<Vec<SourcedDefinition>> {
    let mut all = remotes.to_vec();
    all.push(global_remote());

    let mut definitions = Vec::new();
    for remote in &all {
        match load_remote(remote, host).await {
            Ok(loaded) => {
                tracing::debug!("Remote {} declared {} packages", remote.url, loaded.len());
                definitions.extend(loaded.into_iter().map(|definition| SourcedDefinition {
                    remote: remote.url.clone(),
                    definition,
                }));
            }
            Err(e) if strict => return Err(e),
            Err(e) => {
                tracing::warn!("Error fetching packages from remote {}: {:#}", remote.url, e);
            }
        }
    }
    Ok(definitions)
}
