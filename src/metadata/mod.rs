//! Metadata fetcher.
//!
//! Turns package definitions into catalog entries by asking the host for the
//! repository description and the latest release tag. Every definition gets
//! its own future and all of them run at once on the calling task; results are
//! gathered by `join_all`, so nothing is shared between the futures.
//!
//! Each future first sleeps `definitions / API_RATE_LIMIT` milliseconds to stay
//! below the hourly API ceiling. A definition whose calls fail is dropped with
//! a warning.

use anyhow::Result;
use futures::future::join_all;
use std::time::Duration;

use crate::constants::API_RATE_LIMIT;
use crate::core::BurrowError;
use crate::host::{HostApi, RepositoryInfo};
use crate::models::{Package, PackageDefinition};

/// Delay applied before each definition's calls.
#[must_use]
pub fn throttle_delay(definition_count: usize) -> Duration {
    Duration::from_millis(definition_count as u64 / API_RATE_LIMIT)
}

/// Build a catalog entry from a definition and its live metadata.
#[must_use]
pub fn build_package(
    definition: &PackageDefinition,
    info: RepositoryInfo,
    latest_version: String,
) -> Package {
    Package {
        name: info.name,
        full_name: info.name_with_owner,
        description: info.description.unwrap_or_default(),
        url: info.url,
        primary_language: info.primary_language.map(|l| l.name).unwrap_or_default(),
        updated_at: info.updated_at,
        latest_version,
        executable_name: definition.executable_name.clone(),
        kind: definition.package_kind().unwrap_or_default(),
        depends_on: definition.depends_on.clone(),
        ..Package::default()
    }
}

async fn fetch_one<H: HostApi>(
    definition: &PackageDefinition,
    host: &H,
    delay: Duration,
) -> Result<Package> {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }

    let path = definition.path.as_str();
    let (info, latest) =
        futures::try_join!(host.describe_repository(path), host.latest_release_tag(path))
            .map_err(|e| BurrowError::MetadataFetch {
                package: path.to_string(),
                reason: format!("{e:#}"),
            })?;

    Ok(build_package(definition, info, latest.trim().to_string()))
}

/// Fetch metadata for every definition, dropping the ones that fail.
///
/// Output order follows `definitions`; callers sort before persisting.
pub async fn fetch_packages<H: HostApi>(definitions: &[PackageDefinition], host: &H) -> Vec<Package> {
    let delay = throttle_delay(definitions.len());
    tracing::debug!(
        "Fetching metadata for {} packages ({:?} delay)",
        definitions.len(),
        delay
    );

    let results = join_all(definitions.iter().map(|d| fetch_one(d, host, delay))).await;

    results
        .into_iter()
        .filter_map(|result| match result {
            Ok(package) => Some(package),
            Err(e) => {
                tracing::warn!("{:#}", e);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PackageKind;
    use crate::test_utils::FakeHost;

    #[test]
    fn test_throttle_delay_is_linear() {
        assert_eq!(throttle_delay(10), Duration::ZERO);
        assert_eq!(throttle_delay(5_000), Duration::from_millis(1));
        assert_eq!(throttle_delay(12_000), Duration::from_millis(2));
    }

    #[tokio::test]
    async fn test_failures_are_dropped() {
        let host = FakeHost::new()
            .with_repository("owner/tool", "v1.2.0")
            .with_repository("owner/helper", "v0.3.0")
            .with_repository_without_releases("owner/empty");

        let mut helper = PackageDefinition::new("owner/helper", "helper", PackageKind::Script);
        helper.depends_on = vec!["tool".to_string()];
        let definitions = vec![
            PackageDefinition::new("owner/tool", "tool", PackageKind::Binary),
            PackageDefinition::new("owner/empty", "empty", PackageKind::Binary),
            PackageDefinition::new("owner/missing", "missing", PackageKind::Binary),
            helper,
        ];

        let packages = fetch_packages(&definitions, &host).await;
        let names: Vec<&str> = packages.iter().map(|p| p.executable_name.as_str()).collect();
        assert_eq!(names, vec!["tool", "helper"]);

        let helper = &packages[1];
        assert_eq!(helper.full_name, "owner/helper");
        assert_eq!(helper.latest_version, "v0.3.0");
        assert_eq!(helper.kind, PackageKind::Script);
        assert_eq!(helper.depends_on, vec!["tool".to_string()]);
        assert_eq!(host.describe_calls(), 4);
    }

    #[tokio::test]
    async fn test_empty_input() {
        let host = FakeHost::new();
        assert!(fetch_packages(&[], &host).await.is_empty());
        assert_eq!(host.describe_calls(), 0);
    }
}
