//! Asset resolver: picks the release asset to install.
//!
//! Releases rarely name their assets consistently, so selection is a fuzzy
//! heuristic built on [`rank`]:
//!
//! - **Binary packages** rank every asset against `"<os> <arch>"`. When
//!   nothing matches, the host's synonym list from [`platform::synonyms`] is
//!   tried in order until one synonym matches at least one asset.
//! - **Script packages** rank every asset against the executable name. When
//!   nothing matches, the installer downloads the release's source zip and
//!   [`find_source_archive`] picks it out of the staging directory.
//!
//! Before any ranking the asset list goes through
//! [`platform::filter_assets`]. Among matches the highest score wins, the
//! first in list order on ties, so the choice is fully determined by the asset
//! list, the host platform and the synonym order.

pub mod platform;
pub mod rank;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::models::Asset;
use crate::utils::platform::Platform;

/// The chosen asset and the candidate string that matched it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub asset: Asset,
    pub matched_by: String,
}

fn pick(candidate: &str, assets: &[Asset]) -> Option<Selection> {
    let names: Vec<&str> = assets.iter().map(|a| a.name.as_str()).collect();
    let ranks = rank::rank(candidate, &names);
    let best = rank::best(&ranks)?;
    Some(Selection {
        asset: assets[best.index].clone(),
        matched_by: candidate.to_string(),
    })
}

/// Choose the asset of a binary package for `platform`.
///
/// Returns `None` when neither the platform string nor any synonym matches.
#[must_use]
pub fn select_binary_asset(assets: &[Asset], platform: &Platform) -> Option<Selection> {
    let assets = platform::filter_assets(assets, platform);
    if assets.is_empty() {
        return None;
    }

    let candidate = platform.candidate();
    if let Some(selection) = pick(&candidate, &assets) {
        return Some(selection);
    }

    tracing::debug!("No asset matches '{}', trying synonyms for {}", candidate, platform);
    platform::synonyms(platform).iter().find_map(|synonym| pick(synonym, &assets))
}

/// Choose the asset of a script package by its executable name.
#[must_use]
pub fn select_script_asset(
    assets: &[Asset],
    executable_name: &str,
    platform: &Platform,
) -> Option<Selection> {
    let assets = platform::filter_assets(assets, platform);
    pick(executable_name, &assets)
}

/// Find the downloaded source zip of `repository_name` inside `dir`.
///
/// Every file in `dir` is ranked against `"<repository_name>.zip"` and the
/// best match is returned.
pub fn find_source_archive(repository_name: &str, dir: &Path) -> Result<Option<PathBuf>> {
    let mut names = Vec::new();
    for entry in
        std::fs::read_dir(dir).with_context(|| format!("Failed to read {}", dir.display()))?
    {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            names.push(entry.file_name().to_string_lossy().to_string());
        }
    }
    names.sort();

    let candidate = format!("{repository_name}.zip");
    let ranks = rank::rank(&candidate, &names);
    Ok(rank::best(&ranks).map(|best| dir.join(&best.target)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn assets(names: &[&str]) -> Vec<Asset> {
        names
            .iter()
            .map(|name| Asset {
                name: (*name).to_string(),
                size: 1,
                download_url: format!("https://example.com/{name}"),
                tag: "v1.0.0".to_string(),
            })
            .collect()
    }

    const GO_STYLE: [&str; 6] = [
        "tool_1.0.0_checksums.txt",
        "tool_1.0.0_darwin_amd64.tar.gz",
        "tool_1.0.0_darwin_arm64.tar.gz",
        "tool_1.0.0_linux_amd64.tar.gz",
        "tool_1.0.0_linux_arm64.tar.gz",
        "tool_1.0.0_windows_amd64.zip",
    ];

    #[test]
    fn test_binary_asset_for_linux_amd64() {
        let selection =
            select_binary_asset(&assets(&GO_STYLE), &Platform::new("linux", "amd64")).unwrap();
        assert_eq!(selection.asset.name, "tool_1.0.0_linux_amd64.tar.gz");
        assert_eq!(selection.matched_by, "linuxamd64");
    }

    #[test]
    fn test_binary_asset_for_darwin_arm64() {
        let selection =
            select_binary_asset(&assets(&GO_STYLE), &Platform::new("darwin", "arm64")).unwrap();
        assert_eq!(selection.asset.name, "tool_1.0.0_darwin_arm64.tar.gz");
    }

    #[test]
    fn test_binary_asset_with_space_in_name_matches_directly() {
        let list = assets(&["Tool for Linux amd64.tar.gz", "Tool for Darwin arm64.zip"]);
        let selection = select_binary_asset(&list, &Platform::new("linux", "amd64")).unwrap();
        assert_eq!(selection.asset.name, "Tool for Linux amd64.tar.gz");
        assert_eq!(selection.matched_by, "linux amd64");
    }

    #[test]
    fn test_binary_asset_rust_triples() {
        let list = assets(&[
            "tool-x86_64-apple-darwin.tar.gz",
            "tool-x86_64-unknown-linux-musl.tar.gz",
            "tool-x86_64-pc-windows-msvc.zip",
        ]);
        let selection = select_binary_asset(&list, &Platform::new("linux", "amd64")).unwrap();
        assert_eq!(selection.asset.name, "tool-x86_64-unknown-linux-musl.tar.gz");
        assert_eq!(selection.matched_by, "8664linux");
    }

    #[test]
    fn test_binary_asset_is_deterministic() {
        let list = assets(&GO_STYLE);
        let platform = Platform::new("darwin", "amd64");
        let first = select_binary_asset(&list, &platform);
        for _ in 0..10 {
            assert_eq!(select_binary_asset(&list, &platform), first);
        }
    }

    #[test]
    fn test_binary_asset_none_for_unsupported_platform() {
        let list = assets(&["tool_windows_amd64.zip", "tool_linux_amd64.tar.xz"]);
        assert!(select_binary_asset(&list, &Platform::new("linux", "amd64")).is_none());
        assert!(select_binary_asset(&[], &Platform::new("linux", "amd64")).is_none());
    }

    #[test]
    fn test_script_asset_by_executable_name() {
        let list = assets(&["checksums.txt", "deploy-helper.sh", "README.md"]);
        let selection =
            select_script_asset(&list, "deploy-helper", &Platform::new("linux", "amd64")).unwrap();
        assert_eq!(selection.asset.name, "deploy-helper.sh");
        assert!(select_script_asset(&list, "missing", &Platform::new("linux", "amd64")).is_none());
    }

    #[test]
    fn test_find_source_archive() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("notes.txt"), "x").unwrap();
        std::fs::write(temp.path().join("my-scripts-1.2.0.zip"), "x").unwrap();
        std::fs::create_dir(temp.path().join("my-scripts-dir.zip")).unwrap();

        let found = find_source_archive("my-scripts", temp.path()).unwrap();
        assert_eq!(found, Some(temp.path().join("my-scripts-1.2.0.zip")));
        assert_eq!(find_source_archive("other", temp.path()).unwrap(), None);
    }
}
