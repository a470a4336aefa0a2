//! Downloading and extracting the executable of one release.

use anyhow::Result;
use colored::Colorize;
use std::path::{Path, PathBuf};

use crate::archive::{adopt_plain_file, extract_asset, is_archive};
use crate::core::BurrowError;
use crate::host::HostApi;
use crate::models::{Asset, Package, PackageKind, Release};
use crate::resolver::{find_source_archive, select_binary_asset, select_script_asset};
use crate::utils::platform::Platform;
use crate::utils::progress::with_spinner;
use crate::utils::prompt::Confirm;

/// Human-readable size in binary units.
#[must_use]
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 6] = ["KiB", "MiB", "GiB", "TiB", "PiB", "EiB"];
    if bytes < 1024 {
        return format!("{bytes} B");
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.1} {}", UNITS[unit])
}

/// What to fetch for a release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadPlan {
    /// A release asset
    Asset(Asset),
    /// The auto-generated source zip of the release
    SourceArchive,
}

/// Decide what to download for `package`.
///
/// # Errors
///
/// [`BurrowError::AssetNotFound`] when a binary package has no asset for the
/// platform, or [`BurrowError::ConfirmationDeclined`] when `prompt` rejects the
/// chosen asset. An interrupted prompt fails with its own error.
pub async fn plan_download<P: Confirm>(
    package: &Package,
    release: &Release,
    platform: &Platform,
    prompt: Option<&P>,
) -> Result<DownloadPlan> {
    match package.kind {
        PackageKind::Script => {
            Ok(select_script_asset(&release.assets, &package.executable_name, platform)
                .map_or(DownloadPlan::SourceArchive, |s| DownloadPlan::Asset(s.asset)))
        }
        PackageKind::Binary => {
            let selection = select_binary_asset(&release.assets, platform).ok_or_else(|| {
                BurrowError::AssetNotFound {
                    package: package.full_name.clone(),
                    wanted: format!("your OS/architecture ({platform})"),
                }
            })?;
            tracing::debug!(
                "Selected {} for {} (matched '{}')",
                selection.asset.name,
                platform,
                selection.matched_by
            );

            if let Some(prompt) = prompt {
                println!(" Found the asset: {}", selection.asset.name.magenta());
                if !prompt.confirm("Proceed with installation?").await? {
                    return Err(BurrowError::ConfirmationDeclined {
                        package: package.full_name.clone(),
                    }
                    .into());
                }
            }
            Ok(DownloadPlan::Asset(selection.asset))
        }
    }
}

/// Download what `plan` names into `work_dir` and return the path of the
/// executable, renamed to the package's executable name.
pub async fn fetch_executable<H: HostApi>(
    host: &H,
    package: &Package,
    release: &Release,
    plan: &DownloadPlan,
    work_dir: &Path,
) -> Result<PathBuf> {
    let executable = package.executable_name.as_str();
    match plan {
        DownloadPlan::Asset(asset) => {
            let message = format!("Fetching {} ({})", asset.name, format_size(asset.size));
            let downloaded =
                with_spinner(message, host.download_asset(&package.full_name, asset, work_dir))
                    .await?;

            if is_archive(&asset.name) {
                extract_asset(&downloaded, executable, work_dir)
            } else {
                adopt_plain_file(&downloaded, executable, work_dir)
            }
        }
        DownloadPlan::SourceArchive => {
            tracing::debug!(
                "No asset of {} matches '{}', using the source archive",
                package.full_name,
                executable
            );
            let message = format!("Fetching the source archive of {}", package.full_name);
            with_spinner(
                message,
                host.download_source_archive(&package.full_name, &release.tag, work_dir),
            )
            .await?;

            let archive = find_source_archive(&package.name, work_dir)?.ok_or_else(|| {
                BurrowError::AssetNotFound {
                    package: package.full_name.clone(),
                    wanted: format!("{}.zip", package.name),
                }
            })?;
            extract_asset(&archive, executable, work_dir)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.0 KiB");
        assert_eq!(format_size(5 * 1024 * 1024 + 512 * 1024), "5.5 MiB");
    }
}
