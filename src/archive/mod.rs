//! Archive extractor.
//!
//! Release archives have no common layout: some hold a bare executable, some
//! nest it under `<name>-<version>/bin/`, some ship man pages and completions
//! next to it. [`extract_asset`] unpacks the archive into a scratch directory,
//! walks it in sorted order and takes the first regular file that matches, in
//! decreasing priority:
//!
//! 1. the executable name exactly (case-insensitive)
//! 2. the archive's base name without its extension (case-insensitive)
//! 3. any name containing the executable name that has no `.<digits>` segment
//!    (man pages such as `tool.1` are skipped)
//!
//! The winner is moved next to the archive under the executable name. The
//! archive and the scratch directory are removed afterward.

mod unpack;

pub use unpack::{unpack_tar, unpack_zip};

use anyhow::{Context, Result};
use regex::Regex;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::constants::{TAR_EXTENSIONS, ZIP_EXTENSIONS};
use crate::core::BurrowError;
use crate::utils::fs::{ensure_dir, move_file, remove_dir_all_if_exists, remove_file_if_exists};

/// Recognized archive formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    Tar,
    Zip,
}

impl ArchiveFormat {
    /// Detect the format from the file name, ignoring case.
    #[must_use]
    pub fn detect(file_name: &str) -> Option<Self> {
        let lower = file_name.to_lowercase();
        if TAR_EXTENSIONS.iter().any(|ext| lower.ends_with(&ext.to_lowercase())) {
            Some(Self::Tar)
        } else if ZIP_EXTENSIONS.iter().any(|ext| lower.ends_with(ext)) {
            Some(Self::Zip)
        } else {
            None
        }
    }
}

/// Whether `file_name` is an archive the extractor can open.
#[must_use]
pub fn is_archive(file_name: &str) -> bool {
    ArchiveFormat::detect(file_name).is_some()
}

/// File name with the longest known archive extension removed.
fn strip_archive_extension(file_name: &str) -> String {
    let lower = file_name.to_lowercase();
    let longest = TAR_EXTENSIONS
        .iter()
        .chain(ZIP_EXTENSIONS.iter())
        .map(|ext| ext.to_lowercase())
        .filter(|ext| lower.ends_with(ext.as_str()))
        .map(|ext| ext.len())
        .max()
        .unwrap_or(0);
    file_name[..file_name.len() - longest].to_string()
}

/// Walk `root` and return the best candidate for `executable_name`.
fn find_executable(root: &Path, executable_name: &str, base_name: &str) -> Result<Option<PathBuf>> {
    let man_page = Regex::new(r"\.\d+").context("Failed to build man page pattern")?;
    let wanted = executable_name.to_lowercase();
    let base = base_name.to_lowercase();

    let mut by_base = None;
    let mut by_contains = None;

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.with_context(|| format!("Failed to walk {}", root.display()))?;
        if entry.file_type().is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_lowercase();

        if name == wanted {
            return Ok(Some(entry.into_path()));
        }
        if by_base.is_none() && name == base {
            by_base = Some(entry.path().to_path_buf());
        }
        if by_contains.is_none() && name.contains(&wanted) && !man_page.is_match(&name) {
            by_contains = Some(entry.path().to_path_buf());
        }
    }

    Ok(by_base.or(by_contains))
}

/// Extract `executable_name` out of the archive at `archive`.
///
/// Scratch files live in `work_dir/burrow-temp-<executable_name>`, which is
/// purged first and always removed afterward. On success the original archive
/// is deleted and the path of the extracted executable, `work_dir/<executable_name>`,
/// is returned.
///
/// # Errors
///
/// [`BurrowError::Extraction`] for unsupported formats, unsafe zip entries and
/// archives that hold nothing resembling the executable.
pub fn extract_asset(archive: &Path, executable_name: &str, work_dir: &Path) -> Result<PathBuf> {
    let file_name = archive
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let Some(format) = ArchiveFormat::detect(&file_name) else {
        return Err(BurrowError::Extraction {
            archive: file_name,
            reason: "unsupported archive format".to_string(),
        }
        .into());
    };

    let temp_dir = work_dir.join(format!("burrow-temp-{executable_name}"));
    remove_dir_all_if_exists(&temp_dir)?;
    ensure_dir(&temp_dir)?;
    tracing::debug!("Extracting {} into {}", archive.display(), temp_dir.display());

    let result = extract_into(archive, format, &file_name, executable_name, &temp_dir, work_dir);

    if let Err(e) = remove_dir_all_if_exists(&temp_dir) {
        tracing::warn!("Failed to clean up {}: {}", temp_dir.display(), e);
    }

    let extracted = result?;
    remove_file_if_exists(archive)?;
    Ok(extracted)
}

fn extract_into(
    archive: &Path,
    format: ArchiveFormat,
    file_name: &str,
    executable_name: &str,
    temp_dir: &Path,
    work_dir: &Path,
) -> Result<PathBuf> {
    match format {
        ArchiveFormat::Tar => unpack_tar(archive, temp_dir)?,
        ArchiveFormat::Zip => unpack_zip(archive, temp_dir)?,
    }

    let base_name = strip_archive_extension(file_name);
    let found = find_executable(temp_dir, executable_name, &base_name)?.ok_or_else(|| {
        BurrowError::Extraction {
            archive: file_name.to_string(),
            reason: format!("could not find '{executable_name}' inside the archive"),
        }
    })?;
    tracing::debug!("Found {} in {}", found.display(), file_name);

    let target = work_dir.join(executable_name);
    remove_file_if_exists(&target)?;
    move_file(&found, &target)
        .with_context(|| format!("Failed to move {} to {}", found.display(), target.display()))?;
    Ok(target)
}

/// Drop a downloaded file that is not an archive into place as the executable.
pub fn adopt_plain_file(file: &Path, executable_name: &str, work_dir: &Path) -> Result<PathBuf> {
    let target = work_dir.join(executable_name);
    if file == target {
        return Ok(target);
    }
    remove_file_if_exists(&target)?;
    move_file(file, &target)?;
    Ok(target)
}
