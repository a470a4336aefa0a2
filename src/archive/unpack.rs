//! Tar and zip unpacking into a destination directory.

use anyhow::{Context, Result};
use flate2::read::GzDecoder;
use std::fs::{self, File};
use std::io::{self, BufReader, Read, Seek, SeekFrom};
use std::path::Path;
use tar::Archive;

use crate::core::BurrowError;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

fn is_gzip(file: &mut File) -> Result<bool> {
    let mut magic = [0u8; 2];
    let read = file.read(&mut magic)?;
    file.seek(SeekFrom::Start(0))?;
    Ok(read == 2 && magic == GZIP_MAGIC)
}

/// Unpack a tar archive, gunzipping it first when it is compressed.
///
/// Each entry is unpacked on its own, so directories are recreated, files
/// keep their declared mode and every file handle is closed before the next
/// entry is read. Entries that would land outside `dst` are skipped.
pub fn unpack_tar(src: &Path, dst: &Path) -> Result<()> {
    let archive_name = src.file_name().map(|n| n.to_string_lossy().to_string()).unwrap_or_default();
    let extraction_error = |reason: String| BurrowError::Extraction {
        archive: archive_name.clone(),
        reason,
    };

    let mut file = File::open(src).with_context(|| format!("Failed to open {}", src.display()))?;
    let reader: Box<dyn Read> = if is_gzip(&mut file)? {
        Box::new(GzDecoder::new(BufReader::new(file)))
    } else {
        Box::new(BufReader::new(file))
    };

    let mut archive = Archive::new(reader);
    let entries = archive.entries().map_err(|e| extraction_error(e.to_string()))?;
    for entry in entries {
        let mut entry = entry.map_err(|e| extraction_error(e.to_string()))?;
        let unpacked = entry.unpack_in(dst).map_err(|e| extraction_error(e.to_string()))?;
        if !unpacked {
            tracing::warn!(
                "Skipped tar entry outside the extraction directory: {}",
                entry.path().map(|p| p.display().to_string()).unwrap_or_default()
            );
        }
    }
    Ok(())
}

/// Unpack a zip archive.
///
/// # Errors
///
/// Fails with [`BurrowError::Extraction`] ("invalid file path") as soon as an
/// entry would resolve outside `dst`, before anything of that entry is written.
pub fn unpack_zip(src: &Path, dst: &Path) -> Result<()> {
    let archive_name = src.file_name().map(|n| n.to_string_lossy().to_string()).unwrap_or_default();
    let extraction_error = |reason: String| BurrowError::Extraction {
        archive: archive_name.clone(),
        reason,
    };

    let file = File::open(src).with_context(|| format!("Failed to open {}", src.display()))?;
    let mut archive =
        zip::ZipArchive::new(BufReader::new(file)).map_err(|e| extraction_error(e.to_string()))?;

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i).map_err(|e| extraction_error(e.to_string()))?;
        let relative = match entry.enclosed_name() {
            Some(path) => path,
            None => {
                return Err(extraction_error(format!("invalid file path: {}", entry.name())).into());
            }
        };
        let out_path = dst.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&out_path)
                .with_context(|| format!("Failed to create {}", out_path.display()))?;
            continue;
        }

        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        {
            let mut out = File::create(&out_path)
                .with_context(|| format!("Failed to create {}", out_path.display()))?;
            io::copy(&mut entry, &mut out)
                .with_context(|| format!("Failed to write {}", out_path.display()))?;
        }

        #[cfg(unix)]
        if let Some(mode) = entry.unix_mode() {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&out_path, fs::Permissions::from_mode(mode))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use std::io::Write;
    use tempfile::TempDir;
    use zip::write::SimpleFileOptions;

    fn write_tar(path: &Path, files: &[(&str, &[u8])], gzip: bool) {
        let file = File::create(path).unwrap();
        let writer: Box<dyn Write> = if gzip {
            Box::new(GzEncoder::new(file, Compression::default()))
        } else {
            Box::new(file)
        };
        let mut builder = tar::Builder::new(writer);
        for (name, content) in files {
            let mut header = tar::Header::new_gnu();
            header.set_size(content.len() as u64);
            header.set_mode(0o755);
            header.set_cksum();
            builder.append_data(&mut header, name, *content).unwrap();
        }
        builder.into_inner().unwrap().flush().unwrap();
    }

    #[test]
    fn test_unpack_gzipped_and_plain_tar() {
        let temp = TempDir::new().unwrap();
        for gzip in [true, false] {
            let archive = temp.path().join(format!("a-{gzip}.tar"));
            let dst = temp.path().join(format!("out-{gzip}"));
            fs::create_dir_all(&dst).unwrap();
            write_tar(&archive, &[("dir/tool", b"binary")], gzip);

            unpack_tar(&archive, &dst).unwrap();
            assert_eq!(fs::read(dst.join("dir/tool")).unwrap(), b"binary");
        }
    }

    #[test]
    fn test_unpack_zip_rejects_traversal() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("evil.zip");
        {
            let mut zip = zip::ZipWriter::new(File::create(&archive).unwrap());
            zip.start_file("../escape.sh", SimpleFileOptions::default()).unwrap();
            zip.write_all(b"oops").unwrap();
            zip.finish().unwrap();
        }

        let dst = temp.path().join("out");
        fs::create_dir_all(&dst).unwrap();
        let err = unpack_zip(&archive, &dst).unwrap_err();
        assert!(err.to_string().contains("invalid file path"));
        assert!(!temp.path().join("escape.sh").exists());
    }
}
