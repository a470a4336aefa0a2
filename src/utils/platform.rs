//! Host platform detection and command search path lookups.
//!
//! Release assets name their target with Go-style identifiers (`darwin`,
//! `amd64`, `arm64`, ...) rather than Rust's (`macos`, `x86_64`, `aarch64`),
//! so [`Platform::current`] translates the compile-time target into that
//! vocabulary. The asset resolver only ever sees a [`Platform`] value, which
//! lets tests pretend to be any host.

use anyhow::{Context, Result};
use std::ffi::OsString;
use std::path::PathBuf;

/// Operating system and CPU architecture in release-asset vocabulary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Platform {
    /// `darwin`, `linux`, `windows`, ...
    pub os: String,
    /// `amd64`, `arm64`, `386`, ...
    pub arch: String,
}

impl Platform {
    /// Build a platform from explicit names.
    pub fn new(os: impl Into<String>, arch: impl Into<String>) -> Self {
        Self {
            os: os.into(),
            arch: arch.into(),
        }
    }

    /// The platform this binary was compiled for.
    #[must_use]
    pub fn current() -> Self {
        let os = match std::env::consts::OS {
            "macos" => "darwin",
            other => other,
        };
        let arch = match std::env::consts::ARCH {
            "x86_64" => "amd64",
            "aarch64" => "arm64",
            "x86" => "386",
            "arm" => "arm",
            other => other,
        };
        Self::new(os, arch)
    }

    #[must_use]
    pub fn is_darwin(&self) -> bool {
        self.os == "darwin"
    }

    #[must_use]
    pub fn is_linux(&self) -> bool {
        self.os == "linux"
    }

    /// The `"<os> <arch>"` string assets are ranked against.
    #[must_use]
    pub fn candidate(&self) -> String {
        format!("{} {}", self.os, self.arch)
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.os, self.arch)
    }
}

/// Locate an executable on the command search path.
///
/// `search_path` overrides `PATH` when given, using the platform's usual
/// separator. Returns `None` when nothing is found.
#[must_use]
pub fn find_on_path(name: &str, search_path: Option<&OsString>) -> Option<PathBuf> {
    match search_path {
        Some(paths) => {
            let cwd = std::env::current_dir().ok()?;
            which::which_in(name, Some(paths), cwd).ok()
        }
        None => which::which(name).ok(),
    }
}

/// The current user's home directory.
pub fn get_home_dir() -> Result<PathBuf> {
    dirs::home_dir().context("Could not determine the home directory")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_current_platform_uses_release_names() {
        let platform = Platform::current();
        assert_ne!(platform.os, "macos");
        assert_ne!(platform.arch, "x86_64");
        assert_ne!(platform.arch, "aarch64");
    }

    #[test]
    fn test_candidate_string() {
        assert_eq!(Platform::new("darwin", "arm64").candidate(), "darwin arm64");
    }

    #[cfg(unix)]
    #[test]
    fn test_find_on_custom_search_path() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let exe = temp.path().join("sometool");
        std::fs::write(&exe, "#!/bin/sh\n").unwrap();
        std::fs::set_permissions(&exe, std::fs::Permissions::from_mode(0o755)).unwrap();

        let search = OsString::from(temp.path());
        assert_eq!(find_on_path("sometool", Some(&search)), Some(exe));
        assert_eq!(find_on_path("othertool", Some(&search)), None);
    }
}
