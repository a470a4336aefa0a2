//! Platform-specific asset filtering and synonym tiers.
//!
//! Release authors spell platforms in many ways (`macos`, `osx`,
//! `apple-darwin`, `x86_64-unknown-linux`, `linux64`, ...). When the plain
//! `"<os> <arch>"` candidate matches nothing, the resolver walks the ordered
//! synonym list for the host and stops at the first synonym that matches at
//! least one asset.

use crate::models::Asset;
use crate::utils::platform::Platform;

const MAC_NAMES: [&str; 7] = ["macintosh", "appledarwin", "darwinapple", "darwin", "macos", "mac", "osx"];

/// Ordered synonyms to try for `platform`.
///
/// Architecture-qualified spellings come first so that a host picks its own
/// architecture before falling back to an unqualified name. Hosts without a
/// synonym list get an empty one.
#[must_use]
pub fn synonyms(platform: &Platform) -> Vec<String> {
    let arch = platform.arch.as_str();
    let mut list: Vec<String> = Vec::new();

    if platform.is_darwin() {
        for name in MAC_NAMES {
            list.push(format!("{name}{arch}"));
            list.push(format!("{arch}{name}"));
        }
        list.push(format!("apple{arch}darwin"));
        list.extend(MAC_NAMES.iter().map(|name| (*name).to_string()));
    } else if platform.is_linux() {
        let names: &[&str] = match arch {
            "amd64" => &[
                "linuxamd64",
                "amd64linux",
                "8664linux",
                "linux8664",
                "linux64static",
                "linux64",
            ],
            "386" => &["386linux", "linux386", "i386linux", "linuxi386", "linux32"],
            "arm64" => &["linuxarm64", "arm64linux", "linuxaarch64", "aarch64linux"],
            _ => &[],
        };
        list.extend(names.iter().map(|name| (*name).to_string()));
    }

    let mut seen = std::collections::HashSet::new();
    list.retain(|name| seen.insert(name.clone()));
    list
}

/// Whether an asset survives the unconditional pre-ranking filters.
///
/// Drops Windows builds, `.xz` files, bare `.gz` files (only `.tar.gz` is
/// usable), and builds for the other Unix family.
#[must_use]
pub fn is_candidate(name: &str, platform: &Platform) -> bool {
    let name = name.to_lowercase();

    if name.contains("windows") || name.ends_with(".xz") {
        return false;
    }
    if name.ends_with(".gz") && !name.ends_with(".tar.gz") {
        return false;
    }
    if platform.is_darwin() && name.contains("linux") {
        return false;
    }
    if platform.is_linux() && (name.contains("darwin") || name.contains("osx")) {
        return false;
    }
    true
}

/// Keep only the assets that can possibly serve `platform`.
#[must_use]
pub fn filter_assets(assets: &[Asset], platform: &Platform) -> Vec<Asset> {
    assets.iter().filter(|a| is_candidate(&a.name, platform)).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn asset(name: &str) -> Asset {
        Asset {
            name: name.to_string(),
            size: 0,
            download_url: String::new(),
            tag: "v1".to_string(),
        }
    }

    #[test]
    fn test_linux_filter() {
        let linux = Platform::new("linux", "amd64");
        assert!(is_candidate("tool_linux_amd64.tar.gz", &linux));
        assert!(!is_candidate("tool_Windows_amd64.zip", &linux));
        assert!(!is_candidate("tool_darwin_amd64.tar.gz", &linux));
        assert!(!is_candidate("tool-osx.zip", &linux));
        assert!(!is_candidate("tool_linux_amd64.tar.xz", &linux));
        assert!(!is_candidate("tool_linux_amd64.gz", &linux));
    }

    #[test]
    fn test_darwin_filter() {
        let mac = Platform::new("darwin", "arm64");
        assert!(is_candidate("tool_darwin_arm64.tar.gz", &mac));
        assert!(!is_candidate("tool_linux_arm64.tar.gz", &mac));
    }

    #[test]
    fn test_filter_assets_keeps_order() {
        let linux = Platform::new("linux", "amd64");
        let assets = vec![asset("b_linux.tar.gz"), asset("a_windows.zip"), asset("c_linux.zip")];
        let kept: Vec<String> = filter_assets(&assets, &linux).into_iter().map(|a| a.name).collect();
        assert_eq!(kept, vec!["b_linux.tar.gz", "c_linux.zip"]);
    }

    #[test]
    fn test_mac_synonyms_put_arch_first() {
        let list = synonyms(&Platform::new("darwin", "arm64"));
        assert_eq!(list[0], "macintosharm64");
        assert_eq!(list[1], "arm64macintosh");
        let bare = list.iter().position(|s| s == "darwin").unwrap();
        let qualified = list.iter().position(|s| s == "darwinarm64").unwrap();
        assert!(qualified < bare);
        assert_eq!(list.last().unwrap(), "osx");
    }

    #[test]
    fn test_linux_synonyms_per_arch() {
        assert_eq!(synonyms(&Platform::new("linux", "amd64"))[0], "linuxamd64");
        assert_eq!(synonyms(&Platform::new("linux", "arm64"))[0], "linuxarm64");
        assert!(synonyms(&Platform::new("linux", "riscv64")).is_empty());
        assert!(synonyms(&Platform::new("freebsd", "amd64")).is_empty());
    }
}
