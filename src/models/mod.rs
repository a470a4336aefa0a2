//! Shared data models for burrow operations
//!
//! These structures travel between components: remotes and package
//! definitions come from configuration, [`Package`] is the enriched catalog
//! entry written to the cache snapshot, [`Release`]/[`Asset`] come from the
//! host API, and [`InstallationRecord`] is the durable evidence of an install.
//!
//! All of them serialize as camelCase YAML.

use serde::{Deserialize, Serialize};

use crate::constants::HIDDEN_PACKAGES;

/// How a remote's definition list is fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteKind {
    /// A file inside a hosted repository, resolved to a raw URL through the host API
    HostedCatalog,
    /// A plain URL fetched over HTTP
    GenericUrl,
}

impl RemoteKind {
    /// Keyword used in the repositories configuration.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::HostedCatalog => "github",
            Self::GenericUrl => "open",
        }
    }

    /// Parse the configuration keyword, case-insensitively.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "github" => Some(Self::HostedCatalog),
            "open" => Some(Self::GenericUrl),
            _ => None,
        }
    }
}

/// A declared source of package definitions.
///
/// `kind` stays a raw string so that one remote with an unknown type fails on
/// its own instead of making the whole configuration unreadable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Remote {
    /// Location of the definition list
    pub url: String,
    /// `github` or `open`
    #[serde(rename = "type")]
    pub kind: String,
}

impl Remote {
    /// Create a remote of the given kind.
    pub fn new(url: impl Into<String>, kind: RemoteKind) -> Self {
        Self {
            url: url.into(),
            kind: kind.as_str().to_string(),
        }
    }
}

/// Whether a package ships a compiled binary or a script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PackageKind {
    /// Platform-specific prebuilt executable
    #[default]
    Binary,
    /// Platform-independent script
    Script,
}

impl PackageKind {
    /// Parse a definition's `type` field, case-insensitively.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "binary" => Some(Self::Binary),
            "script" => Some(Self::Script),
            _ => None,
        }
    }
}

impl std::fmt::Display for PackageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Binary => write!(f, "binary"),
            Self::Script => write!(f, "script"),
        }
    }
}

/// User-declared identity of an installable package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageDefinition {
    /// Repository path, `owner/repo`
    pub path: String,
    /// Name of the executable once installed; the catalog lookup key
    pub executable_name: String,
    /// `binary` or `script`, validated by the catalog loader
    #[serde(rename = "type")]
    pub kind: String,
    /// Advisory dependencies, reported but not installed
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,
}

impl PackageDefinition {
    /// Create a definition of the given kind.
    pub fn new(
        path: impl Into<String>,
        executable_name: impl Into<String>,
        kind: PackageKind,
    ) -> Self {
        Self {
            path: path.into(),
            executable_name: executable_name.into(),
            kind: kind.to_string(),
            depends_on: Vec::new(),
        }
    }

    /// The parsed kind, or `None` when the declared type is unknown.
    #[must_use]
    pub fn package_kind(&self) -> Option<PackageKind> {
        PackageKind::parse(&self.kind)
    }
}

/// The document a remote serves: `{packages: [...]}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DefinitionList {
    /// Definitions in declaration order
    #[serde(default)]
    pub packages: Vec<PackageDefinition>,
}

/// A catalog entry: a definition enriched with live metadata and derived
/// installation state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Package {
    /// Repository name
    pub name: String,
    /// `owner/repo` as reported by the host
    pub full_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub primary_language: String,
    #[serde(default)]
    pub updated_at: String,
    /// Tag of the newest published release
    #[serde(default)]
    pub latest_version: String,
    pub executable_name: String,
    #[serde(rename = "type", default)]
    pub kind: PackageKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,
    /// Versions recorded in the installation store, derived
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub installed_versions: Vec<String>,
    /// Non-empty aliases recorded in the installation store, derived
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
    /// Location of an unmanaged executable with the same name, derived
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conflict_path: Option<String>,
}

impl Package {
    /// Whether listings should show this package.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        !HIDDEN_PACKAGES.contains(&self.executable_name.as_str())
    }

    /// Whether any version of this package is recorded as installed.
    #[must_use]
    pub fn is_installed(&self) -> bool {
        !self.installed_versions.is_empty()
    }
}

/// A downloadable file attached to a release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub name: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub download_url: String,
    /// Tag of the release the asset belongs to
    #[serde(default)]
    pub tag: String,
}

/// A published release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Release {
    pub tag: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub draft: bool,
    #[serde(default)]
    pub prerelease: bool,
    #[serde(default)]
    pub assets: Vec<Asset>,
}

impl Release {
    /// Whether the release is usable: neither a draft nor a prerelease.
    #[must_use]
    pub const fn is_published(&self) -> bool {
        !self.draft && !self.prerelease
    }

    /// Whether `version` names this release by tag or by title.
    #[must_use]
    pub fn matches_version(&self, version: &str) -> bool {
        self.tag.eq_ignore_ascii_case(version) || self.name.eq_ignore_ascii_case(version)
    }
}

/// Durable record of one installed executable.
///
/// `real_name` is the file name under the bin directory and the unique key of
/// the installation store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallationRecord {
    /// Install time in unix milliseconds
    pub timestamp: i64,
    /// `owner/repo` of the package
    #[serde(alias = "package")]
    pub package_full_name: String,
    pub executable_name: String,
    /// Empty when installed under the executable name
    #[serde(default)]
    pub alias: String,
    pub real_name: String,
    pub version: String,
}

impl InstallationRecord {
    /// Whether the record was installed under an alias.
    #[must_use]
    pub fn is_aliased(&self) -> bool {
        !self.alias.is_empty()
    }

    /// Whether `latest` counts as the installed version.
    ///
    /// Tags are opaque, so the rule is containment after trimming: `v1.0.0` is
    /// current against `v1.0.0-beta-v1.0.0`.
    #[must_use]
    pub fn is_current_against(&self, latest: &str) -> bool {
        latest.trim().contains(self.version.trim())
    }

    /// Whether listings should show this record.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        !HIDDEN_PACKAGES.contains(&self.executable_name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_is_current_against_containing_tag() {
        let record = InstallationRecord {
            version: " v1.0.0\n".to_string(),
            ..InstallationRecord::default()
        };
        assert!(record.is_current_against("v1.0.0"));
        assert!(record.is_current_against("v1.0.0-beta-v1.0.0 "));
        assert!(!record.is_current_against("v1.1.0"));
    }

    #[test]
    fn test_kind_parsing_is_case_insensitive() {
        assert_eq!(PackageKind::parse("Binary"), Some(PackageKind::Binary));
        assert_eq!(PackageKind::parse("SCRIPT"), Some(PackageKind::Script));
        assert_eq!(PackageKind::parse("library"), None);
        assert_eq!(RemoteKind::parse("GitHub"), Some(RemoteKind::HostedCatalog));
        assert_eq!(RemoteKind::parse("ftp"), None);
    }

    #[test]
    fn test_definition_list_yaml() {
        let yaml = r#"
packages:
  - path: owner/tool
    executableName: tool
    type: binary
    dependsOn: [jq]
  - path: owner/script
    executableName: script
    type: script
"#;
        let list: DefinitionList = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(list.packages.len(), 2);
        assert_eq!(list.packages[0].depends_on, vec!["jq"]);
        assert_eq!(list.packages[1].package_kind(), Some(PackageKind::Script));
        assert!(list.packages[1].depends_on.is_empty());
    }

    #[test]
    fn test_installation_record_accepts_legacy_package_key() {
        let yaml = r#"
timestamp: 1700000000000
package: owner/tool
executableName: tool
alias: ""
realName: tool
version: v1.0.0
"#;
        let record: InstallationRecord = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(record.package_full_name, "owner/tool");
        assert!(!record.is_aliased());
    }

    #[test]
    fn test_release_matches_tag_or_name() {
        let release = Release {
            tag: "v1.2.0".to_string(),
            name: "Spring Release".to_string(),
            created_at: String::new(),
            draft: false,
            prerelease: false,
            assets: vec![],
        };
        assert!(release.matches_version("V1.2.0"));
        assert!(release.matches_version("spring release"));
        assert!(!release.matches_version("v1.2"));
    }

    #[test]
    fn test_hidden_packages_are_not_visible() {
        let package = Package {
            executable_name: "gh".to_string(),
            ..Package::default()
        };
        assert!(!package.is_visible());
    }
}
