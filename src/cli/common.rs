//! Helpers shared by the command implementations.

use anyhow::Result;
use colored::Colorize;

use crate::cache::PackageCache;
use crate::config::{Context, Paths};
use crate::host::HostApi;
use crate::models::Package;
use crate::utils::progress::with_spinner;

/// Context of the current invocation, read from `$BURROW_HOME` or `~/.burrow`.
pub async fn load_context() -> Result<Context> {
    Context::load(Paths::from_env()?).await
}

/// Read the package catalog behind a spinner, refreshing it when due.
pub async fn load_catalog<H: HostApi>(ctx: &Context, host: &H, force: bool) -> Result<Vec<Package>> {
    let cache = PackageCache::new(ctx, host);
    with_spinner("Loading package list", cache.load(force)).await
}

/// Packages shown in listings.
pub fn visible(catalog: &[Package]) -> impl Iterator<Item = &Package> {
    catalog.iter().filter(|p| p.is_visible())
}

/// One catalog line: name, latest version and a short description.
#[must_use]
pub fn package_line(package: &Package) -> String {
    let mut line = format!(" {} {}", package.executable_name.bold(), package.latest_version.cyan());
    if package.is_installed() {
        line.push_str(&format!(" {}", "(installed)".green()));
    }
    let description = package.description.trim();
    if !description.is_empty() {
        line.push_str(&format!(" - {description}"));
    }
    line
}

/// Print the "nothing to show" message in the dim house style.
pub fn print_empty(message: &str) {
    println!("{}", format!(" {message}").dimmed());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_package_line_mentions_version_and_description() {
        colored::control::set_override(false);
        let package = Package {
            executable_name: "jq".to_string(),
            latest_version: "jq-1.7.1".to_string(),
            description: "Command-line JSON processor".to_string(),
            installed_versions: vec!["jq-1.7.1".to_string()],
            ..Package::default()
        };
        assert_eq!(
            package_line(&package),
            " jq jq-1.7.1 (installed) - Command-line JSON processor"
        );
    }
}
