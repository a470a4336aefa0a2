//! `burrow info`

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use super::common::{load_catalog, load_context};
use crate::core::BurrowError;
use crate::host::GhClient;
use crate::models::Package;

#[derive(Args, Debug)]
pub struct InfoCommand {
    /// Executable name of the package
    pub name: String,
}

impl InfoCommand {
    pub async fn execute(self) -> Result<()> {
        let ctx = load_context().await?;
        let host = GhClient::new()?;
        let catalog = load_catalog(&ctx, &host, false).await?;

        let package = find_package(&catalog, &self.name).ok_or_else(|| {
            BurrowError::PackageNotFound {
                name: self.name.clone(),
            }
        })?;
        print_info(package);
        Ok(())
    }
}

/// Catalog entry whose executable name matches `name`, ignoring case.
fn find_package<'c>(catalog: &'c [Package], name: &str) -> Option<&'c Package> {
    let name = name.trim();
    catalog.iter().find(|p| p.executable_name.eq_ignore_ascii_case(name))
}

fn field(label: &str, value: &str) {
    if !value.is_empty() {
        println!(" {:<20}{}", format!("{label}:").bold(), value);
    }
}

fn print_info(package: &Package) {
    field("Name", &package.executable_name);
    field("Repository", &package.full_name);
    field("Description", &package.description);
    field("Url", &package.url);
    field("Language", &package.primary_language);
    field("Type", &package.kind.to_string());
    field("Latest version", &package.latest_version);
    field("Updated at", &package.updated_at);
    field("Installed", &package.installed_versions.join(", "));
    field("Aliases", &package.aliases.join(", "));
    field("Depends on", &package.depends_on.join(", "));
    if let Some(path) = &package.conflict_path {
        println!("{}", format!(" Conflicts with the executable at {path}").yellow());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_package_ignores_case() {
        let catalog = vec![Package {
            executable_name: "ripgrep".to_string(),
            full_name: "BurntSushi/ripgrep".to_string(),
            ..Package::default()
        }];
        assert_eq!(find_package(&catalog, " RipGrep ").unwrap().full_name, "BurntSushi/ripgrep");
        assert!(find_package(&catalog, "rg").is_none());
    }
}
