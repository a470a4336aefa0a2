//! Command-line interface for burrow.
//!
//! Each command lives in its own module with a clap `Args` struct and an
//! `execute()` method. Commands are thin: they build the [`Context`], pick the
//! production host client and hand off to the library modules.
//!
//! # Commands
//!
//! - `install` / `uninstall` - add or remove executables under `~/.burrow/bin`
//! - `upgrade` / `outdated` - move installs to their latest release
//! - `update` - force a refresh of the package cache
//! - `list` / `info` / `installed` - inspect the catalog and the installs
//! - `add` / `config` / `repositories` - edit and show configuration
//! - `doctor` - check the environment burrow depends on
//!
//! # Global Options
//!
//! - `--verbose` - debug logging
//! - `--quiet` - no logging at all
//! - `--no-progress` - hide spinners
//!
//! ```bash
//! burrow install jq yq@v4.40.5
//! burrow --no-progress upgrade
//! burrow add remote https://example.com/packages.yaml --type open
//! ```
//!
//! [`Context`]: crate::config::Context

mod add;
mod common;
mod config;
mod doctor;
mod info;
mod install;
mod installed;
mod list;
mod outdated;
mod repositories;
mod uninstall;
mod update;
mod upgrade;

use anyhow::Result;
use clap::{Parser, Subcommand};

/// Install prebuilt executables and scripts published as GitHub releases.
#[derive(Parser, Debug)]
#[command(
    name = "burrow",
    about = "Install prebuilt executables and scripts published as GitHub releases",
    version,
    long_about = "burrow installs executables from the releases of GitHub repositories into ~/.burrow/bin, \
                  picking the asset that matches your operating system and architecture."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Show debug output
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Suppress all logging; errors are still printed
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable spinners
    #[arg(long, global = true)]
    no_progress: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Install one or more packages (`name` or `name@version`)
    Install(install::InstallCommand),

    /// Remove installed packages by their installed name
    Uninstall(uninstall::UninstallCommand),

    /// Upgrade installed packages, or burrow itself with `upgrade burrow`
    Upgrade(upgrade::UpgradeCommand),

    /// Show installed packages that have a newer release
    Outdated(outdated::OutdatedCommand),

    /// Refresh the package cache now
    Update(update::UpdateCommand),

    /// List available packages
    List(list::ListCommand),

    /// Show details about one package
    Info(info::InfoCommand),

    /// List installed packages
    Installed(installed::InstalledCommand),

    /// Add a remote or a private package to the repositories configuration
    Add(add::AddCommand),

    /// Show or change user preferences
    Config(config::ConfigCommand),

    /// Show configured remotes and private packages
    Repositories(repositories::RepositoriesCommand),

    /// Check that burrow can work on this system
    Doctor(doctor::DoctorCommand),
}

impl Cli {
    /// Whether `--no-progress` was given.
    #[must_use]
    pub const fn no_progress(&self) -> bool {
        self.no_progress
    }

    /// Default log filter implied by the verbosity flags.
    ///
    /// `RUST_LOG` takes precedence when set.
    #[must_use]
    pub const fn log_filter(&self) -> &'static str {
        if self.quiet {
            "off"
        } else if self.verbose {
            "debug"
        } else {
            "warn"
        }
    }

    /// Run the selected command.
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Install(cmd) => cmd.execute().await,
            Commands::Uninstall(cmd) => cmd.execute().await,
            Commands::Upgrade(cmd) => cmd.execute().await,
            Commands::Outdated(cmd) => cmd.execute().await,
            Commands::Update(cmd) => cmd.execute().await,
            Commands::List(cmd) => cmd.execute().await,
            Commands::Info(cmd) => cmd.execute().await,
            Commands::Installed(cmd) => cmd.execute().await,
            Commands::Add(cmd) => cmd.execute().await,
            Commands::Config(cmd) => cmd.execute().await,
            Commands::Repositories(cmd) => cmd.execute().await,
            Commands::Doctor(cmd) => cmd.execute().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_log_filter_follows_flags() {
        let cli = Cli::parse_from(["burrow", "installed"]);
        assert_eq!(cli.log_filter(), "warn");
        assert!(!cli.no_progress());

        let cli = Cli::parse_from(["burrow", "--verbose", "installed"]);
        assert_eq!(cli.log_filter(), "debug");

        let cli = Cli::parse_from(["burrow", "installed", "-q", "--no-progress"]);
        assert_eq!(cli.log_filter(), "off");
        assert!(cli.no_progress());
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        assert!(Cli::try_parse_from(["burrow", "-v", "-q", "list"]).is_err());
    }

    #[test]
    fn test_install_arguments() {
        let cli =
            Cli::try_parse_from(["burrow", "install", "jq@v1.7", "--alias", "j", "--force", "-y"])
                .unwrap();
        let Commands::Install(cmd) = cli.command else {
            panic!("expected install");
        };
        assert_eq!(cmd.packages, vec!["jq@v1.7"]);
        assert_eq!(cmd.alias.as_deref(), Some("j"));
        assert!(cmd.force);
        assert!(cmd.yes);

        assert!(Cli::try_parse_from(["burrow", "install"]).is_err());
    }
}
