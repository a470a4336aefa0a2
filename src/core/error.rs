//! Error handling for burrow
//!
//! Errors follow two rules:
//! 1. **Strongly-typed errors** ([`BurrowError`]) for the failure cases callers
//!    need to tell apart (a missing release, a conflicting executable, ...)
//! 2. **User-friendly messages** ([`ErrorContext`]) with an optional detail line
//!    and a suggestion, printed by the binary before exiting with status 1
//!
//! Application code returns [`anyhow::Result`] and attaches context with
//! `.context()`/`.with_context()`. The typed error survives the conversion and
//! is recovered by [`user_friendly_error`] through `downcast_ref`.
//!
//! # Propagation
//!
//! Batch operations (remote catalog loading, metadata fetching) log a warning
//! and carry on when a single item fails. Single-package operations
//! (install, uninstall, version selection) fail fast.
//!
//! # Examples
//!
//! ```rust,no_run
//! use burrow_cli::core::{BurrowError, user_friendly_error};
//!
//! let error = anyhow::Error::from(BurrowError::NoReleases {
//!     package: "owner/tool".to_string(),
//! });
//! user_friendly_error(error).display();
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// Every failure burrow distinguishes.
///
/// Variants carry owned strings so the enum stays `Clone` and can be moved
/// across task boundaries during the concurrent metadata fetch.
#[derive(Error, Debug, Clone)]
pub enum BurrowError {
    /// A remote could not be fetched, parsed or validated.
    #[error("Failed to load remote {url}: {reason}")]
    RemoteLoad {
        /// Remote URL as declared in the repositories configuration
        url: String,
        /// What went wrong
        reason: String,
    },

    /// The host API could not describe a package.
    #[error("Failed to fetch metadata for {package}: {reason}")]
    MetadataFetch {
        /// Repository path (`owner/repo`)
        package: String,
        /// What went wrong
        reason: String,
    },

    /// The repository has no usable release.
    #[error("No releases found for {package}")]
    NoReleases {
        /// Repository full name
        package: String,
    },

    /// No release asset matches the host platform or the executable name.
    #[error("No asset of {package} matches {wanted}")]
    AssetNotFound {
        /// Repository full name
        package: String,
        /// What was being matched (platform or executable name)
        wanted: String,
    },

    /// An archive could not be unpacked or did not contain the executable.
    #[error("Failed to extract {archive}: {reason}")]
    Extraction {
        /// Archive file name
        archive: String,
        /// What went wrong
        reason: String,
    },

    /// An unmanaged executable with the same name already exists on PATH.
    #[error("'{name}' conflicts with an executable already on your PATH at {path}")]
    Conflict {
        /// Executable name or alias being installed
        name: String,
        /// Location of the foreign executable
        path: String,
    },

    /// The requested version is not among the published releases.
    #[error("Version '{version}' not found for {package}")]
    VersionNotFound {
        /// Repository full name
        package: String,
        /// Requested tag or release name
        version: String,
    },

    /// The catalog has no package with this executable name.
    #[error("Could not find the package '{name}'")]
    PackageNotFound {
        /// Executable name that was looked up
        name: String,
    },

    /// No installation record exists under this name.
    #[error("No installation found for {name}")]
    InstallationNotFound {
        /// Real name on disk
        name: String,
    },

    /// The reserved self name was used without self-upgrade authorization.
    #[error("'{name}' is reserved and cannot be managed this way")]
    ReservedName {
        /// The reserved name
        name: String,
    },

    /// A `name@version` token could not be parsed.
    #[error("Invalid package specification '{spec}'")]
    InvalidPackageSpec {
        /// The offending token
        spec: String,
    },

    /// The user declined the asset confirmation prompt.
    #[error("Installation of {package} was cancelled")]
    ConfirmationDeclined {
        /// Repository full name
        package: String,
    },

    /// An interrupt signal arrived while a long operation was running.
    #[error("Interrupted")]
    Interrupted,

    /// A host CLI subprocess exited unsuccessfully.
    #[error("Host command failed: {operation}")]
    HostCommand {
        /// Subcommand that was run
        operation: String,
        /// Captured standard error
        stderr: String,
    },

    /// The host CLI binary is not installed.
    #[error("The gh CLI is not installed or not found in PATH")]
    HostCliNotFound,

    /// A plain HTTP request failed.
    #[error("HTTP request to {url} failed: {reason}")]
    Http {
        /// Requested URL
        url: String,
        /// What went wrong
        reason: String,
    },

    /// Configuration could not be read or written.
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// Catch-all for errors without a dedicated variant.
    #[error("{message}")]
    Other {
        /// Rendered message, including any cause chain
        message: String,
    },
}

/// A [`BurrowError`] with optional details and a suggestion for the user.
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: BurrowError,
    /// Hint describing how to fix the problem
    pub suggestion: Option<String>,
    /// Extra explanation shown under the error line
    pub details: Option<String>,
}

impl ErrorContext {
    /// Wrap an error without any suggestion or details.
    #[must_use]
    pub const fn new(error: BurrowError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Attach a suggestion.
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Attach details.
    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print the error to stderr with colors.
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error into an [`ErrorContext`] suitable for the terminal.
///
/// A [`BurrowError`] anywhere in the chain gets a tailored suggestion. IO
/// permission failures are recognised as well. Anything else is rendered with
/// its full cause chain.
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    if let Some(ctx) = error.downcast_ref::<ErrorContext>() {
        return ErrorContext {
            error: ctx.error.clone(),
            suggestion: ctx.suggestion.clone(),
            details: ctx.details.clone(),
        };
    }

    for cause in error.chain() {
        if let Some(burrow_error) = cause.downcast_ref::<BurrowError>() {
            let mut ctx = create_error_context(burrow_error.clone());
            // Keep the outer context message when it adds information
            let outer = error.to_string();
            if ctx.details.is_none() && outer != burrow_error.to_string() {
                ctx.details = Some(outer);
            }
            return ctx;
        }

        if let Some(io_error) = cause.downcast_ref::<std::io::Error>() {
            if io_error.kind() == std::io::ErrorKind::PermissionDenied {
                return ErrorContext::new(BurrowError::Other {
                    message: error.to_string(),
                })
                .with_suggestion(
                    "Check the permissions of the burrow root directory, or point BURROW_HOME at a writable location",
                );
            }
        }
    }

    let mut message = error.to_string();
    let chain: Vec<String> = error.chain().skip(1).map(ToString::to_string).collect();
    if !chain.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }

    ErrorContext::new(BurrowError::Other {
        message,
    })
}

fn create_error_context(error: BurrowError) -> ErrorContext {
    match &error {
        BurrowError::PackageNotFound {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Try running 'burrow update' first to refresh the package list"),
        BurrowError::InstallationNotFound {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Run 'burrow installed' to see the names of installed packages"),
        BurrowError::Conflict {
            ..
        } => ErrorContext::new(error).with_suggestion(
            "Install under a different name with --alias, or remove the other executable first",
        ),
        BurrowError::VersionNotFound {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Run 'burrow info <name>' to see the latest version"),
        BurrowError::AssetNotFound {
            ..
        } => ErrorContext::new(error)
            .with_details("None of the release assets looks like a build for this system"),
        BurrowError::HostCliNotFound => ErrorContext::new(error)
            .with_suggestion("Install the GitHub CLI from https://cli.github.com/ and run 'gh auth login'"),
        BurrowError::HostCommand {
            stderr,
            ..
        } => {
            let details = stderr.trim().to_string();
            let ctx = ErrorContext::new(error.clone());
            let ctx = if details.is_empty() {
                ctx
            } else {
                ctx.with_details(details)
            };
            ctx.with_suggestion("Check that 'gh auth status' reports a logged-in account")
        }
        BurrowError::ReservedName {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Use 'burrow upgrade burrow' to update burrow itself"),
        BurrowError::InvalidPackageSpec {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Packages are written as <name> or <name>@<version>"),
        _ => ErrorContext::new(error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_error_messages() {
        let err = BurrowError::InstallationNotFound {
            name: "tool".to_string(),
        };
        assert_eq!(err.to_string(), "No installation found for tool");

        let err = BurrowError::PackageNotFound {
            name: "tool".to_string(),
        };
        assert_eq!(err.to_string(), "Could not find the package 'tool'");
    }

    #[test]
    fn test_user_friendly_error_finds_typed_error_in_chain() {
        let result: anyhow::Result<()> = Err(BurrowError::PackageNotFound {
            name: "tool".to_string(),
        })
        .context("Failed to install tool");

        let ctx = user_friendly_error(result.unwrap_err());
        assert!(matches!(ctx.error, BurrowError::PackageNotFound { .. }));
        assert!(ctx.suggestion.unwrap().contains("burrow update"));
        assert_eq!(ctx.details.as_deref(), Some("Failed to install tool"));
    }

    #[test]
    fn test_user_friendly_error_generic_includes_chain() {
        let inner = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err = anyhow::Error::from(inner).context("reading cache");
        let ctx = user_friendly_error(err);
        let message = ctx.error.to_string();
        assert!(message.contains("reading cache"));
        assert!(message.contains("Caused by"));
        assert!(message.contains("missing"));
    }

    #[test]
    fn test_error_context_display() {
        let ctx = ErrorContext::new(BurrowError::HostCliNotFound)
            .with_details("details here")
            .with_suggestion("do this");
        let rendered = ctx.to_string();
        assert!(rendered.contains("gh CLI"));
        assert!(rendered.contains("Details: details here"));
        assert!(rendered.contains("Suggestion: do this"));
    }
}
