//! Global constants used throughout burrow.
//!
//! Timeouts, rate-limit figures, reserved names and the well-known file names
//! under the burrow root directory live here so they are discoverable in one
//! place.

use std::time::Duration;

/// Name of the burrow executable, reserved in the catalog.
///
/// Installing or uninstalling a package under this name is refused unless the
/// caller is performing a self-upgrade.
pub const SELF_NAME: &str = "burrow";

/// Repository that publishes burrow's own releases.
pub const SELF_REPOSITORY: &str = "burrow-sh/burrow";

/// Temporary name used while a self-upgrade downloads the new binary.
pub const SELF_UPGRADE_ALIAS: &str = "burrow-upgrade";

/// Executable name of the GitHub CLI, burrow's one hard runtime dependency.
pub const HOST_CLI: &str = "gh";

/// Repository that publishes the GitHub CLI.
pub const HOST_CLI_REPOSITORY: &str = "cli/cli";

/// Packages that are kept in the catalog but never shown in listings.
pub const HIDDEN_PACKAGES: [&str; 2] = [HOST_CLI, SELF_NAME];

/// The curated remote appended after every user-declared remote.
pub const GLOBAL_REMOTE_URL: &str =
    "https://raw.githubusercontent.com/burrow-sh/burrow-packages/main/packages.yaml";

/// Hourly request ceiling of the host API.
///
/// The metadata fetcher delays each call by `definitions / API_RATE_LIMIT`
/// milliseconds.
pub const API_RATE_LIMIT: u64 = 5000;

/// How long a cache snapshot is considered fresh (30 minutes).
pub const CACHE_TTL: Duration = Duration::from_secs(30 * 60);

/// Timeout for plain HTTP fetches of remote definition lists (2 seconds).
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(2);

/// Environment variable overriding the burrow root directory.
pub const HOME_ENV: &str = "BURROW_HOME";

/// Environment variable disabling spinners.
pub const NO_PROGRESS_ENV: &str = "BURROW_NO_PROGRESS";

/// Default root directory name under the user's home.
pub const ROOT_DIR_NAME: &str = ".burrow";

/// Subdirectory of the root holding installed executables.
pub const BIN_DIR_NAME: &str = "bin";

/// Subdirectory of the root used for downloads and extraction.
pub const STAGING_DIR_NAME: &str = "staging";

/// Cache snapshot file name.
pub const CACHE_FILE_NAME: &str = "cache.yaml";

/// Installation record file name.
pub const INSTALLATIONS_FILE_NAME: &str = "installations.yaml";

/// User configuration file name.
pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// Repositories configuration file name.
pub const REPOSITORIES_FILE_NAME: &str = "repositories.yaml";

/// Tar flavours the archive extractor accepts.
pub const TAR_EXTENSIONS: [&str; 9] =
    [".tar", ".tar.gz", ".tb2", ".tbz", ".tbz2", ".tgz", ".tlz", ".txz", ".tZ"];

/// Zip flavours the archive extractor accepts.
pub const ZIP_EXTENSIONS: [&str; 1] = [".zip"];
