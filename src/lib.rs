//! burrow - a package manager for executables published as GitHub releases
//!
//! burrow installs prebuilt binaries and scripts straight from the releases of
//! GitHub repositories into `~/.burrow/bin`. There is no registry: packages are
//! declared by remote YAML lists and by the user's own `repositories.yaml`.
//!
//! # Architecture Overview
//!
//! ```text
//! remotes ──> source ──> metadata ──> cache (cache.yaml)
//!                                        │
//!                       installer <──────┘
//!                        │    │
//!            resolver <──┘    └──> archive ──> bin/ + installations.yaml
//! ```
//!
//! - [`source`] loads package definitions from every configured remote
//! - [`metadata`] enriches definitions with repository details and latest tags
//! - [`cache`] keeps the enriched catalog on disk with a 30 minute TTL
//! - [`resolver`] picks the release asset built for the host platform
//! - [`archive`] unpacks tar and zip archives and finds the executable inside
//! - [`installations`] records what is installed and under which name
//! - [`installer`] drives one install from name to placed executable
//! - [`upgrade`] upgrades installs, including burrow itself
//!
//! All host interaction goes through the [`host::HostApi`] trait. The
//! production [`host::GhClient`] drives the `gh` CLI; tests use an in-memory
//! fake from `test_utils`.
//!
//! # Command-Line Usage
//!
//! ```bash
//! # Install the latest release, or a pinned one
//! burrow install jq
//! burrow install yq@v4.40.5
//!
//! # Install under another name
//! burrow install ripgrep --alias rg2
//!
//! # Keep things current
//! burrow outdated
//! burrow upgrade
//! burrow upgrade burrow
//! ```

// Core functionality modules
pub mod cache;
pub mod cli;
pub mod config;
pub mod constants;
pub mod core;
pub mod host;
pub mod installations;
pub mod installer;
pub mod resolver;

// Catalog sources
pub mod metadata;
pub mod source;

// Archives and upgrades
pub mod archive;
pub mod upgrade;

// Supporting modules
pub mod models;
pub mod utils;

// test_utils module is available for both unit tests and integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
