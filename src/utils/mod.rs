//! Cross-platform utilities and helpers
//!
//! # Modules
//!
//! - [`fs`] - File system operations with atomic writes and YAML helpers
//! - [`platform`] - Host platform detection and PATH lookups
//! - [`progress`] - Spinners for long-running operations
//! - [`prompt`] - Yes/no confirmation prompts
//!
//! # Example
//!
//! ```rust,no_run
//! use burrow_cli::utils::{atomic_write, ensure_dir};
//! use std::path::Path;
//!
//! # fn example() -> anyhow::Result<()> {
//! ensure_dir(Path::new("staging"))?;
//! atomic_write(Path::new("staging/notes.yaml"), b"packages: []\n")?;
//! # Ok(())
//! # }
//! ```

pub mod fs;
pub mod platform;
pub mod progress;
pub mod prompt;

pub use fs::{atomic_write, ensure_dir, read_yaml_file, write_yaml_file};
pub use platform::{Platform, find_on_path, get_home_dir};
pub use progress::{Spinner, with_spinner};
