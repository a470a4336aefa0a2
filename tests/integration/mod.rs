//! Integration test suite for burrow
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! - **commands**: the `burrow` binary against a temporary `BURROW_HOME`
//! - **install_flow**: install, upgrade and uninstall through the library with
//!   an in-memory host

mod commands;
mod install_flow;

use assert_cmd::Command;
use std::path::Path;

/// `burrow` with its root under `home`, no spinners and no colors.
pub fn burrow(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("burrow").unwrap();
    cmd.env("BURROW_HOME", home)
        .env("BURROW_NO_PROGRESS", "1")
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG");
    cmd
}
