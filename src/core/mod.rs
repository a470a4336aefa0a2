//! Core types shared by every burrow component.
//!
//! Currently this is the error vocabulary: [`BurrowError`] for typed
//! failures and [`ErrorContext`]/[`user_friendly_error`] for rendering them
//! on the terminal.

pub mod error;

pub use error::{BurrowError, ErrorContext, user_friendly_error};
