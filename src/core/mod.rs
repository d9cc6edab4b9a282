//! Core error types and user-facing error reporting.
//!
//! - [`LivetplError`] - failures that end a CLI command
//! - [`ErrorContext`] - colored, suggestion-bearing wrapper for display
//! - [`user_friendly_error`] - converts any [`anyhow::Error`] for display

pub mod error;

pub use error::{ErrorContext, LivetplError, user_friendly_error};
