//! Error handling for livetpl
//!
//! This module provides the application-level error type and user-friendly error
//! reporting for the `livetpl` binary. The error system follows two principles:
//! 1. **Strongly-typed errors** for precise error handling in code
//! 2. **User-friendly messages** with actionable suggestions for CLI users
//!
//! # Architecture
//!
//! - [`LivetplError`] - Enumerated failures surfaced by CLI commands
//! - [`ErrorContext`] - Wrapper that adds details and suggestions for display
//!
//! Errors that are *expected* while editing (compilation failures, invalid data
//! text, store write failures) never reach this module during a live session:
//! they are logged as warnings and the session keeps running. [`LivetplError`]
//! only covers failures that end a one-shot command such as `render` or `export`.
//!
//! # Examples
//!
//! ```rust,no_run
//! use livetpl::core::{LivetplError, ErrorContext, user_friendly_error};
//!
//! let error = LivetplError::WorkspaceFileMissing {
//!     path: "site/template.html".to_string(),
//! };
//! let ctx = user_friendly_error(anyhow::Error::from(error));
//! ctx.display(); // Shows colored error with suggestions
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

use crate::templating::CompileError;

/// Failures that end a CLI command.
#[derive(Error, Debug, Clone)]
pub enum LivetplError {
    /// A workspace file the command needs does not exist.
    #[error("Workspace file not found: {path}")]
    WorkspaceFileMissing {
        /// Path that was expected to exist
        path: String,
    },

    /// A workspace file would be overwritten without `--force`.
    #[error("Workspace file already exists: {path}")]
    WorkspaceFileExists {
        /// Path of the existing file
        path: String,
    },

    /// The sample data file is not valid JSON.
    #[error("Invalid sample data in {path}: {reason}")]
    DataFileInvalid {
        /// Path of the data file
        path: String,
        /// Parser message
        reason: String,
    },

    /// The configuration file could not be parsed or failed validation.
    #[error("Invalid configuration in {path}: {reason}")]
    ConfigInvalid {
        /// Path of the configuration file
        path: String,
        /// What is wrong with it
        reason: String,
    },

    /// A one-shot render failed.
    #[error(transparent)]
    Compile(#[from] CompileError),

    /// Catch-all with a preformatted message.
    #[error("{message}")]
    Other {
        /// Message to display
        message: String,
    },
}

/// User-facing wrapper around a [`LivetplError`] with optional details and suggestion.
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: LivetplError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context with no suggestion or details.
    #[must_use]
    pub const fn new(error: LivetplError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add details explaining the error.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print the error to stderr using terminal colors.
    ///
    /// - Error message: red and bold
    /// - Details: yellow
    /// - Suggestion: green
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

/// Convert any error to a user-friendly [`ErrorContext`].
///
/// Recognizes [`LivetplError`], [`CompileError`], [`std::io::Error`] and
/// [`toml::de::Error`]; anything else is shown with its full cause chain.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    if let Some(livetpl_error) = error.downcast_ref::<LivetplError>() {
        return create_error_context(livetpl_error.clone());
    }

    if let Some(compile_error) = error.downcast_ref::<CompileError>() {
        return create_error_context(LivetplError::Compile(compile_error.clone()));
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        match io_error.kind() {
            std::io::ErrorKind::PermissionDenied => {
                return ErrorContext::new(LivetplError::Other {
                    message: format!("Permission denied: {io_error}"),
                })
                .with_suggestion("Check file ownership and permissions of the workspace and state directories");
            }
            std::io::ErrorKind::NotFound => {
                return ErrorContext::new(LivetplError::Other {
                    message: format!("File not found: {io_error}"),
                })
                .with_suggestion("Check that the file or directory exists and the path is correct");
            }
            _ => {}
        }
    }

    if let Some(toml_error) = error.downcast_ref::<toml::de::Error>() {
        return ErrorContext::new(LivetplError::ConfigInvalid {
            path: "config.toml".to_string(),
            reason: toml_error.to_string(),
        })
        .with_suggestion("Check the TOML syntax in your livetpl configuration file");
    }

    let mut message = error.to_string();
    let chain: Vec<String> = error.chain().skip(1).map(std::string::ToString::to_string).collect();

    if !chain.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }

    ErrorContext::new(LivetplError::Other {
        message,
    })
}

fn create_error_context(error: LivetplError) -> ErrorContext {
    match &error {
        LivetplError::WorkspaceFileMissing {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Run 'livetpl init' to create the default workspace files"),
        LivetplError::WorkspaceFileExists {
            ..
        } => ErrorContext::new(error).with_suggestion("Use --force to overwrite existing files"),
        LivetplError::DataFileInvalid {
            ..
        } => ErrorContext::new(error)
            .with_details("Sample data must be a JSON value, usually an object")
            .with_suggestion("Fix the JSON syntax in data.json"),
        LivetplError::ConfigInvalid {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Fix the configuration file or remove it to use defaults"),
        LivetplError::Compile(_) => ErrorContext::new(error)
            .with_details(
                "Handlebars uses {{var}} and {{#if}}…{{/if}}; Tera uses {{ var }} and {% if %}…{% endif %}",
            )
            .with_suggestion("Fix the template, or use '--engine html' to bypass compilation"),
        LivetplError::Other {
            ..
        } => ErrorContext::new(error),
    }
}
