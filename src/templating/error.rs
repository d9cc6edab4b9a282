//! Template compilation errors.
//!
//! [`CompileError`] is the only error a [`Compiler`](super::Compiler) returns.
//! It is an expected, recoverable condition: while a template is being edited
//! it is malformed most of the time, so callers are required to catch it and
//! fall back to the raw markup.

use thiserror::Error;

/// Failure to turn markup into rendered output.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    /// The markup is not valid syntax for the engine.
    #[error("{engine} template syntax error{}: {message}", line_suffix(.line))]
    Template {
        /// Engine name the markup was compiled with
        engine: String,
        /// Cleaned-up engine message
        message: String,
        /// 1-based line number when the engine reports one
        line: Option<usize>,
    },

    /// The markup parsed but rendering it against the data failed
    /// (undefined helper, undefined variable, type mismatch...).
    #[error("{engine} render error: {message}")]
    Render {
        /// Engine name the markup was rendered with
        engine: String,
        /// Cleaned-up engine message
        message: String,
    },

    /// No engine is registered under the requested name.
    #[error("No template engine registered as '{name}'")]
    UnknownEngine {
        /// The requested name
        name: String,
    },
}

impl CompileError {
    /// Name of the engine that produced the error.
    pub fn engine(&self) -> &str {
        match self {
            CompileError::Template {
                engine,
                ..
            }
            | CompileError::Render {
                engine,
                ..
            } => engine,
            CompileError::UnknownEngine {
                name,
            } => name,
        }
    }
}

fn line_suffix(line: &Option<usize>) -> String {
    match line {
        Some(line) => format!(" at line {line}"),
        None => String::new(),
    }
}

/// An engine selector string outside `html`, `handlebars`, `tera`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown engine '{value}' (expected one of: html, handlebars, tera)")]
pub struct EngineParseError {
    /// The rejected selector
    pub value: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_error_display_with_line() {
        let error = CompileError::Template {
            engine: "handlebars".to_string(),
            message: "unclosed block".to_string(),
            line: Some(3),
        };
        assert_eq!(error.to_string(), "handlebars template syntax error at line 3: unclosed block");
    }

    #[test]
    fn test_template_error_display_without_line() {
        let error = CompileError::Template {
            engine: "tera".to_string(),
            message: "unexpected end".to_string(),
            line: None,
        };
        assert_eq!(error.to_string(), "tera template syntax error: unexpected end");
    }

    #[test]
    fn test_engine_accessor() {
        let error = CompileError::UnknownEngine {
            name: "liquid".to_string(),
        };
        assert_eq!(error.engine(), "liquid");
    }
}
