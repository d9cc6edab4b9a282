//! The compilation engine adapter.

use serde_json::Value;
use std::sync::Arc;

use super::engine::Engine;
use super::error::CompileError;
use super::registry::EngineRegistry;

/// Outcome of compiling settled input for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompilationResult {
    /// The engine rendered the markup.
    Rendered(String),
    /// The engine failed; `fallback` is the raw markup that failed.
    Failed {
        /// Why compilation failed
        error: CompileError,
        /// The uncompiled markup, shown instead of the output
        fallback: String,
    },
}

impl CompilationResult {
    /// The body to display: the rendered output, or the raw markup on failure.
    pub fn body(&self) -> &str {
        match self {
            CompilationResult::Rendered(body) => body,
            CompilationResult::Failed {
                fallback,
                ..
            } => fallback,
        }
    }

    /// Whether compilation succeeded.
    pub fn is_rendered(&self) -> bool {
        matches!(self, CompilationResult::Rendered(_))
    }

    /// The compile error, if any.
    pub fn error(&self) -> Option<&CompileError> {
        match self {
            CompilationResult::Rendered(_) => None,
            CompilationResult::Failed {
                error,
                ..
            } => Some(error),
        }
    }
}

/// Compiles markup through the engines of an injected [`EngineRegistry`].
///
/// Compilation is synchronous and has no effect outside the compiler: it
/// never mutates its inputs and never touches the network or the store. Every
/// call renders, so data is bound at render time; the logic engines only
/// reuse parsed templates.
#[derive(Debug)]
pub struct Compiler {
    registry: Arc<EngineRegistry>,
}

impl Compiler {
    /// Create a compiler over `registry`.
    pub fn new(registry: Arc<EngineRegistry>) -> Self {
        Self {
            registry,
        }
    }

    /// Compile `markup` with `data` through the engine registered as `engine`.
    ///
    /// # Errors
    ///
    /// - [`CompileError::Template`] when the markup is malformed
    /// - [`CompileError::Render`] when rendering fails at runtime
    /// - [`CompileError::UnknownEngine`] when `engine` is not registered
    pub fn compile(&self, markup: &str, data: &Value, engine: &str) -> Result<String, CompileError> {
        let renderer = self.registry.get(engine).ok_or_else(|| CompileError::UnknownEngine {
            name: engine.to_string(),
        })?;

        tracing::debug!("Compiling {} bytes of markup with engine '{}'", markup.len(), engine);
        renderer.render(markup, data)
    }

    /// Compile with a built-in engine selector.
    pub fn compile_engine(
        &self,
        markup: &str,
        data: &Value,
        engine: Engine,
    ) -> Result<String, CompileError> {
        self.compile(markup, data, engine.as_str())
    }

    /// Compile for display: a failure is logged as a warning and turned into
    /// [`CompilationResult::Failed`] carrying the raw markup as fallback.
    pub fn compile_or_fallback(&self, markup: &str, data: &Value, engine: Engine) -> CompilationResult {
        match self.compile_engine(markup, data, engine) {
            Ok(body) => CompilationResult::Rendered(body),
            Err(error) => {
                tracing::warn!("Template compilation failed, showing raw markup: {}", error);
                CompilationResult::Failed {
                    error,
                    fallback: markup.to_string(),
                }
            }
        }
    }

}

impl Default for Compiler {
    fn default() -> Self {
        Self::new(Arc::new(EngineRegistry::with_builtins()))
    }
}
