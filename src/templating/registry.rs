//! Name-to-engine registry.
//!
//! Callers address engines by name only, so adding an engine is a single
//! [`EngineRegistry::register`] call with a render function; nothing that
//! compiles templates has to change.

use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use super::engine::Engine;
use super::error::CompileError;
use super::renderer::{PassthroughEngine, handlebars_engine, tera_engine};

/// A template-compilation strategy.
///
/// Implementations must be synchronous, must not mutate their inputs, and must
/// not touch the network or any persistent state.
pub trait TemplateEngine: Send + Sync {
    /// Render `markup` with `data` bound as the rendering context.
    fn render(&self, markup: &str, data: &Value) -> Result<String, CompileError>;
}

impl<F> TemplateEngine for F
where
    F: Fn(&str, &Value) -> Result<String, CompileError> + Send + Sync,
{
    fn render(&self, markup: &str, data: &Value) -> Result<String, CompileError> {
        self(markup, data)
    }
}

/// Engines by name.
#[derive(Clone, Default)]
pub struct EngineRegistry {
    engines: BTreeMap<String, Arc<dyn TemplateEngine>>,
}

impl EngineRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with `html`, `handlebars` and `tera` registered.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register_shared(Engine::Html.as_str(), Arc::new(PassthroughEngine));
        registry.register_shared(Engine::Handlebars.as_str(), handlebars_engine());
        registry.register_shared(Engine::Tera.as_str(), tera_engine());
        registry
    }

    /// Register (or replace) an engine under `name`.
    pub fn register<E>(&mut self, name: impl Into<String>, engine: E) -> &mut Self
    where
        E: TemplateEngine + 'static,
    {
        self.register_shared(name, Arc::new(engine))
    }

    /// Register an already shared engine under `name`.
    pub fn register_shared(
        &mut self,
        name: impl Into<String>,
        engine: Arc<dyn TemplateEngine>,
    ) -> &mut Self {
        let name = name.into();
        tracing::debug!("Registering template engine '{}'", name);
        self.engines.insert(name, engine);
        self
    }

    /// Look up an engine.
    pub fn get(&self, name: &str) -> Option<&Arc<dyn TemplateEngine>> {
        self.engines.get(name)
    }

    /// Whether an engine is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.engines.contains_key(name)
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.engines.keys().map(String::as_str)
    }
}

impl fmt::Debug for EngineRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineRegistry").field("engines", &self.engines.keys()).finish()
    }
}
