//! Template compilation for livetpl.
//!
//! This module turns the markup buffer into the preview body. It wraps two
//! external template engines plus a pass-through mode behind a single
//! [`Compiler::compile`] call that takes the engine by name.
//!
//! # Engines
//!
//! | Selector     | Engine                     | Syntax                                   |
//! |--------------|----------------------------|------------------------------------------|
//! | `html`       | pass-through               | none, markup is returned unchanged       |
//! | `handlebars` | [`handlebars`] crate       | `{{name}}`, `{{#if}}…{{/if}}`, `{{#each}}` |
//! | `tera`       | [`tera`] crate             | `{{ name }}`, `{% if %}…{% endif %}`     |
//!
//! Both logic engines are process-wide immutable singletons created once with a
//! fixed configuration and injected into the [`Compiler`] through an
//! [`EngineRegistry`]. Additional engines are registered by name with a render
//! function; callers never change.
//!
//! # Errors
//!
//! A malformed template or a rendering failure yields a [`CompileError`]. That
//! is the only error type [`Compiler::compile`] returns, and it never returns a
//! partially rendered string as success. Callers that display output use
//! [`Compiler::compile_or_fallback`], which logs the error and falls back to the
//! raw markup so the preview never goes blank.
//!
//! # Examples
//!
//! ```rust
//! use livetpl::templating::{Compiler, Engine};
//! use serde_json::json;
//!
//! let compiler = Compiler::default();
//! let out = compiler
//!     .compile_engine("Hello {{name}}", &json!({"name": "World"}), Engine::Handlebars)
//!     .unwrap();
//! assert_eq!(out, "Hello World");
//! ```

mod cache;
mod compiler;
mod engine;
mod error;
mod registry;
mod renderer;

pub use compiler::{CompilationResult, Compiler};
pub use engine::Engine;
pub use error::{CompileError, EngineParseError};
pub use registry::{EngineRegistry, TemplateEngine};
pub use renderer::{
    HandlebarsEngine, PassthroughEngine, TeraEngine, format_tera_error, handlebars_engine,
    tera_engine,
};
