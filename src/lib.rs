//! livetpl - live HTML/CSS template editing with a sandboxed preview
//!
//! livetpl keeps three buffers (template markup, stylesheet, sample JSON
//! data) and an engine selector, recompiles the markup once an edit has
//! settled, shows the result in an origin-isolated preview, and persists the
//! buffers so a session can be resumed. Finished pages are exported as
//! standalone HTML documents.
//!
//! # Architecture
//!
//! ```text
//! Edit ─► session ─┬─► settle (500ms per field) ─► templating ─► preview
//!                  └─► persistence (1s quiet, 5s max per field) ─► store
//!
//! export: templating + document ─► standalone HTML
//! ```
//!
//! - [`templating`] - Engine adapter: `html` pass-through, Handlebars, Tera
//! - [`settle`] - Per-field debounce state and the settled compile input
//! - [`document`] - Standalone document assembly
//! - [`persistence`] - Debounced writes of the four fields to a key-value store
//! - [`preview`] - Sandboxed preview hosts
//! - [`session`] - The session state machine and its async driver
//! - [`watcher`] - Workspace files as edit sources
//! - [`cli`] - `init`, `render`, `export`, `watch`, `engines`
//!
//! # Examples
//!
//! ```rust
//! use livetpl::document::assemble_for;
//! use livetpl::templating::{Compiler, Engine};
//! use serde_json::json;
//!
//! let data = json!({"name": "World", "settings": {"title": "Hello"}});
//! let body = Compiler::default()
//!     .compile_engine("<h1>Hello {{name}}</h1>", &data, Engine::Handlebars)
//!     .unwrap();
//! let html = assemble_for(&body, "h1 { color: teal; }", &data, Engine::Handlebars);
//! assert!(html.contains("<title>Hello</title>"));
//! ```

// Core functionality modules
pub mod cli;
pub mod config;
pub mod constants;
pub mod core;

// Editing pipeline
pub mod document;
pub mod persistence;
pub mod preview;
pub mod session;
pub mod settle;
pub mod templating;
pub mod watcher;

// test_utils module is available for both unit tests and integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
