//! Configuration management for livetpl.
//!
//! Settings come from a single user-wide TOML file (see [`GlobalConfig`]).
//! Command-line flags override it, and for the engine selector the persisted
//! session state sits between the two:
//!
//! 1. `--engine` flag
//! 2. persisted `engine` entry in the state store
//! 3. `default_engine` in the configuration file
//! 4. built-in default (`handlebars`)
//!
//! # Modules
//!
//! - `global` - The `~/.livetpl/config.toml` file

mod global;

pub use global::{CONFIG_ENV_VAR, DocumentConfig, GlobalConfig};

use crate::templating::Engine;

/// Pick the engine by precedence: flag, persisted state, configuration, default.
///
/// An unparsable persisted value is skipped with a warning.
pub fn resolve_engine(
    flag: Option<Engine>,
    persisted: Option<&str>,
    config: &GlobalConfig,
) -> Engine {
    if let Some(engine) = flag {
        return engine;
    }
    if let Some(value) = persisted {
        match value.parse::<Engine>() {
            Ok(engine) => return engine,
            Err(e) => tracing::warn!("Ignoring persisted engine: {}", e),
        }
    }
    config.default_engine.unwrap_or_default()
}
