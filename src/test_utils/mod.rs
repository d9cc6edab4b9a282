//! Test utilities for livetpl
//!
//! Helpers shared by unit and integration tests: one-time logging setup and
//! a [`TestWorkspace`] that bundles a temporary workspace directory with an
//! isolated configuration file, so tests never touch `~/.livetpl`.
//!
//! # Example
//!
//! ```rust,no_run
//! use livetpl::test_utils::TestWorkspace;
//!
//! let ws = TestWorkspace::new().unwrap();
//! ws.write("template.html", "<p>{{name}}</p>").unwrap();
//! ws.write("data.json", r#"{"name": "World"}"#).unwrap();
//! assert!(ws.config_path().exists());
//! ```

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Once;
use tempfile::TempDir;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use crate::config::GlobalConfig;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Uses `level` if given, else `RUST_LOG`; with neither, logging stays off.
/// Only the first call has any effect.
///
/// ```bash
/// RUST_LOG=livetpl=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_ansi(true)
            .try_init();
    });
}

/// A temporary workspace with its own configuration and state store.
///
/// Layout:
///
/// ```text
/// <tmp>/
/// ├── workspace/        workspace files
/// ├── config.toml       config pointing state and preview into <tmp>
/// ├── state.json        state store (created on first write)
/// └── preview/          preview output
/// ```
pub struct TestWorkspace {
    temp: TempDir,
    workspace: PathBuf,
}

impl TestWorkspace {
    /// Create the workspace and write a default isolated config.
    pub fn new() -> Result<Self> {
        Self::with_config(|_| {})
    }

    /// Create the workspace, letting `customize` adjust the config first.
    pub fn with_config(customize: impl FnOnce(&mut GlobalConfig)) -> Result<Self> {
        let temp = TempDir::new()?;
        let workspace = temp.path().join("workspace");
        std::fs::create_dir_all(&workspace)?;

        let mut config = GlobalConfig {
            state_path: Some(temp.path().join("state.json")),
            preview_dir: Some(temp.path().join("preview")),
            ..GlobalConfig::default()
        };
        customize(&mut config);

        let content = toml::to_string_pretty(&config)?;
        std::fs::write(temp.path().join("config.toml"), content)?;

        Ok(Self {
            temp,
            workspace,
        })
    }

    /// The workspace directory.
    pub fn path(&self) -> &Path {
        &self.workspace
    }

    /// The isolated configuration file.
    pub fn config_path(&self) -> PathBuf {
        self.temp.path().join("config.toml")
    }

    /// The isolated state store file.
    pub fn state_path(&self) -> PathBuf {
        self.temp.path().join("state.json")
    }

    /// The isolated preview directory.
    pub fn preview_dir(&self) -> PathBuf {
        self.temp.path().join("preview")
    }

    /// Write a workspace file.
    pub fn write(&self, name: &str, content: &str) -> Result<PathBuf> {
        let path = self.workspace.join(name);
        std::fs::write(&path, content).with_context(|| format!("writing {}", path.display()))?;
        Ok(path)
    }

    /// Read a workspace file.
    pub fn read(&self, name: &str) -> Result<String> {
        let path = self.workspace.join(name);
        std::fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))
    }

    /// Seed the state store with `entries`.
    pub fn write_state(&self, entries: &[(&str, &str)]) -> Result<()> {
        let map: serde_json::Map<String, serde_json::Value> = entries
            .iter()
            .map(|(k, v)| ((*k).to_string(), serde_json::Value::String((*v).to_string())))
            .collect();
        std::fs::write(self.state_path(), serde_json::to_string_pretty(&map)?)?;
        Ok(())
    }

    /// Read one entry from the state store.
    pub fn read_state(&self, key: &str) -> Result<Option<String>> {
        let path = self.state_path();
        if !path.exists() {
            return Ok(None);
        }
        let map: serde_json::Map<String, serde_json::Value> =
            serde_json::from_str(&std::fs::read_to_string(path)?)?;
        Ok(map.get(key).and_then(|v| v.as_str()).map(str::to_string))
    }
}
