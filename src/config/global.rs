//! Global configuration for livetpl.
//!
//! The user configuration lives in `~/.livetpl/config.toml` and tunes the
//! session timing, the default engine, where state and previews go, and the
//! fallback document title. Every key is optional; a missing file is the
//! default configuration.
//!
//! # Configuration File Location
//!
//! - **Unix/macOS**: `~/.livetpl/config.toml`
//! - **Windows**: `%LOCALAPPDATA%\livetpl\config.toml`
//!
//! The location can be overridden with `--config` or the `LIVETPL_CONFIG`
//! environment variable.
//!
//! # File Format
//!
//! ```toml
//! settle_window_ms = 500
//! persist_quiet_ms = 1000
//! persist_max_wait_ms = 5000
//! default_engine = "tera"
//! state_path = "/home/me/.livetpl/state.json"
//! preview_dir = "/tmp/livetpl-preview"
//!
//! [document]
//! default_title = "Draft"
//! ```
//!
//! # Examples
//!
//! ```rust,no_run
//! use livetpl::config::GlobalConfig;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = GlobalConfig::load_with_optional(None).await?;
//! println!("Settle window: {:?}", config.settle_window());
//! # Ok(())
//! # }
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;

use crate::constants::{
    DEFAULT_DOCUMENT_TITLE, PERSIST_MAX_WAIT, PERSIST_QUIET_WINDOW, SETTLE_WINDOW,
};
use crate::core::LivetplError;
use crate::templating::Engine;

/// Environment variable that points at an alternative configuration file.
pub const CONFIG_ENV_VAR: &str = "LIVETPL_CONFIG";

const fn default_settle_window_ms() -> u64 {
    SETTLE_WINDOW.as_millis() as u64
}

const fn default_persist_quiet_ms() -> u64 {
    PERSIST_QUIET_WINDOW.as_millis() as u64
}

const fn default_persist_max_wait_ms() -> u64 {
    PERSIST_MAX_WAIT.as_millis() as u64
}

fn default_title() -> String {
    DEFAULT_DOCUMENT_TITLE.to_string()
}

/// Settings for exported documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentConfig {
    /// Title used when the sample data has no `settings.title`.
    #[serde(default = "default_title")]
    pub default_title: String,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            default_title: default_title(),
        }
    }
}

/// Global configuration structure for livetpl.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalConfig {
    /// Quiet window before an edit is recompiled, in milliseconds.
    #[serde(default = "default_settle_window_ms")]
    pub settle_window_ms: u64,

    /// Quiet window before an edited field is persisted, in milliseconds.
    #[serde(default = "default_persist_quiet_ms")]
    pub persist_quiet_ms: u64,

    /// Longest a continuously edited field may go unpersisted, in milliseconds.
    #[serde(default = "default_persist_max_wait_ms")]
    pub persist_max_wait_ms: u64,

    /// Engine used when neither `--engine` nor persisted state selects one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_engine: Option<Engine>,

    /// Location of the state store. Defaults to `~/.livetpl/state.json`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_path: Option<PathBuf>,

    /// Directory the watch preview is written to. Defaults to
    /// `<workspace>/.livetpl/preview`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview_dir: Option<PathBuf>,

    /// Export settings.
    #[serde(default)]
    pub document: DocumentConfig,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            settle_window_ms: default_settle_window_ms(),
            persist_quiet_ms: default_persist_quiet_ms(),
            persist_max_wait_ms: default_persist_max_wait_ms(),
            default_engine: None,
            state_path: None,
            preview_dir: None,
            document: DocumentConfig::default(),
        }
    }
}

impl GlobalConfig {
    /// Load from `path`, else `LIVETPL_CONFIG`, else the default location.
    ///
    /// An explicitly given path must exist. The environment and default
    /// locations fall back to defaults when the file is absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the chosen file cannot be read, parsed, or validated.
    pub async fn load_with_optional(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load_from(&path).await;
        }

        let path = match std::env::var_os(CONFIG_ENV_VAR) {
            Some(value) if !value.is_empty() => PathBuf::from(value),
            _ => Self::default_path()?,
        };
        if path.exists() {
            Self::load_from(&path).await
        } else {
            tracing::debug!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Load and validate the configuration at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid TOML for this
    /// structure, or fails [`GlobalConfig::validate`].
    pub async fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        let config: Self = toml::from_str(&content).map_err(|e| LivetplError::ConfigInvalid {
            path: path.display().to_string(),
            reason: e.message().to_string(),
        })?;

        config.validate().map_err(|reason| LivetplError::ConfigInvalid {
            path: path.display().to_string(),
            reason,
        })?;

        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Write the configuration as TOML to `path`, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails or the file cannot be written.
    pub async fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, content)
            .await
            .with_context(|| format!("Failed to write config to {}", path.display()))?;
        Ok(())
    }

    /// Check the timing settings.
    ///
    /// # Errors
    ///
    /// Returns a description of the first problem found.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.settle_window_ms == 0 {
            return Err("settle_window_ms must be greater than 0".to_string());
        }
        if self.persist_quiet_ms == 0 {
            return Err("persist_quiet_ms must be greater than 0".to_string());
        }
        if self.persist_max_wait_ms < self.persist_quiet_ms {
            return Err(format!(
                "persist_max_wait_ms ({}) must not be shorter than persist_quiet_ms ({})",
                self.persist_max_wait_ms, self.persist_quiet_ms
            ));
        }
        Ok(())
    }

    /// Path of the default configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the home (or local data) directory cannot be determined.
    pub fn default_path() -> Result<PathBuf> {
        Ok(Self::data_dir()?.join("config.toml"))
    }

    /// The resolved state store location.
    ///
    /// # Errors
    ///
    /// Returns an error if no path is configured and the home directory
    /// cannot be determined.
    pub fn state_path(&self) -> Result<PathBuf> {
        match &self.state_path {
            Some(path) => Ok(path.clone()),
            None => Ok(Self::data_dir()?.join("state.json")),
        }
    }

    /// The resolved preview directory for `workspace`.
    pub fn preview_dir(&self, workspace: &Path) -> PathBuf {
        self.preview_dir.clone().unwrap_or_else(|| workspace.join(".livetpl").join("preview"))
    }

    /// Settle quiet window.
    pub const fn settle_window(&self) -> Duration {
        Duration::from_millis(self.settle_window_ms)
    }

    /// Persistence quiet window.
    pub const fn persist_quiet(&self) -> Duration {
        Duration::from_millis(self.persist_quiet_ms)
    }

    /// Persistence max wait.
    pub const fn persist_max_wait(&self) -> Duration {
        Duration::from_millis(self.persist_max_wait_ms)
    }

    fn data_dir() -> Result<PathBuf> {
        let dir = if cfg!(target_os = "windows") {
            dirs::data_local_dir()
                .ok_or_else(|| anyhow::anyhow!("Unable to determine local data directory"))?
                .join("livetpl")
        } else {
            dirs::home_dir()
                .ok_or_else(|| anyhow::anyhow!("Unable to determine home directory"))?
                .join(".livetpl")
        };
        Ok(dir)
    }
}
