//! Command-line interface for livetpl.
//!
//! # Commands
//!
//! - `init` - Write a starter workspace (`template.html`, `style.css`, `data.json`)
//! - `render` - Compile the workspace once and print the output
//! - `export` - Print or write a standalone HTML document
//! - `watch` - Run a live preview session until Ctrl-C
//! - `engines` - List the available template engines
//!
//! # Global Options
//!
//! - `--verbose` / `-v` - Debug logging
//! - `--quiet` / `-q` - Errors only
//! - `--config` / `-c` - Use an alternative configuration file
//!
//! `RUST_LOG`, when set, takes precedence over `--verbose` and `--quiet`.
//! Logs go to stderr so that `render` and `export` output can be piped.

mod common;
mod engines;
mod export;
mod init;
mod render;
mod watch;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::config::GlobalConfig;

/// Runtime configuration derived from the global flags.
///
/// Kept separate from [`Cli`] so the logging and configuration setup can be
/// driven programmatically in tests.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// Log filter directive (`debug`, `info`, `error`).
    pub log_level: Option<String>,

    /// Configuration file given with `--config`.
    pub config_path: Option<PathBuf>,
}

impl CliConfig {
    /// Create a configuration with no overrides.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the global tracing subscriber.
    ///
    /// `RUST_LOG` wins over [`CliConfig::log_level`]. Calling this more than
    /// once is harmless; later calls are ignored.
    pub fn init_logging(&self) {
        let level = self.log_level.as_deref().unwrap_or("info");
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }
}

/// Live HTML/CSS template editor with a sandboxed preview.
#[derive(Parser, Debug)]
#[command(
    name = "livetpl",
    about = "Live HTML/CSS template editor with a sandboxed preview",
    version,
    long_about = "livetpl compiles a template (plain HTML, Handlebars, or Tera) against sample JSON data, \
                  keeps a sandboxed preview up to date while you edit, and exports standalone HTML documents."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to the configuration file
    #[arg(short, long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create a starter workspace
    Init(init::InitCommand),

    /// Compile the workspace template and print the output
    Render(render::RenderCommand),

    /// Export a standalone HTML document
    Export(export::ExportCommand),

    /// Watch the workspace and keep the preview up to date
    Watch(watch::WatchCommand),

    /// List the available template engines
    Engines(engines::EnginesCommand),
}

impl Cli {
    /// Set up logging and run the selected command.
    pub async fn execute(self) -> Result<()> {
        let config = self.build_config();
        config.init_logging();
        self.execute_with_config(config).await
    }

    /// Derive the runtime configuration from the global flags.
    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            Some("debug".to_string())
        } else if self.quiet {
            Some("error".to_string())
        } else {
            Some("info".to_string())
        };

        CliConfig {
            log_level,
            config_path: self.config.clone(),
        }
    }

    /// Run the selected command with an explicit runtime configuration.
    pub async fn execute_with_config(self, config: CliConfig) -> Result<()> {
        let global = GlobalConfig::load_with_optional(config.config_path).await?;

        match self.command {
            Commands::Init(cmd) => cmd.execute().await,
            Commands::Render(cmd) => cmd.execute(&global).await,
            Commands::Export(cmd) => cmd.execute(&global).await,
            Commands::Watch(cmd) => cmd.execute(&global).await,
            Commands::Engines(cmd) => cmd.execute(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_config_log_levels() {
        let cli = Cli::try_parse_from(["livetpl", "engines"]).unwrap();
        assert_eq!(cli.build_config().log_level.as_deref(), Some("info"));

        let cli = Cli::try_parse_from(["livetpl", "-v", "engines"]).unwrap();
        assert_eq!(cli.build_config().log_level.as_deref(), Some("debug"));

        let cli = Cli::try_parse_from(["livetpl", "engines", "--quiet"]).unwrap();
        assert_eq!(cli.build_config().log_level.as_deref(), Some("error"));
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        assert!(Cli::try_parse_from(["livetpl", "-v", "-q", "engines"]).is_err());
    }

    #[test]
    fn test_config_path_is_forwarded() {
        let cli = Cli::try_parse_from(["livetpl", "--config", "/tmp/c.toml", "render"]).unwrap();
        assert_eq!(cli.build_config().config_path, Some(PathBuf::from("/tmp/c.toml")));
    }

    #[test]
    fn test_engine_and_mode_flags_parse() {
        assert!(Cli::try_parse_from(["livetpl", "export", "site", "-e", "tera", "-m", "template"]).is_ok());
        assert!(Cli::try_parse_from(["livetpl", "render", "--engine", "mustache"]).is_err());
        assert!(Cli::try_parse_from(["livetpl", "export", "--mode", "raw"]).is_err());
    }
}
