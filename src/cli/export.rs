//! Export the workspace as a standalone HTML document.
//!
//! # Examples
//!
//! ```bash
//! livetpl export > page.html
//! livetpl export --mode template -o page.hbs.html
//! livetpl export site --engine tera -o site.html
//! ```

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

use super::common::{command_engine, load_workspace_document, workspace_dir};
use crate::config::GlobalConfig;
use crate::document::ExportMode;
use crate::session::export_document;
use crate::templating::{Compiler, Engine};

/// Command to export an assembled document.
#[derive(Args, Debug)]
pub struct ExportCommand {
    /// Workspace directory (defaults to the current directory)
    dir: Option<PathBuf>,

    /// Template engine (html, handlebars, tera)
    #[arg(short, long)]
    engine: Option<Engine>,

    /// Export the raw template or the compiled output
    #[arg(short, long, default_value_t = ExportMode::Output)]
    mode: ExportMode,

    /// Write to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl ExportCommand {
    /// Assemble and write the document.
    ///
    /// A compile error in output mode does not fail the export: the raw
    /// markup is used as the body and a warning is logged.
    pub async fn execute(self, config: &GlobalConfig) -> Result<()> {
        let output = self.output.clone();
        let html = self.assemble(config).await?;

        match output {
            Some(path) => {
                tokio::fs::write(&path, html)
                    .await
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                println!("{} Exported to {}", "✓".green(), path.display());
            }
            None => print!("{html}"),
        }
        Ok(())
    }

    async fn assemble(self, config: &GlobalConfig) -> Result<String> {
        let root = workspace_dir(self.dir);
        let mut document = load_workspace_document(&root).await?;
        document.engine = command_engine(self.engine, config)?;

        Ok(export_document(
            &Compiler::default(),
            &document,
            self.mode,
            Some(config.document.default_title.as_str()),
        ))
    }
}
