//! Compile the workspace once and print the output.

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use super::common::{command_engine, load_workspace_document, workspace_dir};
use crate::config::GlobalConfig;
use crate::core::LivetplError;
use crate::templating::{Compiler, Engine};

/// Command to render the workspace template.
#[derive(Args, Debug)]
pub struct RenderCommand {
    /// Workspace directory (defaults to the current directory)
    dir: Option<PathBuf>,

    /// Template engine (html, handlebars, tera)
    #[arg(short, long)]
    engine: Option<Engine>,
}

impl RenderCommand {
    /// Render and print.
    ///
    /// # Errors
    ///
    /// Returns [`LivetplError::Compile`] when the template does not compile,
    /// so the process exits non-zero.
    pub async fn execute(self, config: &GlobalConfig) -> Result<()> {
        let output = self.render(config).await?;
        println!("{output}");
        Ok(())
    }

    async fn render(self, config: &GlobalConfig) -> Result<String> {
        let root = workspace_dir(self.dir);
        let document = load_workspace_document(&root).await?;
        let engine = command_engine(self.engine, config)?;

        tracing::debug!("Rendering {} with {}", root.display(), engine);
        let output = Compiler::default()
            .compile_engine(&document.markup, document.data.value(), engine)
            .map_err(LivetplError::Compile)?;
        Ok(output)
    }
}
