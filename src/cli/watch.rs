//! Live preview of a workspace.
//!
//! Starts a session from the persisted state, overlays whichever workspace
//! files exist, and keeps `<preview-dir>/index.html` up to date while the
//! files are edited. Ctrl-C stops the session after flushing pending
//! persistence.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::time::Instant;

use super::common::{WorkspaceContents, open_bridge, read_workspace, workspace_dir};
use crate::config::{GlobalConfig, resolve_engine};
use crate::persistence::{Field, FileStore, PersistenceBridge};
use crate::preview::FilePreviewHost;
use crate::session::{Session, SessionHandle, TemplateDocument};
use crate::templating::{Compiler, Engine};
use crate::watcher::WorkspaceWatcher;

/// Command to run a live preview session.
#[derive(Args, Debug)]
pub struct WatchCommand {
    /// Workspace directory (defaults to the current directory)
    dir: Option<PathBuf>,

    /// Template engine (html, handlebars, tera)
    #[arg(short, long)]
    engine: Option<Engine>,

    /// Directory to write the preview page into
    #[arg(long)]
    preview_dir: Option<PathBuf>,
}

impl WatchCommand {
    /// Run until interrupted.
    pub async fn execute(self, config: &GlobalConfig) -> Result<()> {
        let root = workspace_dir(self.dir.clone());
        if !root.is_dir() {
            anyhow::bail!("Workspace directory {} does not exist", root.display());
        }
        let preview_dir = self.preview_dir.clone().unwrap_or_else(|| config.preview_dir(&root));

        let contents = read_workspace(&root).await?;
        let mut bridge = open_bridge(config)?;
        let document = seed_document(&mut bridge, &contents, self.engine, config, Instant::now());

        let preview = FilePreviewHost::new(&preview_dir);
        let page = preview.page_path();
        let session = Session::new(document, Arc::new(Compiler::default()), bridge, preview)
            .with_settle_window(config.settle_window())
            .with_default_title(config.document.default_title.clone());

        let handle = SessionHandle::spawn(session);
        let watcher = WorkspaceWatcher::start(&root, handle.sender(), contents.by_file())?;

        println!("{} Watching {}", "✓".green(), watcher.root().display());
        println!("  Preview: {}", page.display().to_string().bright_white());
        println!("  Press Ctrl-C to stop");

        tokio::signal::ctrl_c().await.context("Failed to listen for Ctrl-C")?;

        drop(watcher);
        handle.close().await?;
        println!("{} Session saved", "✓".green());
        Ok(())
    }
}

/// Restore the persisted document and overlay the workspace files.
///
/// Workspace content that differs from the persisted state is scheduled for
/// persistence, as is an engine given on the command line. Data text that
/// does not parse is kept as text while the persisted value stays in effect.
fn seed_document(
    bridge: &mut PersistenceBridge<FileStore>,
    contents: &WorkspaceContents,
    flag: Option<Engine>,
    config: &GlobalConfig,
    now: Instant,
) -> TemplateDocument {
    let mut document = bridge.load_document(&TemplateDocument::default());
    document.engine = resolve_engine(flag, bridge.load(Field::Engine).as_deref(), config);
    if flag.is_some() {
        bridge.persist(Field::Engine, document.engine.as_str(), now);
    }

    if let Some(markup) = &contents.markup {
        if *markup != document.markup {
            bridge.persist(Field::Html, markup.clone(), now);
            document.markup = markup.clone();
        }
    }
    if let Some(stylesheet) = &contents.stylesheet {
        if *stylesheet != document.stylesheet {
            bridge.persist(Field::Css, stylesheet.clone(), now);
            document.stylesheet = stylesheet.clone();
        }
    }
    if let Some(text) = &contents.data {
        if *text != document.data.text() {
            match document.data.edit(text.clone()) {
                Ok(value) => {
                    let serialized = serde_json::to_string_pretty(value)
                        .unwrap_or_else(|_| value.to_string());
                    bridge.persist(Field::Data, serialized, now);
                }
                Err(e) => tracing::warn!("{}; using the saved data", e),
            }
        }
    }

    document
}
