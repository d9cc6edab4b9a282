//! Workspace file watching.
//!
//! The three workspace files stand in for the editor buffers. A
//! [`WorkspaceWatcher`] watches the workspace directory and forwards every
//! content change of one of those files to the session as an [`Edit`].
//! Editors often emit several events per save (or save through a rename), so
//! a file is only forwarded when its content differs from what was last sent.

use anyhow::{Context, Result};
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher as _};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;

use crate::constants::{DATA_FILE, STYLESHEET_FILE, TEMPLATE_FILE};
use crate::session::Edit;

/// One of the three buffers backed by a workspace file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkspaceFile {
    /// `template.html`
    Template,
    /// `style.css`
    Stylesheet,
    /// `data.json`
    Data,
}

impl WorkspaceFile {
    /// All workspace files.
    pub const ALL: [WorkspaceFile; 3] =
        [WorkspaceFile::Template, WorkspaceFile::Stylesheet, WorkspaceFile::Data];

    /// File name inside the workspace.
    pub const fn file_name(self) -> &'static str {
        match self {
            WorkspaceFile::Template => TEMPLATE_FILE,
            WorkspaceFile::Stylesheet => STYLESHEET_FILE,
            WorkspaceFile::Data => DATA_FILE,
        }
    }

    /// Which workspace file `path` is, judged by its file name.
    pub fn from_path(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_str()?;
        Self::ALL.into_iter().find(|file| file.file_name() == name)
    }

    /// The edit carrying `content` for this file.
    pub fn edit(self, content: String) -> Edit {
        match self {
            WorkspaceFile::Template => Edit::Markup(content),
            WorkspaceFile::Stylesheet => Edit::Stylesheet(content),
            WorkspaceFile::Data => Edit::DataText(content),
        }
    }
}

/// Forwards workspace file changes as edits until dropped.
pub struct WorkspaceWatcher {
    _watcher: RecommendedWatcher,
    root: PathBuf,
}

impl WorkspaceWatcher {
    /// Watch `root` and send edits into `edits`.
    ///
    /// `initial` holds the content the session already has for each file, so
    /// the first event for an unchanged file is not forwarded.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform watcher cannot be created or the
    /// directory cannot be watched.
    pub fn start(
        root: &Path,
        edits: mpsc::Sender<Edit>,
        initial: HashMap<WorkspaceFile, String>,
    ) -> Result<Self> {
        let mut forwarder = Forwarder {
            last_sent: initial,
            edits,
        };

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => forwarder.handle(&event),
                Err(e) => tracing::warn!("File watch error: {}", e),
            },
            Config::default(),
        )
        .context("Failed to create file watcher")?;

        watcher
            .watch(root, RecursiveMode::NonRecursive)
            .with_context(|| format!("Failed to watch {}", root.display()))?;

        tracing::info!("Watching {}", root.display());
        Ok(Self {
            _watcher: watcher,
            root: root.to_path_buf(),
        })
    }

    /// The watched directory.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

struct Forwarder {
    last_sent: HashMap<WorkspaceFile, String>,
    edits: mpsc::Sender<Edit>,
}

impl Forwarder {
    fn handle(&mut self, event: &Event) {
        if !matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_)) {
            return;
        }

        for path in &event.paths {
            let Some(file) = WorkspaceFile::from_path(path) else {
                continue;
            };
            // A rename-based save can report the path before the new file lands.
            let Ok(content) = std::fs::read_to_string(path) else {
                continue;
            };
            if let Some(edit) = self.accept(file, content) {
                tracing::debug!("{} changed", file.file_name());
                // Runs on the watcher's own thread, outside the runtime.
                if self.edits.blocking_send(edit).is_err() {
                    tracing::debug!("Session closed, dropping file change");
                }
            }
        }
    }

    fn accept(&mut self, file: WorkspaceFile, content: String) -> Option<Edit> {
        if self.last_sent.get(&file) == Some(&content) {
            return None;
        }
        self.last_sent.insert(file, content.clone());
        Some(file.edit(content))
    }
}
