//! Shared helpers for CLI commands.

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::config::{GlobalConfig, resolve_engine};
use crate::core::LivetplError;
use crate::persistence::{Field, FileStore, PersistenceBridge};
use crate::session::{DataBuffer, TemplateDocument};
use crate::templating::Engine;
use crate::watcher::WorkspaceFile;

/// Contents of the workspace files that exist.
#[derive(Debug, Default, Clone)]
pub struct WorkspaceContents {
    /// `template.html`
    pub markup: Option<String>,
    /// `style.css`
    pub stylesheet: Option<String>,
    /// `data.json`, raw text
    pub data: Option<String>,
}

impl WorkspaceContents {
    /// The raw contents keyed by file, for seeding the watcher.
    pub fn by_file(&self) -> HashMap<WorkspaceFile, String> {
        [
            (WorkspaceFile::Template, &self.markup),
            (WorkspaceFile::Stylesheet, &self.stylesheet),
            (WorkspaceFile::Data, &self.data),
        ]
        .into_iter()
        .filter_map(|(file, content)| content.clone().map(|c| (file, c)))
        .collect()
    }
}

/// Workspace directory, defaulting to the current directory.
pub fn workspace_dir(dir: Option<PathBuf>) -> PathBuf {
    dir.unwrap_or_else(|| PathBuf::from("."))
}

/// Read whichever workspace files exist.
pub async fn read_workspace(root: &Path) -> Result<WorkspaceContents> {
    Ok(WorkspaceContents {
        markup: read_optional(&root.join(WorkspaceFile::Template.file_name())).await?,
        stylesheet: read_optional(&root.join(WorkspaceFile::Stylesheet.file_name())).await?,
        data: read_optional(&root.join(WorkspaceFile::Data.file_name())).await?,
    })
}

async fn read_optional(path: &Path) -> Result<Option<String>> {
    if !path.exists() {
        return Ok(None);
    }
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(Some(content))
}

/// Build a document strictly from the workspace for one-shot commands.
///
/// The template must exist; a missing stylesheet is empty and missing data is
/// an empty object. Data that does not parse is an error here, unlike in a
/// live session where the last valid value is kept.
pub async fn load_workspace_document(root: &Path) -> Result<TemplateDocument> {
    let contents = read_workspace(root).await?;

    let template_path = root.join(WorkspaceFile::Template.file_name());
    let markup = contents.markup.ok_or_else(|| LivetplError::WorkspaceFileMissing {
        path: template_path.display().to_string(),
    })?;

    let data = match contents.data {
        Some(text) => DataBuffer::parse(&text).map_err(|e| LivetplError::DataFileInvalid {
            path: root.join(WorkspaceFile::Data.file_name()).display().to_string(),
            reason: e.to_string(),
        })?,
        None => DataBuffer::default(),
    };

    Ok(TemplateDocument {
        markup,
        stylesheet: contents.stylesheet.unwrap_or_default(),
        data,
        engine: Default::default(),
    })
}

/// Open the state store and its bridge with the configured windows.
pub fn open_bridge(config: &GlobalConfig) -> Result<PersistenceBridge<FileStore>> {
    let store = FileStore::open(config.state_path()?)?;
    Ok(PersistenceBridge::with_windows(store, config.persist_quiet(), config.persist_max_wait()))
}

/// Engine for a one-shot command: flag, then persisted state, then configuration.
///
/// The state store is only opened when no flag is given.
pub fn command_engine(flag: Option<Engine>, config: &GlobalConfig) -> Result<Engine> {
    if flag.is_some() {
        return Ok(resolve_engine(flag, None, config));
    }
    let persisted = open_bridge(config)?.load(Field::Engine);
    Ok(resolve_engine(None, persisted.as_deref(), config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_template_is_reported() {
        let temp = TempDir::new().unwrap();
        let err = load_workspace_document(temp.path()).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<LivetplError>(),
            Some(LivetplError::WorkspaceFileMissing { .. })
        ));
    }

    #[tokio::test]
    async fn test_optional_files_default() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("template.html"), "<p></p>").unwrap();

        let doc = load_workspace_document(temp.path()).await.unwrap();
        assert_eq!(doc.markup, "<p></p>");
        assert_eq!(doc.stylesheet, "");
        assert_eq!(doc.data.value(), &serde_json::json!({}));
    }

    #[tokio::test]
    async fn test_invalid_data_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("template.html"), "<p></p>").unwrap();
        std::fs::write(temp.path().join("data.json"), "{oops").unwrap();

        let err = load_workspace_document(temp.path()).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<LivetplError>(),
            Some(LivetplError::DataFileInvalid { .. })
        ));
    }

    #[tokio::test]
    async fn test_by_file_lists_existing_files_only() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("style.css"), "a {}").unwrap();

        let contents = read_workspace(temp.path()).await.unwrap();
        let by_file = contents.by_file();
        assert_eq!(by_file.len(), 1);
        assert_eq!(by_file.get(&WorkspaceFile::Stylesheet).map(String::as_str), Some("a {}"));
    }
}
