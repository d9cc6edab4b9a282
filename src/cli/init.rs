//! Create a starter workspace.
//!
//! Writes `template.html`, `style.css` and `data.json` with the built-in
//! starter document. Existing files are left alone unless `--force` is given.
//!
//! # Examples
//!
//! ```bash
//! livetpl init
//! livetpl init my-page
//! livetpl init my-page --force
//! ```

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

use crate::core::LivetplError;
use crate::session::TemplateDocument;
use crate::watcher::WorkspaceFile;

/// Command to create a starter workspace.
#[derive(Args, Debug)]
pub struct InitCommand {
    /// Workspace directory (defaults to the current directory)
    dir: Option<PathBuf>,

    /// Overwrite existing workspace files
    #[arg(short, long)]
    force: bool,
}

impl InitCommand {
    /// Write the starter files.
    ///
    /// # Errors
    ///
    /// Returns [`LivetplError::WorkspaceFileExists`] if a file exists and
    /// `--force` was not given, or an I/O error if writing fails.
    pub async fn execute(self) -> Result<()> {
        let root = super::common::workspace_dir(self.dir);
        let starter = TemplateDocument::default();
        let files = [
            (WorkspaceFile::Template, starter.markup.as_str()),
            (WorkspaceFile::Stylesheet, starter.stylesheet.as_str()),
            (WorkspaceFile::Data, starter.data.text()),
        ];

        if !self.force {
            for (file, _) in &files {
                let path = root.join(file.file_name());
                if path.exists() {
                    return Err(LivetplError::WorkspaceFileExists {
                        path: path.display().to_string(),
                    }
                    .into());
                }
            }
        }

        tokio::fs::create_dir_all(&root)
            .await
            .with_context(|| format!("Failed to create {}", root.display()))?;

        for (file, content) in files {
            let path = root.join(file.file_name());
            let mut content = content.to_string();
            if !content.ends_with('\n') {
                content.push('\n');
            }
            tokio::fs::write(&path, content)
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("{} Created {}", "✓".green(), path.display());
        }

        println!("\n{}", "Next steps:".cyan());
        println!("  Run {} to start the live preview", "livetpl watch".bright_white());

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_init_creates_workspace_files() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("site");
        let cmd = InitCommand {
            dir: Some(dir.clone()),
            force: false,
        };
        cmd.execute().await.unwrap();

        for file in WorkspaceFile::ALL {
            assert!(dir.join(file.file_name()).exists());
        }
        let data = std::fs::read_to_string(dir.join("data.json")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&data).unwrap();
        assert_eq!(value["name"], "World");
    }

    #[tokio::test]
    async fn test_init_refuses_to_overwrite() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("style.css"), "mine").unwrap();

        let cmd = InitCommand {
            dir: Some(temp.path().to_path_buf()),
            force: false,
        };
        let err = cmd.execute().await.unwrap_err();
        assert!(err.to_string().contains("already exists"));
        assert_eq!(std::fs::read_to_string(temp.path().join("style.css")).unwrap(), "mine");
        assert!(!temp.path().join("template.html").exists());
    }

    #[tokio::test]
    async fn test_init_force_overwrites() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("style.css"), "mine").unwrap();

        let cmd = InitCommand {
            dir: Some(temp.path().to_path_buf()),
            force: true,
        };
        cmd.execute().await.unwrap();
        assert_ne!(std::fs::read_to_string(temp.path().join("style.css")).unwrap(), "mine");
    }
}
