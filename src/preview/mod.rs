//! Sandboxed preview rendering.
//!
//! The preview shows a body and a stylesheet inside an isolated browsing
//! context: an `<iframe>` with `sandbox="allow-scripts"` and no
//! `allow-same-origin`, so previewed scripts run with an opaque origin and
//! cannot reach the host page. Each render replaces the whole frame content;
//! nothing carries over between renders.
//!
//! Isolation is the only protection offered. The previewed document is not
//! sanitized; only the `srcdoc` attribute value is encoded, which is what lets
//! the frame contain the document in the first place.

use anyhow::{Context, Result};
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;

use crate::constants::PREVIEW_FILE;
use crate::document::RESET_CSS;

/// What one preview render shows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PreviewFrame {
    /// Compiled output, or raw markup when compilation failed
    pub body: String,
    /// User stylesheet
    pub stylesheet: String,
}

impl PreviewFrame {
    /// A frame showing `body` styled by `stylesheet`.
    pub fn new(body: impl Into<String>, stylesheet: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            stylesheet: stylesheet.into(),
        }
    }
}

/// Something that can display a preview frame.
pub trait PreviewHost: Send {
    /// Replace the displayed content with `frame`.
    fn render(&mut self, frame: &PreviewFrame) -> Result<()>;
}

/// The document loaded inside the isolated context.
pub fn isolated_document(frame: &PreviewFrame) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
         <style>\n{RESET_CSS}\n</style>\n<style>\n{}\n</style>\n</head>\n\
         <body>\n{}\n</body>\n</html>\n",
        frame.stylesheet, frame.body
    )
}

/// Encode `value` for a double-quoted HTML attribute.
fn encode_attribute(value: &str) -> String {
    value.replace('&', "&amp;").replace('"', "&quot;")
}

/// Wrap `document` in a script-enabled, origin-isolated iframe.
pub fn sandboxed_frame(document: &str) -> String {
    format!(
        "<iframe title=\"preview\" sandbox=\"allow-scripts\" srcdoc=\"{}\"></iframe>",
        encode_attribute(document)
    )
}

/// The host page that embeds the sandboxed frame full-window.
pub fn host_page(frame: &PreviewFrame) -> String {
    let iframe = sandboxed_frame(&isolated_document(frame));
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>livetpl preview</title>\n\
         <style>html, body {{ margin: 0; height: 100%; }} \
         iframe {{ border: 0; width: 100%; height: 100%; display: block; }}</style>\n\
         </head>\n<body>\n{iframe}\n</body>\n</html>\n"
    )
}

/// Writes the host page to `<dir>/index.html` on every render.
#[derive(Debug, Clone)]
pub struct FilePreviewHost {
    dir: PathBuf,
}

impl FilePreviewHost {
    /// A host writing into `dir`, created on first render if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
        }
    }

    /// Path of the host page.
    pub fn page_path(&self) -> PathBuf {
        self.dir.join(PREVIEW_FILE)
    }
}

impl PreviewHost for FilePreviewHost {
    fn render(&mut self, frame: &PreviewFrame) -> Result<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create preview directory {}", self.dir.display()))?;

        let page = host_page(frame);
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(page.as_bytes())?;
        tmp.flush()?;
        let path = self.page_path();
        tmp.persist(&path)
            .with_context(|| format!("Failed to write preview {}", path.display()))?;

        tracing::debug!("Preview written to {}", path.display());
        Ok(())
    }
}

/// Keeps the last isolated document in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryPreviewHost {
    document: Option<String>,
    frame: Option<PreviewFrame>,
    renders: usize,
}

impl MemoryPreviewHost {
    /// A host that has rendered nothing yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// The isolated document of the last render.
    pub fn document(&self) -> Option<&str> {
        self.document.as_deref()
    }

    /// The last rendered frame.
    pub fn frame(&self) -> Option<&PreviewFrame> {
        self.frame.as_ref()
    }

    /// How many renders happened.
    pub fn renders(&self) -> usize {
        self.renders
    }
}

impl PreviewHost for MemoryPreviewHost {
    fn render(&mut self, frame: &PreviewFrame) -> Result<()> {
        self.document = Some(isolated_document(frame));
        self.frame = Some(frame.clone());
        self.renders += 1;
        Ok(())
    }
}
