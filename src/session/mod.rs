//! The live editing session.
//!
//! A [`Session`] wires the components together around one
//! [`TemplateDocument`]:
//!
//! ```text
//! Edit ──► document (live) ──► PersistenceBridge (per-field, 1s/5s)
//!            │
//!            └─► SettleController (per-field, 500ms)
//!                       │ settled
//!                       ▼
//!                   Compiler ──► PreviewHost
//! ```
//!
//! Stylesheet edits bypass settling: the stylesheet does not affect
//! compilation, so the preview is re-rendered at once with the last compiled
//! body. Persistence runs on every raw edit, independent of compilation.
//!
//! `Session` itself is synchronous and clock-agnostic; time is passed in.
//! [`SessionHandle`] runs it on a tokio task.

mod data;
mod driver;

pub use data::{DataBuffer, DataParseError};
pub use driver::SessionHandle;

use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

use crate::document::{DocumentDefaults, ExportMode, assemble};
use crate::persistence::{Field, KeyValueStore, PersistenceBridge};
use crate::preview::{PreviewFrame, PreviewHost};
use crate::settle::{SettleController, SettledInput};
use crate::templating::{CompilationResult, Compiler, Engine};

const DEFAULT_MARKUP: &str = r#"<main class="card">
  <h1>Hello, {{name}}!</h1>
  {{#if items}}
  <ul>
    {{#each items}}
    <li>{{this}}</li>
    {{/each}}
  </ul>
  {{/if}}
</main>"#;

const DEFAULT_STYLESHEET: &str = r#"body {
  font-family: system-ui, sans-serif;
  background: #f5f5f4;
}

.card {
  max-width: 32rem;
  margin: 3rem auto;
  padding: 1.5rem 2rem;
  background: #fff;
  border-radius: 0.5rem;
}"#;

/// The user's working state: markup, stylesheet, sample data and engine.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateDocument {
    /// Template markup
    pub markup: String,
    /// Stylesheet
    pub stylesheet: String,
    /// Sample data text and last valid value
    pub data: DataBuffer,
    /// Engine selector
    pub engine: Engine,
}

impl TemplateDocument {
    /// The compilation inputs of this document.
    pub fn settled_input(&self) -> SettledInput {
        SettledInput {
            markup: self.markup.clone(),
            data: self.data.value().clone(),
            engine: self.engine,
        }
    }
}

impl Default for TemplateDocument {
    fn default() -> Self {
        Self {
            markup: DEFAULT_MARKUP.to_string(),
            stylesheet: DEFAULT_STYLESHEET.to_string(),
            data: DataBuffer::new(json!({
                "name": "World",
                "items": ["Markup", "Style", "Data"],
                "settings": {
                    "title": "Hello World",
                    "description": "A starter page for livetpl"
                }
            })),
            engine: Engine::default(),
        }
    }
}

/// One user edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit {
    /// New markup text
    Markup(String),
    /// New stylesheet text
    Stylesheet(String),
    /// New data text, which may not parse
    DataText(String),
    /// Engine switch
    Engine(Engine),
}

/// Synchronous session state machine.
pub struct Session<S, P> {
    document: TemplateDocument,
    settle: SettleController,
    bridge: PersistenceBridge<S>,
    compiler: Arc<Compiler>,
    preview: P,
    default_title: Option<String>,
    last_result: CompilationResult,
}

impl<S, P> Session<S, P>
where
    S: KeyValueStore,
    P: PreviewHost,
{
    /// Start a session on `document` and render the first preview at once.
    pub fn new(
        document: TemplateDocument,
        compiler: Arc<Compiler>,
        bridge: PersistenceBridge<S>,
        preview: P,
    ) -> Self {
        let last_result =
            compiler.compile_or_fallback(&document.markup, document.data.value(), document.engine);
        let mut session = Self {
            settle: SettleController::new(document.settled_input()),
            document,
            bridge,
            compiler,
            preview,
            default_title: None,
            last_result,
        };
        session.render_preview();
        session
    }

    /// Use `window` as the settle quiet window.
    pub fn with_settle_window(mut self, window: Duration) -> Self {
        self.settle = SettleController::with_window(self.document.settled_input(), window);
        self
    }

    /// Use `title` when exported data has no `settings.title`.
    pub fn with_default_title(mut self, title: impl Into<String>) -> Self {
        self.default_title = Some(title.into());
        self
    }

    /// Apply one edit made at `now`.
    pub fn apply(&mut self, edit: Edit, now: Instant) {
        match edit {
            Edit::Markup(markup) => {
                self.settle.edit_markup(markup.clone(), now);
                self.bridge.persist(Field::Html, markup.clone(), now);
                self.document.markup = markup;
            }
            Edit::Stylesheet(stylesheet) => {
                self.bridge.persist(Field::Css, stylesheet.clone(), now);
                self.document.stylesheet = stylesheet;
                self.render_preview();
            }
            Edit::DataText(text) => match self.document.data.edit(text) {
                Ok(value) => {
                    let value = value.clone();
                    self.bridge.persist(Field::Data, serialize_data(&value), now);
                    self.settle.edit_data(value, now);
                }
                Err(e) => tracing::warn!("{}; keeping the last valid data", e),
            },
            Edit::Engine(engine) => {
                self.settle.edit_engine(engine, now);
                self.bridge.persist(Field::Engine, engine.as_str(), now);
                self.document.engine = engine;
            }
        }
    }

    /// Run every timer that is due at `now`.
    ///
    /// Returns true when the input settled to something new and the preview
    /// was recompiled.
    pub fn tick(&mut self, now: Instant) -> bool {
        let recompiled = match self.settle.poll(now) {
            Some(settled) => {
                self.last_result =
                    self.compiler.compile_or_fallback(&settled.markup, &settled.data, settled.engine);
                self.render_preview();
                true
            }
            None => false,
        };
        self.bridge.poll(now);
        recompiled
    }

    /// The earliest time [`Session::tick`] has work to do.
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.settle.next_deadline(), self.bridge.next_deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Assemble the live document for export.
    ///
    /// In [`ExportMode::Output`] the live markup is compiled immediately;
    /// a compile error falls back to the raw markup.
    pub fn export(&self, mode: ExportMode) -> String {
        export_document(
            &self.compiler,
            &self.document,
            mode,
            self.default_title.as_deref(),
        )
    }

    /// Drop pending settles and write every pending field.
    pub fn shutdown(&mut self) {
        self.settle.cancel();
        let written = self.bridge.flush();
        if !written.is_empty() {
            tracing::debug!("Flushed {} pending field(s)", written.len());
        }
    }

    /// The live document.
    pub fn document(&self) -> &TemplateDocument {
        &self.document
    }

    /// The input the preview was last compiled from.
    pub fn settled(&self) -> &SettledInput {
        self.settle.settled()
    }

    /// The last compilation outcome shown in the preview.
    pub fn last_result(&self) -> &CompilationResult {
        &self.last_result
    }

    /// The persistence bridge.
    pub fn bridge(&self) -> &PersistenceBridge<S> {
        &self.bridge
    }

    /// The preview host.
    pub fn preview(&self) -> &P {
        &self.preview
    }

    fn render_preview(&mut self) {
        let frame = PreviewFrame::new(self.last_result.body(), self.document.stylesheet.as_str());
        if let Err(e) = self.preview.render(&frame) {
            tracing::warn!("Failed to render preview: {:#}", e);
        }
    }
}

/// Assemble `document` for export with `compiler`.
pub fn export_document(
    compiler: &Compiler,
    document: &TemplateDocument,
    mode: ExportMode,
    default_title: Option<&str>,
) -> String {
    let data = document.data.value();
    let body = match mode {
        ExportMode::Template => document.markup.clone(),
        ExportMode::Output => compiler
            .compile_or_fallback(&document.markup, data, document.engine)
            .body()
            .to_string(),
    };

    let mut defaults = DocumentDefaults::for_engine(document.engine);
    if let Some(title) = default_title {
        defaults = defaults.with_title(title);
    }
    assemble(&body, &document.stylesheet, data, &defaults)
}

fn serialize_data(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}
