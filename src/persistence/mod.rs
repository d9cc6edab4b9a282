//! Persistence of the editor fields.
//!
//! The [`PersistenceBridge`] mirrors the four logical fields to a
//! [`KeyValueStore`] and is the only writer to it. Each field is debounced
//! independently: a write happens after a quiet window (1 second by default),
//! and a field that keeps changing is still written no later than the max
//! wait (5 seconds) after its first unwritten edit, which bounds how far the
//! stored state can lag the live state.
//!
//! Writes are fire-and-forget. A failing store is logged and the value is
//! dropped; there is no retry and no acknowledgment.
//!
//! # Layout
//!
//! | Key      | Content                        |
//! |----------|--------------------------------|
//! | `html`   | template markup                |
//! | `css`    | stylesheet                     |
//! | `data`   | serialized sample data (JSON)  |
//! | `engine` | engine selector                |
//!
//! Any key may be absent; absence falls back to the built-in default for that
//! field.

mod store;

pub use store::{FileStore, KeyValueStore, MemoryStore};

use std::fmt;
use std::time::Duration;
use tokio::time::Instant;

use crate::constants::{PERSIST_MAX_WAIT, PERSIST_QUIET_WINDOW};
use crate::session::{DataBuffer, TemplateDocument};
use crate::settle::Debouncer;
use crate::templating::Engine;

/// One of the four persisted fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// Template markup
    Html,
    /// Stylesheet
    Css,
    /// Serialized sample data
    Data,
    /// Engine selector
    Engine,
}

impl Field {
    /// All fields in storage order.
    pub const ALL: [Field; 4] = [Field::Html, Field::Css, Field::Data, Field::Engine];

    /// Storage key.
    pub const fn key(self) -> &'static str {
        match self {
            Field::Html => "html",
            Field::Css => "css",
            Field::Data => "data",
            Field::Engine => "engine",
        }
    }

    const fn index(self) -> usize {
        match self {
            Field::Html => 0,
            Field::Css => 1,
            Field::Data => 2,
            Field::Engine => 3,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Debounced writer of the four fields into a store.
#[derive(Debug)]
pub struct PersistenceBridge<S> {
    store: S,
    pending: [Debouncer<String>; 4],
}

impl<S: KeyValueStore> PersistenceBridge<S> {
    /// Bridge with the default 1s quiet window and 5s max wait.
    pub fn new(store: S) -> Self {
        Self::with_windows(store, PERSIST_QUIET_WINDOW, PERSIST_MAX_WAIT)
    }

    /// Bridge with custom windows.
    pub fn with_windows(store: S, quiet: Duration, max_wait: Duration) -> Self {
        Self {
            store,
            pending: std::array::from_fn(|_| Debouncer::with_max_wait(quiet, max_wait)),
        }
    }

    /// Schedule `value` to be written under `field`, superseding any pending value.
    pub fn persist(&mut self, field: Field, value: impl Into<String>, now: Instant) {
        self.pending[field.index()].push(value.into(), now);
    }

    /// Write every field whose deadline has passed. Returns the fields written.
    pub fn poll(&mut self, now: Instant) -> Vec<Field> {
        let mut written = Vec::new();
        for field in Field::ALL {
            if let Some(value) = self.pending[field.index()].poll(now) {
                self.write(field, &value);
                written.push(field);
            }
        }
        written
    }

    /// Write every pending field immediately.
    pub fn flush(&mut self) -> Vec<Field> {
        let mut written = Vec::new();
        for field in Field::ALL {
            if let Some(value) = self.pending[field.index()].flush() {
                self.write(field, &value);
                written.push(field);
            }
        }
        written
    }

    /// The earliest pending write deadline.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.iter().filter_map(Debouncer::deadline).min()
    }

    /// Whether `field` has an unwritten value.
    pub fn is_pending(&self, field: Field) -> bool {
        self.pending[field.index()].is_pending()
    }

    /// Last persisted value of `field`, or `None` when absent or unreadable.
    pub fn load(&self, field: Field) -> Option<String> {
        match self.store.get(field.key()) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Failed to read '{}' from state store: {:#}", field, e);
                None
            }
        }
    }

    /// Restore a document, falling back per field to `defaults`.
    ///
    /// A persisted `data` entry that no longer parses, or an `engine` entry
    /// that is not a valid selector, falls back to the default with a warning.
    pub fn load_document(&self, defaults: &TemplateDocument) -> TemplateDocument {
        let markup = self.load(Field::Html).unwrap_or_else(|| defaults.markup.clone());
        let stylesheet = self.load(Field::Css).unwrap_or_else(|| defaults.stylesheet.clone());

        let data = match self.load(Field::Data) {
            Some(text) => DataBuffer::parse(&text).unwrap_or_else(|e| {
                tracing::warn!("Ignoring persisted sample data: {}", e);
                defaults.data.clone()
            }),
            None => defaults.data.clone(),
        };

        let engine = match self.load(Field::Engine) {
            Some(value) => value.parse::<Engine>().unwrap_or_else(|e| {
                tracing::warn!("Ignoring persisted engine: {}", e);
                defaults.engine
            }),
            None => defaults.engine,
        };

        TemplateDocument {
            markup,
            stylesheet,
            data,
            engine,
        }
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    fn write(&mut self, field: Field, value: &str) {
        tracing::debug!("Persisting '{}' ({} bytes)", field, value.len());
        if let Err(e) = self.store.set(field.key(), value) {
            tracing::warn!("Failed to persist '{}': {:#}", field, e);
        }
    }
}
