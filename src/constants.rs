//! Global constants used throughout the livetpl codebase.
//!
//! Quiet windows, storage keys, workspace file names, and document defaults
//! that are shared by several modules.

use std::time::Duration;

/// Quiet window after which an edit to markup, data, or engine settles (500ms).
pub const SETTLE_WINDOW: Duration = Duration::from_millis(500);

/// Quiet window after which an edited field is written to the state store (1 second).
pub const PERSIST_QUIET_WINDOW: Duration = Duration::from_secs(1);

/// Upper bound on how long a continuously edited field may go unwritten (5 seconds).
///
/// Persisted state never lags live state by more than this, which bounds the
/// data lost on abrupt termination.
pub const PERSIST_MAX_WAIT: Duration = Duration::from_secs(5);

/// Title used when the sample data has no `settings.title`.
pub const DEFAULT_DOCUMENT_TITLE: &str = "Untitled Template";

/// Workspace file holding the template markup.
pub const TEMPLATE_FILE: &str = "template.html";

/// Workspace file holding the stylesheet.
pub const STYLESHEET_FILE: &str = "style.css";

/// Workspace file holding the sample data.
pub const DATA_FILE: &str = "data.json";

/// File written by the file preview host.
pub const PREVIEW_FILE: &str = "index.html";

/// Upper bound on parsed templates kept by each logic engine.
pub const TEMPLATE_CACHE_CAPACITY: usize = 64;

/// Capacity of the session edit channel.
pub const EDIT_CHANNEL_CAPACITY: usize = 256;
