//! The sample-data buffer.

use serde_json::Value;
use thiserror::Error;

/// The data text did not parse as JSON.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid sample data at line {line}, column {column}: {message}")]
pub struct DataParseError {
    /// Parser message
    pub message: String,
    /// 1-based line of the failure
    pub line: usize,
    /// 1-based column of the failure
    pub column: usize,
}

impl From<serde_json::Error> for DataParseError {
    fn from(e: serde_json::Error) -> Self {
        Self {
            message: e.to_string(),
            line: e.line(),
            column: e.column(),
        }
    }
}

/// Sample data as typed by the user together with its last valid value.
///
/// The text always reflects the latest edit, even while it does not parse;
/// the value only moves when the text parses, so compilation never sees a
/// half-typed document.
#[derive(Debug, Clone, PartialEq)]
pub struct DataBuffer {
    text: String,
    value: Value,
}

impl DataBuffer {
    /// A buffer holding `value`, with pretty-printed text.
    pub fn new(value: Value) -> Self {
        let text = serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string());
        Self {
            text,
            value,
        }
    }

    /// A buffer for `text`, which must parse.
    pub fn parse(text: &str) -> Result<Self, DataParseError> {
        let value = serde_json::from_str(text)?;
        Ok(Self {
            text: text.to_string(),
            value,
        })
    }

    /// Replace the text. The value follows only if the new text parses.
    ///
    /// # Errors
    ///
    /// Returns [`DataParseError`] when the text is not valid JSON; the
    /// previous value is kept.
    pub fn edit(&mut self, text: impl Into<String>) -> Result<&Value, DataParseError> {
        self.text = text.into();
        match serde_json::from_str(&self.text) {
            Ok(value) => {
                self.value = value;
                Ok(&self.value)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Current text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Last valid value.
    pub fn value(&self) -> &Value {
        &self.value
    }
}

impl Default for DataBuffer {
    fn default() -> Self {
        Self::new(Value::Object(serde_json::Map::new()))
    }
}
