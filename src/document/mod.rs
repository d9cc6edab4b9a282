//! Standalone HTML document assembly.
//!
//! [`assemble`] turns a body (raw markup or compiled output), the stylesheet
//! and the sample data into a complete document that can be saved and opened
//! on its own. Head metadata is sourced from `data.settings`:
//!
//! | Element                        | Source                    | When absent              |
//! |--------------------------------|---------------------------|--------------------------|
//! | `<title>`                      | `settings.title`          | default title            |
//! | `<meta name="description">`    | `settings.description`    | engine-derived default   |
//! | `<link rel="icon">`            | `settings.favicon`        | omitted                  |
//!
//! # No escaping
//!
//! No interpolated value is escaped. This is a trusted, single-user tool and
//! the assembler is a templating operation, not a sanitizer: a title containing
//! markup ends up as markup. Sanitization is deliberately out of scope.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::constants::DEFAULT_DOCUMENT_TITLE;
use crate::templating::Engine;

/// Baseline reset injected before the user stylesheet, in exported documents
/// and in the preview alike.
pub const RESET_CSS: &str = "*, *::before, *::after { box-sizing: border-box; }\n\
html, body { margin: 0; padding: 0; height: 100%; }";

/// Which body an exported document carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportMode {
    /// The raw, uncompiled markup.
    Template,
    /// The compiled output.
    #[default]
    Output,
}

impl fmt::Display for ExportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportMode::Template => f.write_str("template"),
            ExportMode::Output => f.write_str("output"),
        }
    }
}

impl FromStr for ExportMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "template" => Ok(ExportMode::Template),
            "output" => Ok(ExportMode::Output),
            other => Err(format!("unknown export mode '{other}' (expected template or output)")),
        }
    }
}

/// Fallback head metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentDefaults {
    /// Title used when `settings.title` is missing or empty
    pub title: String,
    /// Description used when `settings.description` is missing or empty
    pub description: String,
}

impl DocumentDefaults {
    /// Defaults for documents built with `engine`.
    pub fn for_engine(engine: Engine) -> Self {
        Self {
            title: DEFAULT_DOCUMENT_TITLE.to_string(),
            description: default_description(engine),
        }
    }

    /// Replace the fallback title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }
}

/// The description used when the data does not provide one.
pub fn default_description(engine: Engine) -> String {
    format!("A page built from a {} template", engine.display_name())
}

/// Non-empty string at `data.settings.<key>`.
fn setting<'a>(data: &'a Value, key: &str) -> Option<&'a str> {
    data.get("settings")?.get(key)?.as_str().filter(|s| !s.is_empty())
}

/// Assemble a complete HTML document.
///
/// The result always has the charset and viewport metas, exactly one
/// `<title>`, the reset stylesheet followed by `stylesheet`, and `body`
/// verbatim inside `<body>`. The favicon link is present if and only if
/// `data.settings.favicon` is a non-empty string.
pub fn assemble(body: &str, stylesheet: &str, data: &Value, defaults: &DocumentDefaults) -> String {
    let title = setting(data, "title").unwrap_or(&defaults.title);
    let description = setting(data, "description").unwrap_or(&defaults.description);

    let mut head = String::new();
    head.push_str("    <meta charset=\"utf-8\">\n");
    head.push_str(
        "    <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n",
    );
    if let Some(favicon) = setting(data, "favicon") {
        head.push_str(&format!("    <link rel=\"icon\" href=\"{favicon}\">\n"));
    }
    if !description.is_empty() {
        head.push_str(&format!("    <meta name=\"description\" content=\"{description}\">\n"));
    }
    head.push_str(&format!(
        "    <title>{title}</title>\n    <style>\n{RESET_CSS}\n    </style>\n    <style>\n{stylesheet}\n    </style>\n"
    ));

    format!(
        "<!DOCTYPE html>\n<html>\n  <head>\n{head}  </head>\n  <body>\n{body}\n  </body>\n</html>\n"
    )
}

/// [`assemble`] with defaults derived from `engine`.
pub fn assemble_for(body: &str, stylesheet: &str, data: &Value, engine: Engine) -> String {
    assemble(body, stylesheet, data, &DocumentDefaults::for_engine(engine))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn defaults() -> DocumentDefaults {
        DocumentDefaults::for_engine(Engine::Handlebars)
    }

    #[test]
    fn test_always_has_charset_viewport_and_one_title() {
        for data in [json!({}), json!(null), json!({"settings": {"title": "T"}}), json!([1])] {
            let doc = assemble("<p>x</p>", "p{}", &data, &defaults());
            assert!(doc.starts_with("<!DOCTYPE html>"));
            assert!(doc.contains("<meta charset=\"utf-8\">"));
            assert!(doc.contains("name=\"viewport\""));
            assert_eq!(doc.matches("<title>").count(), 1);
            assert_eq!(doc.matches("</title>").count(), 1);
        }
    }

    #[test]
    fn test_head_layout() {
        let data = json!({"settings": {"title": "T", "description": "D", "favicon": "/f.png"}});
        let doc = assemble("<p>x</p>", "p{}", &data, &defaults());
        let expected = format!(
            "<!DOCTYPE html>\n<html>\n  <head>\n\
             \x20   <meta charset=\"utf-8\">\n\
             \x20   <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
             \x20   <link rel=\"icon\" href=\"/f.png\">\n\
             \x20   <meta name=\"description\" content=\"D\">\n\
             \x20   <title>T</title>\n\
             \x20   <style>\n{RESET_CSS}\n    </style>\n\
             \x20   <style>\np{{}}\n    </style>\n\
             \x20 </head>\n  <body>\n<p>x</p>\n  </body>\n</html>\n"
        );
        assert_eq!(doc, expected);
    }

    #[test]
    fn test_title_from_settings_or_default() {
        let doc = assemble("", "", &json!({"settings": {"title": "My Page"}}), &defaults());
        assert!(doc.contains("<title>My Page</title>"));

        let doc = assemble("", "", &json!({"settings": {"title": ""}}), &defaults());
        assert!(doc.contains("<title>Untitled Template</title>"));

        let doc = assemble("", "", &json!({}), &defaults().with_title("Draft"));
        assert!(doc.contains("<title>Draft</title>"));
    }

    #[test]
    fn test_favicon_present_iff_specified_and_non_empty() {
        let with = assemble("", "", &json!({"settings": {"favicon": "/f.png"}}), &defaults());
        assert!(with.contains("<link rel=\"icon\" href=\"/f.png\">"));

        for data in [
            json!({}),
            json!({"settings": {}}),
            json!({"settings": {"favicon": ""}}),
            json!({"settings": {"favicon": null}}),
            json!({"favicon": "/top-level-is-ignored.png"}),
        ] {
            let doc = assemble("", "", &data, &defaults());
            assert!(!doc.contains("rel=\"icon\""), "unexpected favicon for {data}");
        }
    }

    #[test]
    fn test_description_falls_back_to_engine_default() {
        let doc = assemble_for("", "", &json!({}), Engine::Tera);
        assert!(doc.contains("content=\"A page built from a Tera template\""));

        let doc = assemble_for("", "", &json!({"settings": {"description": "Mine"}}), Engine::Tera);
        assert!(doc.contains("<meta name=\"description\" content=\"Mine\">"));
    }

    #[test]
    fn test_description_omitted_only_when_both_empty() {
        let empty = DocumentDefaults {
            title: "t".to_string(),
            description: String::new(),
        };
        let doc = assemble("", "", &json!({}), &empty);
        assert!(!doc.contains("name=\"description\""));
    }

    #[test]
    fn test_reset_precedes_user_stylesheet() {
        let doc = assemble("", "body { color: red; }", &json!({}), &defaults());
        let reset_at = doc.find("box-sizing: border-box").unwrap();
        let user_at = doc.find("body { color: red; }").unwrap();
        assert!(reset_at < user_at);
    }

    #[test]
    fn test_values_are_not_escaped() {
        let data = json!({"settings": {"title": "<b>Bold</b> & co"}});
        let doc = assemble("<script>go()</script>", "a > b {}", &data, &defaults());
        assert!(doc.contains("<title><b>Bold</b> & co</title>"));
        assert!(doc.contains("<script>go()</script>"));
        assert!(doc.contains("a > b {}"));
    }

    #[test]
    fn test_export_mode_parse() {
        assert_eq!("template".parse::<ExportMode>().unwrap(), ExportMode::Template);
        assert_eq!("output".parse::<ExportMode>().unwrap(), ExportMode::Output);
        assert!("raw".parse::<ExportMode>().is_err());
    }
}
