//! The engine selector.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::EngineParseError;

/// Which template engine compiles the markup.
///
/// The selector is persisted under the `engine` key using the lowercase names
/// returned by [`Engine::as_str`]; those names are also the keys the built-in
/// engines are registered under in the
/// [`EngineRegistry`](super::EngineRegistry).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Engine {
    /// Pass-through: the markup is the output.
    Html,
    /// Handlebars logic templates (`{{name}}`, `{{#if}}`, `{{#each}}`).
    #[default]
    Handlebars,
    /// Tera logic templates (`{{ name }}`, `{% if %}`, `{% for %}`).
    Tera,
}

impl Engine {
    /// Every supported selector, in display order.
    pub const ALL: [Engine; 3] = [Engine::Html, Engine::Handlebars, Engine::Tera];

    /// Selector string, also the registry and storage name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Engine::Html => "html",
            Engine::Handlebars => "handlebars",
            Engine::Tera => "tera",
        }
    }

    /// Human-readable name used in generated document metadata.
    pub const fn display_name(self) -> &'static str {
        match self {
            Engine::Html => "HTML",
            Engine::Handlebars => "Handlebars",
            Engine::Tera => "Tera",
        }
    }

    /// Whether markup under this engine skips compilation entirely.
    pub const fn is_passthrough(self) -> bool {
        matches!(self, Engine::Html)
    }
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Engine {
    type Err = EngineParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "html" => Ok(Engine::Html),
            "handlebars" => Ok(Engine::Handlebars),
            "tera" => Ok(Engine::Tera),
            other => Err(EngineParseError {
                value: other.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_exactly_the_three_selectors() {
        for engine in Engine::ALL {
            assert_eq!(engine.as_str().parse::<Engine>().unwrap(), engine);
        }

        let err = "liquid".parse::<Engine>().unwrap_err();
        assert_eq!(err.value, "liquid");
        assert!("HTML".parse::<Engine>().is_err());
        assert!("".parse::<Engine>().is_err());
    }

    #[test]
    fn test_serde_uses_selector_names() {
        let json = serde_json::to_string(&Engine::Tera).unwrap();
        assert_eq!(json, "\"tera\"");

        let engine: Engine = serde_json::from_str("\"html\"").unwrap();
        assert_eq!(engine, Engine::Html);
    }

    #[test]
    fn test_only_html_is_passthrough() {
        assert!(Engine::Html.is_passthrough());
        assert!(!Engine::Handlebars.is_passthrough());
        assert!(!Engine::Tera.is_passthrough());
    }
}
