//! The built-in logic-template engines.
//!
//! Both engines are process-wide singletons created on first use with a fixed
//! configuration, shared through `Arc`s by every
//! [`EngineRegistry`](super::EngineRegistry) built with
//! [`with_builtins`](super::EngineRegistry::with_builtins). Their only mutable
//! state is a bounded cache of parsed templates keyed by markup; every call
//! renders the parsed template against the data it is given.
//!
//! # Security
//!
//! Neither engine is given any file system or network access: no partials are
//! registered for Handlebars, and each Tera template lives alone in its own
//! [`Tera`] instance, so `{% include %}`, `{% extends %}` and `{% import %}`
//! have nothing to resolve.

use handlebars::{
    Context as HandlebarsContext, Handlebars, RenderContext, RenderError, RenderErrorReason,
    Renderable, StringOutput, Template, TemplateError,
};
use regex::Regex;
use serde_json::Value;
use std::sync::{Arc, LazyLock, Mutex, MutexGuard, PoisonError};
use tera::{Context as TeraContext, Tera};

use super::cache::TemplateCache;
use super::engine::Engine;
use super::error::CompileError;
use super::registry::TemplateEngine;
use crate::constants::TEMPLATE_CACHE_CAPACITY;

/// Whether Tera HTML-escapes `{{ }}` output. Matches Handlebars' `{{ }}` behavior.
const TERA_AUTOESCAPE: bool = true;

/// Name of the single template held by each Tera instance, as it appears in
/// Tera's messages.
const TERA_ONE_OFF_NAME: &str = "__tera_one_off";

static HANDLEBARS_ENGINE: LazyLock<Arc<HandlebarsEngine>> =
    LazyLock::new(|| Arc::new(HandlebarsEngine::new(TEMPLATE_CACHE_CAPACITY)));

static TERA_ENGINE: LazyLock<Arc<TeraEngine>> =
    LazyLock::new(|| Arc::new(TeraEngine::new(TERA_AUTOESCAPE, TEMPLATE_CACHE_CAPACITY)));

static LINE_COLUMN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(\d+):(\d+)").ok());

/// Shared Handlebars engine.
pub fn handlebars_engine() -> Arc<HandlebarsEngine> {
    Arc::clone(&HANDLEBARS_ENGINE)
}

/// Shared Tera engine.
pub fn tera_engine() -> Arc<TeraEngine> {
    Arc::clone(&TERA_ENGINE)
}

// The caches only hold fully parsed templates, so a poisoned guard is still usable.
fn lock<T>(cache: &Mutex<TemplateCache<T>>) -> MutexGuard<'_, TemplateCache<T>> {
    cache.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Pass-through engine: the markup is returned as-is.
#[derive(Debug, Default, Clone, Copy)]
pub struct PassthroughEngine;

impl TemplateEngine for PassthroughEngine {
    fn render(&self, markup: &str, _data: &Value) -> Result<String, CompileError> {
        Ok(markup.to_string())
    }
}

/// Handlebars engine wrapping a fixed [`Handlebars`] registry.
pub struct HandlebarsEngine {
    registry: Handlebars<'static>,
    templates: Mutex<TemplateCache<Template>>,
}

impl HandlebarsEngine {
    fn new(cache_capacity: usize) -> Self {
        let mut registry = Handlebars::new();
        // Missing fields render as empty.
        registry.set_strict_mode(false);
        Self {
            registry,
            templates: Mutex::new(TemplateCache::new(cache_capacity)),
        }
    }

    #[cfg(test)]
    fn cache_stats(&self) -> (usize, usize) {
        lock(&self.templates).stats()
    }

    fn parse(&self, markup: &str) -> Result<Arc<Template>, CompileError> {
        if let Some(template) = lock(&self.templates).get(markup) {
            return Ok(template);
        }
        let template = Arc::new(Template::compile(markup).map_err(|e| handlebars_syntax_error(&e))?);

        let mut cache = lock(&self.templates);
        cache.insert(markup, Arc::clone(&template));
        tracing::debug!("Parsed handlebars template, cache (hits, misses) = {:?}", cache.stats());
        Ok(template)
    }
}

impl TemplateEngine for HandlebarsEngine {
    fn render(&self, markup: &str, data: &Value) -> Result<String, CompileError> {
        let template = self.parse(markup)?;
        let context = HandlebarsContext::wraps(data).map_err(handlebars_error)?;

        let mut output = StringOutput::new();
        let mut render_context = RenderContext::new(None);
        template
            .render(&self.registry, &context, &mut render_context, &mut output)
            .map_err(handlebars_error)?;

        output.into_string().map_err(|e| CompileError::Render {
            engine: Engine::Handlebars.as_str().to_string(),
            message: e.to_string(),
        })
    }
}

fn handlebars_syntax_error(error: &TemplateError) -> CompileError {
    CompileError::Template {
        engine: Engine::Handlebars.as_str().to_string(),
        message: error.to_string(),
        line: error.pos().map(|(line, _)| line),
    }
}

fn handlebars_error(error: RenderError) -> CompileError {
    match error.reason() {
        RenderErrorReason::TemplateError(template_error) => handlebars_syntax_error(template_error),
        _ => CompileError::Render {
            engine: Engine::Handlebars.as_str().to_string(),
            message: error.to_string(),
        },
    }
}

/// Tera engine holding one parsed [`Tera`] instance per cached markup.
#[derive(Debug)]
pub struct TeraEngine {
    autoescape: bool,
    templates: Mutex<TemplateCache<Tera>>,
}

impl TeraEngine {
    fn new(autoescape: bool, cache_capacity: usize) -> Self {
        Self {
            autoescape,
            templates: Mutex::new(TemplateCache::new(cache_capacity)),
        }
    }

    #[cfg(test)]
    fn cache_stats(&self) -> (usize, usize) {
        lock(&self.templates).stats()
    }

    fn parse(&self, markup: &str) -> Result<Arc<Tera>, CompileError> {
        if let Some(tera) = lock(&self.templates).get(markup) {
            return Ok(tera);
        }

        let mut tera = Tera::default();
        if self.autoescape {
            tera.autoescape_on(vec![TERA_ONE_OFF_NAME]);
        } else {
            tera.autoescape_on(vec![]);
        }
        tera.add_raw_template(TERA_ONE_OFF_NAME, markup).map_err(|e| parse_tera_error(&e))?;

        let tera = Arc::new(tera);
        let mut cache = lock(&self.templates);
        cache.insert(markup, Arc::clone(&tera));
        tracing::debug!("Parsed tera template, cache (hits, misses) = {:?}", cache.stats());
        Ok(tera)
    }
}

impl TemplateEngine for TeraEngine {
    fn render(&self, markup: &str, data: &Value) -> Result<String, CompileError> {
        let context = TeraContext::from_value(data.clone()).map_err(|e| CompileError::Render {
            engine: Engine::Tera.as_str().to_string(),
            message: format!("sample data must be a JSON object: {e}"),
        })?;

        let tera = self.parse(markup)?;
        tera.render(TERA_ONE_OFF_NAME, &context).map_err(|e| parse_tera_error(&e))
    }
}

/// Classify a Tera error as a syntax or render failure.
fn parse_tera_error(error: &tera::Error) -> CompileError {
    let message = format_tera_error(error);

    if error.to_string().starts_with("Failed to parse") {
        CompileError::Template {
            engine: Engine::Tera.as_str().to_string(),
            line: extract_line_from_tera_error(error),
            message,
        }
    } else {
        CompileError::Render {
            engine: Engine::Tera.as_str().to_string(),
            message,
        }
    }
}

/// Extract the line number from a Tera parse error.
///
/// Tera's parser reports positions as `line:column`, e.g. `1:7` or `15:23`.
fn extract_line_from_tera_error(error: &tera::Error) -> Option<usize> {
    let error_msg = format!("{:?}", error);
    let re = LINE_COLUMN.as_ref()?;
    let caps = re.captures(&error_msg)?;
    caps.get(1)?.as_str().parse::<usize>().ok()
}

/// Flatten a Tera error chain into one message without the internal one-off
/// template name.
pub fn format_tera_error(error: &tera::Error) -> String {
    use std::error::Error;

    let mut all_messages = vec![error.to_string()];
    let mut current_error: Option<&dyn Error> = error.source();
    while let Some(err) = current_error {
        all_messages.push(err.to_string());
        current_error = err.source();
    }

    let messages: Vec<String> = all_messages
        .into_iter()
        .map(|msg| {
            msg.replace(&format!("while rendering '{TERA_ONE_OFF_NAME}'"), "")
                .replace(&format!("Failed to render '{TERA_ONE_OFF_NAME}'"), "")
                .replace(&format!("Failed to parse '{TERA_ONE_OFF_NAME}'"), "")
                .replace(&format!("'{TERA_ONE_OFF_NAME}'"), "template")
                .trim()
                .to_string()
        })
        .filter(|msg| !msg.is_empty())
        .collect();

    if messages.is_empty() {
        "template error".to_string()
    } else {
        messages.join(" -> ")
    }
}
