//! Parsed-template cache.
//!
//! The settle controller hands the compiler a new snapshot whenever any one of
//! markup, data or engine settles, so the same markup is compiled again on
//! every data edit. Each engine keeps its recent parsed templates here, keyed
//! by markup, and renders them against fresh data on every call. Output is
//! never cached: Tera functions such as `now()` and `get_random()` differ
//! between renders of identical input.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

/// Bounded cache of parsed templates, evicting the oldest entry first.
#[derive(Debug)]
pub(crate) struct TemplateCache<T> {
    cache: HashMap<String, Arc<T>>,
    order: VecDeque<String>,
    capacity: usize,
    hits: usize,
    misses: usize,
}

impl<T> TemplateCache<T> {
    /// Create an empty cache holding at most `capacity` templates.
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            cache: HashMap::new(),
            order: VecDeque::new(),
            capacity,
            hits: 0,
            misses: 0,
        }
    }

    /// Get the parsed template for `markup` if cached
    pub(crate) fn get(&mut self, markup: &str) -> Option<Arc<T>> {
        if let Some(template) = self.cache.get(markup) {
            self.hits += 1;
            Some(Arc::clone(template))
        } else {
            self.misses += 1;
            None
        }
    }

    /// Insert a parsed template, evicting the oldest entry when full.
    pub(crate) fn insert(&mut self, markup: &str, template: Arc<T>) {
        if self.capacity == 0 || self.cache.contains_key(markup) {
            return;
        }
        while self.cache.len() >= self.capacity {
            match self.order.pop_front() {
                Some(oldest) => {
                    self.cache.remove(&oldest);
                }
                None => break,
            }
        }
        self.order.push_back(markup.to_string());
        self.cache.insert(markup.to_string(), template);
    }

    /// Get cache statistics as `(hits, misses)`
    pub(crate) fn stats(&self) -> (usize, usize) {
        (self.hits, self.misses)
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.cache.len()
    }
}
