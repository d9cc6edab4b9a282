//! Debounce/settle control for recompilation.
//!
//! Recompiling on every keystroke is wasteful and makes the preview flicker,
//! so edits to the markup, the sample data and the engine selector are each
//! buffered by their own [`Debouncer`] and only released to the compiler once
//! that field has been stable for the quiet window (500ms by default).
//!
//! Each input is debounced independently rather than as one combined value:
//! a data edit does not reset the markup's timer and vice versa. On
//! construction the settled triple equals the live triple, so the first
//! preview renders without an artificial delay; only later changes wait.
//!
//! The settled snapshot drives recompilation only. Persistence has its own
//! debouncers in [`crate::persistence`].

mod debounce;

pub use debounce::Debouncer;

use serde_json::Value;
use std::time::Duration;
use tokio::time::Instant;

use crate::constants::SETTLE_WINDOW;
use crate::templating::Engine;

/// A settled `{markup, data, engine}` snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct SettledInput {
    /// Template markup
    pub markup: String,
    /// Last valid sample data
    pub data: Value,
    /// Engine selector
    pub engine: Engine,
}

/// Holds the settled triple and the three per-field debouncers feeding it.
#[derive(Debug)]
pub struct SettleController {
    settled: SettledInput,
    markup: Debouncer<String>,
    data: Debouncer<Value>,
    engine: Debouncer<Engine>,
}

impl SettleController {
    /// Start with `initial` already settled, using the default quiet window.
    pub fn new(initial: SettledInput) -> Self {
        Self::with_window(initial, SETTLE_WINDOW)
    }

    /// Start with `initial` already settled and a custom quiet window.
    pub fn with_window(initial: SettledInput, window: Duration) -> Self {
        Self {
            settled: initial,
            markup: Debouncer::new(window),
            data: Debouncer::new(window),
            engine: Debouncer::new(window),
        }
    }

    /// The current settled snapshot.
    pub fn settled(&self) -> &SettledInput {
        &self.settled
    }

    /// Record a markup edit.
    pub fn edit_markup(&mut self, markup: String, now: Instant) {
        self.markup.push(markup, now);
    }

    /// Record a new valid data value.
    pub fn edit_data(&mut self, data: Value, now: Instant) {
        self.data.push(data, now);
    }

    /// Record an engine switch.
    pub fn edit_engine(&mut self, engine: Engine, now: Instant) {
        self.engine.push(engine, now);
    }

    /// Apply every field whose quiet window has elapsed.
    ///
    /// Returns the new settled snapshot when at least one field settled to a
    /// value different from the current one.
    pub fn poll(&mut self, now: Instant) -> Option<&SettledInput> {
        let mut changed = settle_field(&mut self.settled.markup, self.markup.poll(now));
        changed |= settle_field(&mut self.settled.data, self.data.poll(now));
        changed |= settle_field(&mut self.settled.engine, self.engine.poll(now));

        if changed {
            tracing::debug!("Input settled (engine={})", self.settled.engine);
            Some(&self.settled)
        } else {
            None
        }
    }

    /// The earliest pending deadline across the three fields.
    pub fn next_deadline(&self) -> Option<Instant> {
        [self.markup.deadline(), self.data.deadline(), self.engine.deadline()]
            .into_iter()
            .flatten()
            .min()
    }

    /// Whether any field is waiting to settle.
    pub fn is_pending(&self) -> bool {
        self.markup.is_pending() || self.data.is_pending() || self.engine.is_pending()
    }

    /// Drop all pending edits; nothing fires afterwards.
    pub fn cancel(&mut self) {
        self.markup.cancel();
        self.data.cancel();
        self.engine.cancel();
    }
}

/// Store a released value; true when it differs from the settled one.
fn settle_field<T: PartialEq>(slot: &mut T, released: Option<T>) -> bool {
    match released {
        Some(value) if value != *slot => {
            *slot = value;
            true
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn initial() -> SettledInput {
        SettledInput {
            markup: "<p>{{name}}</p>".to_string(),
            data: json!({"name": "World"}),
            engine: Engine::Handlebars,
        }
    }

    #[test]
    fn test_initial_input_is_settled_immediately() {
        let controller = SettleController::new(initial());
        assert_eq!(controller.settled(), &initial());
        assert!(!controller.is_pending());
        assert_eq!(controller.next_deadline(), None);
    }

    #[test]
    fn test_markup_settles_after_quiet_window_with_last_value() {
        let start = Instant::now();
        let mut controller = SettleController::new(initial());

        controller.edit_markup("a".to_string(), start);
        controller.edit_markup("ab".to_string(), start + ms(100));
        controller.edit_markup("abc".to_string(), start + ms(200));

        assert!(controller.poll(start + ms(699)).is_none());
        let settled = controller.poll(start + ms(700)).unwrap();
        assert_eq!(settled.markup, "abc");
        assert!(controller.poll(start + ms(5000)).is_none());
    }

    #[test]
    fn test_data_edits_do_not_delay_markup() {
        let start = Instant::now();
        let mut controller = SettleController::new(initial());

        controller.edit_markup("new".to_string(), start);
        // Keep editing data every 100ms well past the markup's window.
        for i in 1..=10u64 {
            controller.edit_data(json!({"name": i}), start + ms(i * 100));
            if i == 5 {
                let settled = controller.poll(start + ms(500)).unwrap();
                assert_eq!(settled.markup, "new");
                assert_eq!(settled.data, json!({"name": "World"}));
            }
        }

        let settled = controller.poll(start + ms(1500)).unwrap();
        assert_eq!(settled.data, json!({"name": 10}));
    }

    #[test]
    fn test_engine_switch_settles() {
        let start = Instant::now();
        let mut controller = SettleController::new(initial());

        controller.edit_engine(Engine::Html, start);
        assert_eq!(controller.next_deadline(), Some(start + SETTLE_WINDOW));
        let settled = controller.poll(start + SETTLE_WINDOW).unwrap();
        assert_eq!(settled.engine, Engine::Html);
        assert_eq!(settled.markup, initial().markup);
    }

    #[test]
    fn test_settling_to_the_same_value_reports_no_change() {
        let start = Instant::now();
        let mut controller = SettleController::new(initial());

        controller.edit_markup("temp".to_string(), start);
        controller.edit_markup(initial().markup, start + ms(100));
        assert!(controller.poll(start + ms(2000)).is_none());
        assert!(!controller.is_pending());
    }

    #[test]
    fn test_next_deadline_is_earliest_field() {
        let start = Instant::now();
        let mut controller = SettleController::with_window(initial(), ms(300));

        controller.edit_data(json!({}), start + ms(50));
        controller.edit_markup("x".to_string(), start);
        assert_eq!(controller.next_deadline(), Some(start + ms(300)));
    }

    #[test]
    fn test_cancel_drops_pending_edits() {
        let start = Instant::now();
        let mut controller = SettleController::new(initial());

        controller.edit_markup("x".to_string(), start);
        controller.edit_engine(Engine::Tera, start);
        controller.cancel();

        assert!(controller.poll(start + ms(10_000)).is_none());
        assert_eq!(controller.settled(), &initial());
    }
}
