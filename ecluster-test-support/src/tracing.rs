//! Captures spans and events emitted during a test for later assertions.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::field::{Field, Visit};
use tracing::span::{Attributes, Id, Record};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::{Context, SubscriberExt};

/// Structured fields keyed by name, values rendered as text.
pub type Fields = BTreeMap<String, String>;

/// A span that has closed, with every field recorded over its lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpanRecord {
    /// Span name from the callsite metadata.
    pub name: String,
    /// Fields recorded at creation or later through `Span::record`.
    pub fields: Fields,
}

/// An emitted event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRecord {
    /// Event level.
    pub level: Level,
    /// Event fields, including `message`.
    pub fields: Fields,
}

#[derive(Default)]
struct Journal {
    open: HashMap<Id, SpanRecord>,
    closed: Vec<SpanRecord>,
    events: Vec<EventRecord>,
}

/// Layer recording closed spans and events into a shared journal.
#[derive(Clone, Default)]
pub struct RecordingLayer {
    journal: Arc<Mutex<Journal>>,
}

impl RecordingLayer {
    fn journal(&self) -> MutexGuard<'_, Journal> {
        self.journal
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Returns the first closed span called `name`.
    #[must_use]
    pub fn span_named(&self, name: &str) -> Option<SpanRecord> {
        self.journal()
            .closed
            .iter()
            .find(|span| span.name == name)
            .cloned()
    }

    /// Returns every event whose message equals `message`, in emission order.
    #[must_use]
    pub fn events_with_message(&self, message: &str) -> Vec<EventRecord> {
        self.journal()
            .events
            .iter()
            .filter(|event| event.fields.get("message").map(String::as_str) == Some(message))
            .cloned()
            .collect()
    }
}

/// Runs `f` under a subscriber that records into a fresh layer.
///
/// # Examples
/// ```
/// use ecluster_test_support::tracing::capture;
///
/// let (value, layer) = capture(|| {
///     tracing::info!(answer = 42, "computed");
///     42
/// });
/// assert_eq!(value, 42);
/// let events = layer.events_with_message("computed");
/// assert_eq!(events[0].fields.get("answer").map(String::as_str), Some("42"));
/// ```
pub fn capture<T>(f: impl FnOnce() -> T) -> (T, RecordingLayer) {
    let layer = RecordingLayer::default();
    let subscriber = tracing_subscriber::registry().with(layer.clone());
    let value = tracing::subscriber::with_default(subscriber, f);
    (value, layer)
}

impl<S: Subscriber> Layer<S> for RecordingLayer {
    fn on_new_span(&self, attrs: &Attributes<'_>, id: &Id, _ctx: Context<'_, S>) {
        let mut fields = Fields::new();
        attrs.record(&mut TextFields(&mut fields));
        let span = SpanRecord {
            name: attrs.metadata().name().to_owned(),
            fields,
        };
        self.journal().open.insert(id.clone(), span);
    }

    fn on_record(&self, id: &Id, values: &Record<'_>, _ctx: Context<'_, S>) {
        if let Some(span) = self.journal().open.get_mut(id) {
            values.record(&mut TextFields(&mut span.fields));
        }
    }

    fn on_close(&self, id: Id, _ctx: Context<'_, S>) {
        let mut journal = self.journal();
        if let Some(span) = journal.open.remove(&id) {
            journal.closed.push(span);
        }
    }

    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut fields = Fields::new();
        event.record(&mut TextFields(&mut fields));
        self.journal().events.push(EventRecord {
            level: *event.metadata().level(),
            fields,
        });
    }
}

/// Renders every field as text. Strings are stored unquoted; everything else
/// goes through `Debug`.
struct TextFields<'a>(&'a mut Fields);

impl Visit for TextFields<'_> {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.0.insert(field.name().to_owned(), value.to_owned());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.0.insert(field.name().to_owned(), format!("{value:?}"));
    }
}
