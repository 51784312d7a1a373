//! Tracing utilities for tests.
//!
//! [`init`] installs a formatting subscriber driven by `RUST_LOG`.
//! [`capture_spans`] records the spans opened by the worker while a future
//! runs, so tests can assert on lifecycle spans (`install`, `activate`,
//! `fetch`) and their fields.

use std::future::Future;
use std::sync::{Arc, Mutex, Once};

use tracing::instrument::WithSubscriber;
use tracing::span::{Attributes, Id, Record};
use tracing::{Dispatch, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, Layer, Registry};

static INIT: Once = Once::new();

/// Installs the global test subscriber once per process.
pub fn init() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Captured span information.
#[derive(Debug, Clone)]
pub struct CapturedSpan {
    pub name: String,
    pub target: String,
    pub fields: Vec<(String, String)>,
}

struct FieldVisitor {
    fields: Vec<(String, String)>,
}

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.fields
            .push((field.name().to_string(), format!("{:?}", value)));
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.fields
            .push((field.name().to_string(), value.to_string()));
    }
}

struct SpanCaptureLayer {
    spans: Arc<Mutex<Vec<(u64, CapturedSpan)>>>,
}

fn is_captured(target: &str) -> bool {
    target.starts_with("shellcache")
}

impl<S> Layer<S> for SpanCaptureLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(&self, attrs: &Attributes<'_>, id: &Id, _ctx: Context<'_, S>) {
        let metadata = attrs.metadata();
        if !is_captured(metadata.target()) {
            return;
        }

        let mut visitor = FieldVisitor { fields: Vec::new() };
        attrs.record(&mut visitor);

        let span = CapturedSpan {
            name: metadata.name().to_string(),
            target: metadata.target().to_string(),
            fields: visitor.fields,
        };
        if let Ok(mut spans) = self.spans.lock() {
            spans.push((id.into_u64(), span));
        }
    }

    fn on_record(&self, id: &Id, values: &Record<'_>, ctx: Context<'_, S>) {
        let Some(span_ref) = ctx.span(id) else {
            return;
        };
        if !is_captured(span_ref.metadata().target()) {
            return;
        }

        let mut visitor = FieldVisitor { fields: Vec::new() };
        values.record(&mut visitor);

        let span_id = id.into_u64();
        if let Ok(mut spans) = self.spans.lock()
            && let Some((_, captured)) = spans.iter_mut().rev().find(|(id, _)| *id == span_id)
        {
            captured.fields.extend(visitor.fields);
        }
    }
}

/// Collector for captured spans.
#[derive(Clone)]
pub struct SpanCollector {
    spans: Arc<Mutex<Vec<(u64, CapturedSpan)>>>,
}

impl SpanCollector {
    /// All captured spans in creation order.
    pub fn spans(&self) -> Vec<CapturedSpan> {
        self.spans
            .lock()
            .map(|spans| spans.iter().map(|(_, span)| span.clone()).collect())
            .unwrap_or_default()
    }

    pub fn span_names(&self) -> Vec<String> {
        self.spans().into_iter().map(|span| span.name).collect()
    }

    pub fn has_span(&self, name: &str) -> bool {
        self.spans().iter().any(|span| span.name == name)
    }

    /// Field value of the last span named `span_name`.
    pub fn get_field(&self, span_name: &str, field_name: &str) -> Option<String> {
        self.spans()
            .into_iter()
            .rev()
            .find(|span| span.name == span_name)
            .and_then(|span| {
                span.fields
                    .into_iter()
                    .find(|(name, _)| name == field_name)
                    .map(|(_, value)| value)
            })
    }
}

/// Runs `future` with span capturing enabled.
pub async fn capture_spans<F>(future: F) -> (F::Output, SpanCollector)
where
    F: Future,
{
    let spans = Arc::new(Mutex::new(Vec::new()));
    let layer = SpanCaptureLayer {
        spans: Arc::clone(&spans),
    };
    let dispatch = Dispatch::new(Registry::default().with(layer));
    let output = future.with_subscriber(dispatch).await;
    (output, SpanCollector { spans })
}
