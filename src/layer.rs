use crate::config::Level;
use crate::record::{Caller, Field, LogRecord};
use crate::sink::RecordSink;
use tracing::field::{Field as TracingField, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::registry::LookupSpan;

/// `tracing_subscriber` layer that renders `tracing` events onto the shared
/// sink, so crates instrumented with `tracing` share the destination and
/// encoding of the application logger.
///
/// Events below `level` are dropped; TRACE counts as Debug.
pub struct SinkLayer {
    sink: RecordSink,
    level: Level,
}

impl SinkLayer {
    pub fn new(sink: RecordSink, level: Level) -> Self {
        Self { sink, level }
    }
}

impl<S> Layer<S> for SinkLayer
where
    S: Subscriber + for<'span> LookupSpan<'span>,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let meta = event.metadata();
        let level = Level::from(meta.level());
        if level < self.level {
            return;
        }

        let mut fields = Vec::new();
        let mut message: Option<String> = None;
        let mut visitor = FieldVisitor {
            fields: &mut fields,
            message: &mut message,
        };
        event.record(&mut visitor);

        let mut record = LogRecord::new(level, message.unwrap_or_default());
        record.target = Some(meta.target().to_string());
        record.caller = match (meta.file(), meta.line()) {
            (Some(file), Some(line)) => Some(Caller::new(file, line)),
            _ => None,
        };
        record.fields = fields;

        self.sink.send(&record);
    }
}

/// Collects event fields in recording order; `message` is split out.
pub struct FieldVisitor<'a> {
    pub fields: &'a mut Vec<Field>,
    pub message: &'a mut Option<String>,
}

impl FieldVisitor<'_> {
    fn push(&mut self, field: &TracingField, value: serde_json::Value) {
        self.fields.push(Field::new(field.name(), value));
    }
}

impl Visit for FieldVisitor<'_> {
    fn record_str(&mut self, field: &TracingField, value: &str) {
        if field.name() == "message" {
            *self.message = Some(value.to_string());
        } else {
            self.push(field, serde_json::Value::String(value.to_string()));
        }
    }

    fn record_i64(&mut self, field: &TracingField, value: i64) {
        self.push(field, serde_json::Value::from(value));
    }

    fn record_u64(&mut self, field: &TracingField, value: u64) {
        self.push(field, serde_json::Value::from(value));
    }

    fn record_f64(&mut self, field: &TracingField, value: f64) {
        self.push(field, serde_json::Value::from(value));
    }

    fn record_bool(&mut self, field: &TracingField, value: bool) {
        self.push(field, serde_json::Value::from(value));
    }

    fn record_error(&mut self, field: &TracingField, value: &(dyn std::error::Error + 'static)) {
        self.push(field, serde_json::Value::String(value.to_string()));
    }

    fn record_debug(&mut self, field: &TracingField, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            *self.message = Some(format!("{:?}", value));
        } else {
            self.push(field, serde_json::Value::String(format!("{:?}", value)));
        }
    }
}
