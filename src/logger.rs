use crate::bridge::FrameworkLogAdapter;
use crate::config::{Level, LoggerConfig};
use crate::encoder::Encoder;
use crate::error::ConfigError;
use crate::record::{Caller, Field, LogRecord};
use crate::sink::RecordSink;
use crate::writer::SynchronizedWriter;
use serde_json::Value;
use std::fmt;
use std::panic::Location;
use std::sync::Arc;

/// Leveled, structured logger bound to the shared writer.
///
/// A `Logger` is a cheap, cloneable handle: the field set is immutable and
/// [`Logger::with_values`] / [`Logger::with_name`] return new handles without
/// touching the receiver, so one instance can be shared across tasks
/// without extra locking.
///
/// Every emitting method is `#[track_caller]`, so the `caller` of a record is
/// the line that called the logger. Wrappers that forward to a `Logger` must
/// be `#[track_caller]` as well to keep that property.
#[derive(Clone)]
pub struct Logger {
    sink: RecordSink,
    level: Level,
    name: Option<Arc<str>>,
    fields: Arc<[Field]>,
}

impl Logger {
    /// Build a logger whose encoder follows `config.format`.
    pub fn new(config: LoggerConfig, writer: SynchronizedWriter) -> Self {
        Self {
            sink: RecordSink::new(writer, Encoder::for_format(config.format)),
            level: config.level,
            name: None,
            fields: Arc::from(Vec::<Field>::new()),
        }
    }

    /// Validate raw level and format selectors, then build.
    ///
    /// No logger is built when either selector is invalid.
    pub fn from_raw(level: &str, format: &str, writer: SynchronizedWriter) -> Result<Self, ConfigError> {
        LoggerConfig::parse(level, format).map(|config| Self::new(config, writer))
    }

    /// Effective threshold.
    pub fn level(&self) -> Level {
        self.level
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn sink(&self) -> &RecordSink {
        &self.sink
    }

    pub fn enabled(&self, level: Level) -> bool {
        level >= self.level
    }

    /// New logger carrying the receiver's fields followed by `pairs`.
    pub fn with_values(&self, pairs: &[(&str, Value)]) -> Self {
        let fields: Vec<Field> = self
            .fields
            .iter()
            .cloned()
            .chain(pairs.iter().map(|(k, v)| Field::new(*k, v.clone())))
            .collect();
        Self {
            fields: Arc::from(fields),
            ..self.clone()
        }
    }

    /// New logger with `name` appended to the receiver's name (`a.b`).
    pub fn with_name(&self, name: &str) -> Self {
        let name = match &self.name {
            Some(parent) => format!("{parent}.{name}"),
            None => name.to_string(),
        };
        Self {
            name: Some(Arc::from(name)),
            ..self.clone()
        }
    }

    /// View of this logger through the framework capability interface.
    pub fn framework(&self) -> FrameworkLogAdapter {
        FrameworkLogAdapter::new(self.clone())
    }

    #[track_caller]
    pub fn debug(&self, msg: &str, pairs: &[(&str, Value)]) {
        self.emit(Level::Debug, msg, pairs, Location::caller());
    }

    #[track_caller]
    pub fn info(&self, msg: &str, pairs: &[(&str, Value)]) {
        self.emit(Level::Info, msg, pairs, Location::caller());
    }

    #[track_caller]
    pub fn warn(&self, msg: &str, pairs: &[(&str, Value)]) {
        self.emit(Level::Warn, msg, pairs, Location::caller());
    }

    /// Logs at error level with `err` folded into the message as `"<msg>: <err>"`.
    #[track_caller]
    pub fn error<E>(&self, err: &E, msg: &str, pairs: &[(&str, Value)])
    where
        E: fmt::Display + ?Sized,
    {
        if !self.enabled(Level::Error) {
            return;
        }
        let message = format!("{msg}: {err}");
        self.emit(Level::Error, &message, pairs, Location::caller());
    }

    /// Logs at `level` on behalf of the caller of the calling function.
    #[track_caller]
    pub fn log(&self, level: Level, msg: &str, pairs: &[(&str, Value)]) {
        self.emit(level, msg, pairs, Location::caller());
    }

    fn emit(&self, level: Level, msg: &str, pairs: &[(&str, Value)], location: &Location<'_>) {
        if !self.enabled(level) {
            return;
        }

        let mut record = LogRecord::new(level, msg);
        record.target = self.name.as_deref().map(str::to_string);
        record.caller = Some(Caller::from_location(location));
        record.fields = Vec::with_capacity(self.fields.len() + pairs.len());
        record.fields.extend(self.fields.iter().cloned());
        record
            .fields
            .extend(pairs.iter().map(|(k, v)| Field::new(*k, v.clone())));

        self.sink.send(&record);
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("level", &self.level)
            .field("name", &self.name)
            .field("fields", &self.fields)
            .field("sink", &self.sink)
            .finish()
    }
}
