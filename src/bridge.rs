//! Adapters that put other logging facilities on the shared writer.
//!
//! - [`FrameworkLogger`] is the small capability interface framework code
//!   logs through; [`FrameworkLogAdapter`] implements it over a [`Logger`].
//! - [`LegacyLogBridge`] is the `log` crate backend. Dependencies that log
//!   through `log` end up on the same writer, in the same encoding, as the
//!   application logger.

use crate::config::{Level, LegacyVerbosity};
use crate::logger::Logger;
use crate::record::{Caller, LogRecord};
use crate::sink::RecordSink;
use log::Log;
use serde_json::Value;
use std::error::Error as StdError;
use std::sync::{PoisonError, RwLock};

/// Minimal logging capability expected by framework code.
///
/// Methods are `#[track_caller]`: implementations report the location of
/// the code that called the trait method.
pub trait FrameworkLogger: Send + Sync {
    #[track_caller]
    fn info(&self, msg: &str, pairs: &[(&str, Value)]);

    #[track_caller]
    fn error(&self, err: &dyn StdError, msg: &str, pairs: &[(&str, Value)]);

    fn enabled(&self, level: Level) -> bool;
}

/// [`FrameworkLogger`] over a [`Logger`].
///
/// The adapter adds one call frame between the caller and the logger; since
/// both layers track the caller, records still point at the framework call.
#[derive(Clone, Debug)]
pub struct FrameworkLogAdapter {
    logger: Logger,
}

impl FrameworkLogAdapter {
    pub fn new(logger: Logger) -> Self {
        Self { logger }
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }
}

impl FrameworkLogger for FrameworkLogAdapter {
    #[track_caller]
    fn info(&self, msg: &str, pairs: &[(&str, Value)]) {
        self.logger.info(msg, pairs);
    }

    #[track_caller]
    fn error(&self, err: &dyn StdError, msg: &str, pairs: &[(&str, Value)]) {
        self.logger.error(err, msg, pairs);
    }

    fn enabled(&self, level: Level) -> bool {
        self.logger.enabled(level)
    }
}

/// `log` backend writing onto the shared sink.
///
/// Its threshold comes from [`LegacyVerbosity`] and is independent of the
/// application logger's level.
#[derive(Debug)]
pub struct LegacyLogBridge {
    sink: RecordSink,
    filter: log::LevelFilter,
}

impl LegacyLogBridge {
    pub fn new(sink: RecordSink, verbosity: LegacyVerbosity) -> Self {
        Self {
            sink,
            filter: verbosity.level_filter(),
        }
    }

    pub fn filter(&self) -> log::LevelFilter {
        self.filter
    }

    fn to_record(record: &log::Record<'_>) -> LogRecord {
        let mut out = LogRecord::new(Level::from(record.level()), record.args().to_string());
        out.target = Some(record.target().to_string());
        out.caller = match (record.file(), record.line()) {
            (Some(file), Some(line)) => Some(Caller::new(file, line)),
            _ => None,
        };
        out
    }
}

impl log::Log for LegacyLogBridge {
    fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
        metadata.level() <= self.filter
    }

    fn log(&self, record: &log::Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        self.sink.send(&Self::to_record(record));
    }

    fn flush(&self) {
        if let Err(e) = self.sink.writer().sync() {
            eprintln!("error flushing log destination: {}", e);
        }
    }
}

/// The process-wide `log` backend.
///
/// `log` accepts exactly one backend per process and never lets it go, so
/// the registered backend is this static forwarder. The bridge it forwards
/// to can be set and cleared, which lets a failed initialization undo its
/// effect on the `log` facility.
pub(crate) struct LegacyForwarder {
    bridge: RwLock<Option<LegacyLogBridge>>,
}

pub(crate) static LEGACY_FORWARDER: LegacyForwarder = LegacyForwarder {
    bridge: RwLock::new(None),
};

impl LegacyForwarder {
    /// Register the forwarder with `log`. Fails if another backend is
    /// already registered.
    pub(crate) fn register(&'static self) -> Result<(), log::SetLoggerError> {
        log::set_logger(self)
    }

    /// Start forwarding to `bridge` and raise the `log` max level to its filter.
    pub(crate) fn attach(&self, bridge: LegacyLogBridge) {
        let filter = bridge.filter();
        *self.bridge.write().unwrap_or_else(PoisonError::into_inner) = Some(bridge);
        log::set_max_level(filter);
    }

    /// Stop forwarding; `log` records are dropped at the call site again.
    pub(crate) fn detach(&self) {
        log::set_max_level(log::LevelFilter::Off);
        *self.bridge.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

impl log::Log for LegacyForwarder {
    fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
        let bridge = self.bridge.read().unwrap_or_else(PoisonError::into_inner);
        bridge.as_ref().is_some_and(|b| b.enabled(metadata))
    }

    fn log(&self, record: &log::Record<'_>) {
        let bridge = self.bridge.read().unwrap_or_else(PoisonError::into_inner);
        if let Some(b) = bridge.as_ref() {
            b.log(record);
        }
    }

    fn flush(&self) {
        let bridge = self.bridge.read().unwrap_or_else(PoisonError::into_inner);
        if let Some(b) = bridge.as_ref() {
            b.flush();
        }
    }
}
