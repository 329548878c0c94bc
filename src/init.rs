use crate::bridge::{LegacyLogBridge, LEGACY_FORWARDER};
use crate::config::{LegacyVerbosity, LoggerConfig};
use crate::env::{env_or, DEFAULT_LOG_DESTINATION, LOG_DESTINATION_ENV};
use crate::error::{ConfigError, Error, Result};
use crate::layer::SinkLayer;
use crate::logger::Logger;
use crate::writer::SynchronizedWriter;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::Registry;

/// Progress of process-wide registration. The lock also serializes
/// concurrent init calls.
struct InitState {
    initialized: bool,
    forwarder_registered: bool,
}

static INIT: Mutex<InitState> = Mutex::new(InitState {
    initialized: false,
    forwarder_registered: false,
});

fn init_state() -> MutexGuard<'static, InitState> {
    INIT.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Process-wide logging configuration.
///
/// **Fields**
/// - `logger`: level and encoding of every record, whichever facility
///   produced it.
/// - `legacy_verbosity`: threshold of the `log` facility, independent of
///   `logger.level`.
/// - `destination`: `stderr`, `stdout` or a file path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoggingConfig {
    pub logger: LoggerConfig,
    pub legacy_verbosity: LegacyVerbosity,
    pub destination: String,
}

impl LoggingConfig {
    pub fn new(logger: LoggerConfig) -> Self {
        Self {
            logger,
            legacy_verbosity: LegacyVerbosity::default(),
            destination: DEFAULT_LOG_DESTINATION.to_string(),
        }
    }

    /// Read `LOG_LEVEL`, `LOG_FORMAT`, `LEGACY_LOG_VERBOSITY` and `LOG_DESTINATION`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            logger: LoggerConfig::from_env()?,
            legacy_verbosity: LegacyVerbosity::from_env()?,
            destination: env_or(LOG_DESTINATION_ENV, DEFAULT_LOG_DESTINATION),
        })
    }
}

/// Handles produced by [`init_logging`].
///
/// Owned by process startup and passed by reference to whatever logs.
/// There is no teardown: the writer lives until the process exits.
#[derive(Clone, Debug)]
pub struct Logging {
    writer: SynchronizedWriter,
    logger: Logger,
}

impl Logging {
    /// Root application logger.
    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    pub fn writer(&self) -> &SynchronizedWriter {
        &self.writer
    }
}

/// Open the configured destination and route every facility onto it.
///
/// **Effects**
///
/// - opens the [`SynchronizedWriter`];
/// - builds the root [`Logger`] on it;
/// - attaches a [`LegacyLogBridge`] to the process `log` backend;
/// - installs a [`Registry`] with a [`SinkLayer`] as the global `tracing`
///   subscriber.
///
/// Succeeds at most once per process; later calls fail with
/// [`Error::AlreadyInitialized`] without touching the destination. A failed
/// call leaves no backend attached and can be retried.
pub fn init_logging(config: LoggingConfig) -> Result<Logging> {
    let mut state = init_state();
    if state.initialized {
        return Err(Error::AlreadyInitialized);
    }
    let writer = SynchronizedWriter::open(&config.destination)?;
    install(&mut state, config, writer)
}

/// Same as [`init_logging`] with an already built writer.
/// `config.destination` is ignored.
pub fn init_logging_with_writer(config: LoggingConfig, writer: SynchronizedWriter) -> Result<Logging> {
    let mut state = init_state();
    if state.initialized {
        return Err(Error::AlreadyInitialized);
    }
    install(&mut state, config, writer)
}

fn install(state: &mut InitState, config: LoggingConfig, writer: SynchronizedWriter) -> Result<Logging> {
    let logger = Logger::new(config.logger, writer.clone());

    if !state.forwarder_registered {
        LEGACY_FORWARDER.register()?;
        state.forwarder_registered = true;
    }
    LEGACY_FORWARDER.attach(LegacyLogBridge::new(logger.sink().clone(), config.legacy_verbosity));

    let subscriber = Registry::default().with(SinkLayer::new(logger.sink().clone(), config.logger.level));
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        LEGACY_FORWARDER.detach();
        return Err(e.into());
    }

    state.initialized = true;
    Ok(Logging { writer, logger })
}
