use std::error::Error as StdError;
use std::path::PathBuf;

/// Boxed error returned by supervised services.
pub type BoxError = Box<dyn StdError + Send + Sync>;

/// Error type returned when logging configuration is invalid.
///
/// These are raised before any [`Logger`](crate::logger::Logger) is built.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid log level: {0}")]
    InvalidLevel(String),

    #[error("invalid log format: {0}")]
    InvalidFormat(String),

    #[error("invalid legacy log verbosity: {0}")]
    InvalidVerbosity(String),
}

/// Error type returned when the log destination cannot be opened.
#[derive(thiserror::Error, Debug)]
#[error("failed to open log destination {}: {source}", path.display())]
pub struct WriterInitError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

/// Terminal failure of a supervised service.
#[derive(thiserror::Error, Debug)]
pub enum ServiceError {
    #[error("service failed: {0}")]
    Failed(#[source] BoxError),

    #[error("service panicked: {0}")]
    Panicked(String),
}

/// Crate-level error.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("failed to validate logging config: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    WriterInit(#[from] WriterInitError),

    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error("logging is already initialized for this process")]
    AlreadyInitialized,

    #[error("failed to install legacy log bridge: {0}")]
    LegacyBridge(#[from] log::SetLoggerError),

    #[error("failed to install tracing subscriber: {0}")]
    Subscriber(#[from] tracing::subscriber::SetGlobalDefaultError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
