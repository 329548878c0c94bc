pub mod config;
pub mod env;
pub mod error;
pub mod record;
pub mod encoder;
pub mod writer;
pub mod sink;
pub mod logger;
pub mod bridge;
pub mod layer;

pub mod init;
pub mod lifecycle;

pub use bridge::{FrameworkLogAdapter, FrameworkLogger, LegacyLogBridge};
pub use config::{Format, LegacyVerbosity, Level, LoggerConfig, ServerConfig};
pub use error::{BoxError, ConfigError, Error, ServiceError, WriterInitError};
pub use init::{init_logging, init_logging_with_writer, Logging, LoggingConfig};
pub use lifecycle::{LifecycleState, Orchestrator, Service, ServiceOutcome};
pub use logger::Logger;
pub use writer::SynchronizedWriter;
