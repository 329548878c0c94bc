use crate::env::{
    env_or, DEFAULT_LEGACY_LOG_VERBOSITY, DEFAULT_LOG_FORMAT, DEFAULT_LOG_LEVEL,
    DEFAULT_METRICS_BIND_ADDRESS, LEGACY_LOG_VERBOSITY_ENV, LOG_FORMAT_ENV, LOG_LEVEL_ENV,
    METRICS_BIND_ADDRESS_ENV, PPROF_BIND_ADDRESS_ENV,
};
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Severity of a record. Ordered `Debug < Info < Warn < Error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Debug,
    Info,
    Warn,
    Error,
}

impl Level {
    pub const ALL: [Level; 4] = [Level::Debug, Level::Info, Level::Warn, Level::Error];

    /// Upper-case name, as accepted by `LOG_LEVEL` and rendered by the console encoder.
    pub fn as_str(self) -> &'static str {
        match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
        }
    }

    /// Lower-case name used by the structured encoder.
    pub fn as_lower(self) -> &'static str {
        match self {
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DEBUG" => Ok(Level::Debug),
            "INFO" => Ok(Level::Info),
            "WARN" => Ok(Level::Warn),
            "ERROR" => Ok(Level::Error),
            other => Err(ConfigError::InvalidLevel(other.to_string())),
        }
    }
}

/// Numeric severity scale: -1 debug, 0 info, 1 warn, 2 error.
impl TryFrom<i8> for Level {
    type Error = ConfigError;

    fn try_from(value: i8) -> Result<Self, ConfigError> {
        match value {
            -1 => Ok(Level::Debug),
            0 => Ok(Level::Info),
            1 => Ok(Level::Warn),
            2 => Ok(Level::Error),
            other => Err(ConfigError::InvalidLevel(other.to_string())),
        }
    }
}

/// Maps a `tracing` level onto the four severities. TRACE folds into Debug.
impl From<&tracing::Level> for Level {
    fn from(level: &tracing::Level) -> Self {
        if *level == tracing::Level::ERROR {
            Level::Error
        } else if *level == tracing::Level::WARN {
            Level::Warn
        } else if *level == tracing::Level::INFO {
            Level::Info
        } else {
            Level::Debug
        }
    }
}

/// Maps a `log` level onto the four severities. Trace folds into Debug.
impl From<log::Level> for Level {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Error => Level::Error,
            log::Level::Warn => Level::Warn,
            log::Level::Info => Level::Info,
            log::Level::Debug | log::Level::Trace => Level::Debug,
        }
    }
}

/// Record encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Console,
    Structured,
}

impl Format {
    pub const ALL: [Format; 2] = [Format::Console, Format::Structured];
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Format::Console => "console",
            Format::Structured => "structured",
        })
    }
}

impl FromStr for Format {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "console" => Ok(Format::Console),
            "structured" | "json" => Ok(Format::Structured),
            other => Err(ConfigError::InvalidFormat(other.to_string())),
        }
    }
}

/// Configuration of the application logger.
///
/// Both fields are required; no defaults are applied by [`LoggerConfig::new`]
/// or [`LoggerConfig::parse`]. Only [`LoggerConfig::from_env`] falls back to
/// `INFO` / `console` for unset variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggerConfig {
    pub level: Level,
    pub format: Format,
}

impl LoggerConfig {
    pub fn new(level: Level, format: Format) -> Self {
        Self { level, format }
    }

    /// Validate raw level and format selectors.
    pub fn parse(level: &str, format: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            level: level.parse()?,
            format: format.parse()?,
        })
    }

    /// Build from `LOG_LEVEL` and `LOG_FORMAT`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::parse(
            &env_or(LOG_LEVEL_ENV, DEFAULT_LOG_LEVEL),
            &env_or(LOG_FORMAT_ENV, DEFAULT_LOG_FORMAT),
        )
    }
}

/// Verbosity threshold of the legacy `log` facility.
///
/// 0 keeps info and above, 1 to 3 adds debug, 4 and more adds trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct LegacyVerbosity(pub u8);

impl LegacyVerbosity {
    pub fn level_filter(self) -> log::LevelFilter {
        match self.0 {
            0 => log::LevelFilter::Info,
            1..=3 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    }

    /// Read `LEGACY_LOG_VERBOSITY`, defaulting to 0.
    pub fn from_env() -> Result<Self, ConfigError> {
        env_or(LEGACY_LOG_VERBOSITY_ENV, DEFAULT_LEGACY_LOG_VERBOSITY).parse()
    }
}

impl FromStr for LegacyVerbosity {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u8>()
            .map(LegacyVerbosity)
            .map_err(|_| ConfigError::InvalidVerbosity(s.to_string()))
    }
}

/// Server options handed to the supervised service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    pub pprof_bind_address: String,
    pub metrics_bind_address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            pprof_bind_address: String::new(),
            metrics_bind_address: DEFAULT_METRICS_BIND_ADDRESS.to_string(),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self {
            pprof_bind_address: env_or(PPROF_BIND_ADDRESS_ENV, ""),
            metrics_bind_address: env_or(METRICS_BIND_ADDRESS_ENV, DEFAULT_METRICS_BIND_ADDRESS),
        }
    }

    /// `false` when the metrics endpoint is disabled (`"0"`).
    pub fn metrics_enabled(&self) -> bool {
        self.metrics_bind_address != "0"
    }

    pub fn pprof_enabled(&self) -> bool {
        !self.pprof_bind_address.is_empty()
    }
}
