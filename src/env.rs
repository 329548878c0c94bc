//! Environment variable names read by the bootstrap layer.
//!
//! The core types never read the environment themselves; only the
//! `from_env` constructors and the process entry go through here.

/// Minimum severity of the application logger: `DEBUG`, `INFO`, `WARN` or `ERROR`.
pub const LOG_LEVEL_ENV: &str = "LOG_LEVEL";

/// Encoding of every record: `console` or `structured`.
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

/// Destination of the shared writer: `stderr`, `stdout` or a file path.
pub const LOG_DESTINATION_ENV: &str = "LOG_DESTINATION";

/// Verbosity of the legacy `log` facility, a non-negative integer.
pub const LEGACY_LOG_VERBOSITY_ENV: &str = "LEGACY_LOG_VERBOSITY";

/// Address the profiling endpoint binds to. Empty disables it.
pub const PPROF_BIND_ADDRESS_ENV: &str = "PPROF_BIND_ADDRESS";

/// Address the metrics endpoint binds to. `0` disables it.
pub const METRICS_BIND_ADDRESS_ENV: &str = "METRICS_BIND_ADDRESS";

pub const DEFAULT_LOG_LEVEL: &str = "INFO";
pub const DEFAULT_LOG_FORMAT: &str = "console";
pub const DEFAULT_LOG_DESTINATION: &str = "stderr";
pub const DEFAULT_LEGACY_LOG_VERBOSITY: &str = "0";
pub const DEFAULT_METRICS_BIND_ADDRESS: &str = "0";

/// Read an environment variable or fall back to a provided default.
///
/// An empty value counts as unset.
pub fn env_or(key: &str, default: &str) -> String {
    match std::env::var(key) {
        Ok(v) if !v.is_empty() => v,
        _ => default.to_string(),
    }
}
