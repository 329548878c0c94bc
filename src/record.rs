use crate::config::Level;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;

/// One key/value pair attached to a record.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub key: String,
    pub value: Value,
}

impl Field {
    pub fn new(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Source location of the call that produced a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub file: String,
    pub line: u32,
}

impl Caller {
    pub fn new(file: impl Into<String>, line: u32) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }

    pub fn from_location(location: &std::panic::Location<'_>) -> Self {
        Self::new(location.file(), location.line())
    }
}

impl std::fmt::Display for Caller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// A fully populated record, independent of which facility produced it.
///
/// `fields` keeps insertion order: inherited context first, then the
/// pairs passed at the call site.
#[derive(Debug, Clone)]
pub struct LogRecord {
    pub timestamp: DateTime<Utc>,
    pub level: Level,
    pub target: Option<String>,
    pub caller: Option<Caller>,
    pub message: String,
    pub fields: Vec<Field>,
}

impl LogRecord {
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            level,
            target: None,
            caller: None,
            message: message.into(),
            fields: Vec::new(),
        }
    }

    /// RFC3339 in UTC, second precision, `Z` suffix.
    pub fn timestamp_rfc3339(&self) -> String {
        self.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true)
    }
}

/// Structured rendering: fixed header keys, then the fields in order.
///
/// A field that reuses a header key is written as-is after the header;
/// JSON consumers will see the later value.
impl Serialize for LogRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("ts", &self.timestamp_rfc3339())?;
        map.serialize_entry("level", self.level.as_lower())?;
        if let Some(target) = &self.target {
            map.serialize_entry("logger", target)?;
        }
        if let Some(caller) = &self.caller {
            map.serialize_entry("caller", &caller.to_string())?;
        }
        map.serialize_entry("msg", &self.message)?;
        for field in &self.fields {
            map.serialize_entry(&field.key, &field.value)?;
        }
        map.end()
    }
}
