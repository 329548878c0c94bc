use crate::config::Format;
use crate::record::{Field, LogRecord};
use std::fmt::Write as _;

/// Renders a [`LogRecord`] into the bytes of exactly one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoder {
    /// Tab separated, human readable:
    /// `ts  LEVEL  [target]  file:line  message  {"k":"v"}`
    Console,
    /// One JSON object per line.
    Structured,
}

impl Encoder {
    pub fn for_format(format: Format) -> Self {
        match format {
            Format::Console => Encoder::Console,
            Format::Structured => Encoder::Structured,
        }
    }

    pub fn encode(&self, record: &LogRecord) -> Vec<u8> {
        match self {
            Encoder::Console => encode_console(record).into_bytes(),
            Encoder::Structured => encode_structured(record),
        }
    }
}

fn encode_console(record: &LogRecord) -> String {
    let mut line = String::with_capacity(128);
    line.push_str(&record.timestamp_rfc3339());
    line.push('\t');
    line.push_str(record.level.as_str());
    if let Some(target) = &record.target {
        line.push('\t');
        line.push_str(target);
    }
    if let Some(caller) = &record.caller {
        // Writing into a String cannot fail.
        let _ = write!(line, "\t{caller}");
    }
    line.push('\t');
    line.push_str(&record.message);
    if !record.fields.is_empty() {
        line.push('\t');
        line.push_str(&fields_object(&record.fields));
    }
    line.push('\n');
    line
}

/// `{"k":v,...}` in insertion order.
fn fields_object(fields: &[Field]) -> String {
    let mut out = String::from("{");
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&serde_json::Value::String(field.key.clone()).to_string());
        out.push(':');
        out.push_str(&field.value.to_string());
    }
    out.push('}');
    out
}

fn encode_structured(record: &LogRecord) -> Vec<u8> {
    let mut bytes = match serde_json::to_vec(record) {
        Ok(bytes) => bytes,
        Err(e) => {
            let fallback = serde_json::json!({
                "ts": record.timestamp_rfc3339(),
                "level": record.level.as_lower(),
                "msg": record.message,
                "encodeError": e.to_string(),
            });
            fallback.to_string().into_bytes()
        }
    };
    bytes.push(b'\n');
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Level;
    use crate::record::Caller;
    use chrono::{TimeZone, Utc};
    use serde_json::{json, Value};

    fn sample() -> LogRecord {
        let mut record = LogRecord::new(Level::Warn, "disk almost full");
        record.timestamp = Utc.with_ymd_and_hms(2024, 3, 9, 17, 4, 5).unwrap();
        record.target = Some("setup".to_string());
        record.caller = Some(Caller::new("src/main.rs", 42));
        record.fields = vec![Field::new("zeta", 1), Field::new("alpha", "x")];
        record
    }

    #[test]
    fn console_line_layout() {
        let line = String::from_utf8(Encoder::Console.encode(&sample())).unwrap();
        assert_eq!(
            line,
            "2024-03-09T17:04:05Z\tWARN\tsetup\tsrc/main.rs:42\tdisk almost full\t{\"zeta\":1,\"alpha\":\"x\"}\n"
        );
    }

    #[test]
    fn console_omits_empty_parts() {
        let mut record = LogRecord::new(Level::Info, "ready");
        record.timestamp = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let line = String::from_utf8(Encoder::Console.encode(&record)).unwrap();
        assert_eq!(line, "2024-01-01T00:00:00Z\tINFO\tready\n");
    }

    #[test]
    fn structured_keeps_field_order() {
        let bytes = Encoder::Structured.encode(&sample());
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.ends_with('\n'));
        assert_eq!(text.matches('\n').count(), 1);

        let zeta = text.find("\"zeta\"").unwrap();
        let alpha = text.find("\"alpha\"").unwrap();
        assert!(zeta < alpha);

        let parsed: Value = serde_json::from_str(text.trim_end()).unwrap();
        assert_eq!(parsed["ts"], json!("2024-03-09T17:04:05Z"));
        assert_eq!(parsed["level"], json!("warn"));
        assert_eq!(parsed["logger"], json!("setup"));
        assert_eq!(parsed["caller"], json!("src/main.rs:42"));
        assert_eq!(parsed["msg"], json!("disk almost full"));
        assert_eq!(parsed["zeta"], json!(1));
    }

    #[test]
    fn encoder_follows_format() {
        assert_eq!(Encoder::for_format(Format::Console), Encoder::Console);
        assert_eq!(Encoder::for_format(Format::Structured), Encoder::Structured);
    }
}
