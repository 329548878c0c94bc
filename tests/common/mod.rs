#![allow(dead_code)]

use controlplane_bootstrap::{Format, Level, Logger, LoggerConfig, SynchronizedWriter};
use serde_json::Value;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};

/// In-memory destination shared between a writer and the test.
#[derive(Clone, Default)]
pub struct Capture(Arc<Mutex<Vec<u8>>>);

impl Write for Capture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Capture {
    pub fn text(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }

    pub fn lines(&self) -> Vec<String> {
        self.text().lines().map(str::to_string).collect()
    }

    /// Every line parsed as one structured record.
    pub fn records(&self) -> Vec<Value> {
        self.lines()
            .iter()
            .map(|l| serde_json::from_str(l).unwrap_or_else(|e| panic!("bad line {l:?}: {e}")))
            .collect()
    }

    pub fn writer(&self) -> SynchronizedWriter {
        SynchronizedWriter::new(self.clone())
    }
}

pub fn logger(level: Level, format: Format) -> (Logger, Capture) {
    let capture = Capture::default();
    let logger = Logger::new(LoggerConfig::new(level, format), capture.writer());
    (logger, capture)
}

pub fn structured(level: Level) -> (Logger, Capture) {
    logger(level, Format::Structured)
}
