use crate::error::WriterInitError;
use std::fmt;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing_subscriber::fmt::MakeWriter;

/// The one destination every facility writes to.
///
/// Cloning yields another handle to the same destination. Each call to
/// [`SynchronizedWriter::write_record`] holds the lock for the whole record,
/// so concurrent producers never interleave partial lines; records appear
/// in lock admission order.
#[derive(Clone)]
pub struct SynchronizedWriter {
    inner: Arc<Mutex<Box<dyn Write + Send>>>,
    destination: Arc<str>,
}

impl SynchronizedWriter {
    /// Wrap an arbitrary writer.
    pub fn new(writer: impl Write + Send + 'static) -> Self {
        Self::with_destination(Box::new(writer), "custom")
    }

    fn with_destination(writer: Box<dyn Write + Send>, destination: &str) -> Self {
        Self {
            inner: Arc::new(Mutex::new(writer)),
            destination: Arc::from(destination),
        }
    }

    /// Open `stderr`, `stdout` or a file path (created if missing, appended to).
    pub fn open(destination: &str) -> Result<Self, WriterInitError> {
        match destination {
            "stderr" => Ok(Self::with_destination(Box::new(io::stderr()), destination)),
            "stdout" => Ok(Self::with_destination(Box::new(io::stdout()), destination)),
            path => {
                let file = OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)
                    .map_err(|source| WriterInitError {
                        path: PathBuf::from(path),
                        source,
                    })?;
                Ok(Self::with_destination(Box::new(file), destination))
            }
        }
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    /// Append one complete record.
    pub fn write_record(&self, bytes: &[u8]) -> io::Result<()> {
        let mut writer = self.lock();
        writer.write_all(bytes)?;
        writer.flush()
    }

    /// Flush whatever the destination buffers.
    pub fn sync(&self) -> io::Result<()> {
        self.lock().flush()
    }

    // The boxed writer carries no invariant a panicking producer could break,
    // so a poisoned lock is simply taken over.
    fn lock(&self) -> MutexGuard<'_, Box<dyn Write + Send>> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl fmt::Debug for SynchronizedWriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SynchronizedWriter")
            .field("destination", &self.destination)
            .finish()
    }
}

/// Every `write` call is admitted as one record.
impl Write for SynchronizedWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_record(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.sync()
    }
}

impl<'a> MakeWriter<'a> for SynchronizedWriter {
    type Writer = SynchronizedWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
