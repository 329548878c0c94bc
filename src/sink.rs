use crate::encoder::Encoder;
use crate::record::LogRecord;
use crate::writer::SynchronizedWriter;

/// Encoder bound to the shared writer.
///
/// Every producer (the application [`Logger`](crate::logger::Logger), the
/// legacy `log` bridge and the `tracing` layer) holds one of these, and all of
/// them point at the same [`SynchronizedWriter`]. None of them owns a private
/// destination.
#[derive(Clone, Debug)]
pub struct RecordSink {
    writer: SynchronizedWriter,
    encoder: Encoder,
}

impl RecordSink {
    pub fn new(writer: SynchronizedWriter, encoder: Encoder) -> Self {
        Self { writer, encoder }
    }

    pub fn encoder(&self) -> Encoder {
        self.encoder
    }

    pub fn writer(&self) -> &SynchronizedWriter {
        &self.writer
    }

    /// Encode and write one record as a single atomic write.
    ///
    /// There is nowhere left to report a failing log destination, so the
    /// error goes to the process stderr and the record is dropped.
    pub fn send(&self, record: &LogRecord) {
        let bytes = self.encoder.encode(record);
        if let Err(e) = self.writer.write_record(&bytes) {
            eprintln!("error writing log record: {}", e);
        }
    }
}
