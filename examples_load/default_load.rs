use serde_json::json;
use std::thread;
use std::time::Instant;

use controlplane_bootstrap::{Format, Level, Logger, LoggerConfig, SynchronizedWriter};

fn main() {
    // Discard output to measure encoding and lock contention only.
    let writer = SynchronizedWriter::new(std::io::sink());
    let logger = Logger::new(LoggerConfig::new(Level::Info, Format::Structured), writer)
        .with_values(&[("component", json!("load"))]);

    let producers: u64 = 8;
    let per_producer: u64 = 50_000;
    let start = Instant::now();

    let handles: Vec<_> = (0..producers)
        .map(|p| {
            let logger = logger.with_values(&[("producer", json!(p))]);
            thread::spawn(move || {
                for i in 0..per_producer {
                    logger.info("load test record", &[("iteration", json!(i))]);
                }
            })
        })
        .collect();
    for handle in handles {
        let _ = handle.join();
    }

    let n = producers * per_producer;
    let elapsed = start.elapsed();
    println!("default load: wrote {} records in {:?} (~{:.0} rec/s)",
        n,
        elapsed,
        n as f64 / elapsed.as_secs_f64()
    );
}
