//! Process-global registration. Kept to a single test: `log` and `tracing`
//! backends can only be installed once per test binary.

mod common;

use common::Capture;
use controlplane_bootstrap::{
    init_logging, init_logging_with_writer, Error, Format, LegacyVerbosity, Level, LoggerConfig,
    LoggingConfig,
};
use serde_json::json;

#[test]
fn every_facility_lands_on_the_one_writer() {
    let capture = Capture::default();
    let mut config = LoggingConfig::new(LoggerConfig::new(Level::Info, Format::Structured));
    config.legacy_verbosity = LegacyVerbosity(0);

    let logging = init_logging_with_writer(config.clone(), capture.writer()).unwrap();

    logging.logger().info("from logger", &[("component", json!("setup"))]);
    log::info!(target: "client_go", "from log");
    log::debug!("dropped by legacy verbosity");
    tracing::info!(answer = 42, "from tracing");
    tracing::debug!("dropped by level");

    let records = capture.records();
    let messages: Vec<_> = records.iter().map(|r| r["msg"].clone()).collect();
    assert_eq!(
        messages,
        vec![json!("from logger"), json!("from log"), json!("from tracing")]
    );
    assert_eq!(records[1]["logger"], json!("client_go"));
    assert_eq!(records[2]["answer"], json!(42));
    for record in &records {
        assert!(record["caller"].as_str().unwrap().starts_with("tests/bootstrap.rs:"));
        assert!(record["ts"].as_str().unwrap().ends_with('Z'));
    }

    assert!(matches!(
        init_logging_with_writer(config.clone(), capture.writer()),
        Err(Error::AlreadyInitialized)
    ));
    assert_eq!(capture.records().len(), 3);

    let path = std::env::temp_dir().join(format!("controlplane-reinit-{}.log", std::process::id()));
    let _ = std::fs::remove_file(&path);
    config.destination = path.display().to_string();
    assert!(matches!(init_logging(config), Err(Error::AlreadyInitialized)));
    assert!(!path.exists(), "a rejected init must not open its destination");
}
