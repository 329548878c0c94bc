mod common;

use common::{logger, structured, Capture};
use controlplane_bootstrap::{ConfigError, Format, FrameworkLogger, Level, Logger};
use serde_json::json;
use std::sync::{Arc, Barrier};
use std::thread;

#[test]
fn every_level_and_format_constructs() {
    for level in Level::ALL {
        for format in Format::ALL {
            let (logger, _) = logger(level, format);
            assert_eq!(logger.level(), level);
        }
    }
}

#[test]
fn raw_selectors_are_validated_before_building() {
    let capture = Capture::default();
    let logger = Logger::from_raw("WARN", "structured", capture.writer()).unwrap();
    assert_eq!(logger.level(), Level::Warn);

    for bad in ["TRACE", "warn", "", "5"] {
        let err = Logger::from_raw(bad, "console", capture.writer()).unwrap_err();
        assert_eq!(err, ConfigError::InvalidLevel(bad.to_string()));
    }
    let err = Logger::from_raw("INFO", "logfmt", capture.writer()).unwrap_err();
    assert_eq!(err, ConfigError::InvalidFormat("logfmt".to_string()));
    assert!(capture.text().is_empty());
}

#[test]
fn with_values_extends_without_mutating() {
    let (root, capture) = structured(Level::Info);
    let child = root.with_values(&[("a", json!(1))]).with_values(&[("b", json!(2))]);

    child.info("child", &[]);
    root.info("root", &[]);

    let records = capture.records();
    assert_eq!(records[0]["a"], json!(1));
    assert_eq!(records[0]["b"], json!(2));
    assert!(records[1].get("a").is_none());
    assert!(records[1].get("b").is_none());
    assert!(root.fields().is_empty());

    let line = &capture.lines()[0];
    assert!(line.find("\"a\"").unwrap() < line.find("\"b\"").unwrap());
}

#[test]
fn call_site_pairs_follow_context_fields() {
    let (root, capture) = logger(Level::Info, Format::Console);
    root.with_values(&[("controller", json!("pods"))])
        .info("reconciled", &[("durationMs", json!(12))]);

    let line = &capture.lines()[0];
    assert!(line.ends_with("\treconciled\t{\"controller\":\"pods\",\"durationMs\":12}"));
    assert!(line.contains("\tINFO\t"));
}

#[test]
fn warn_threshold_filters_debug() {
    let (logger, capture) = structured(Level::Warn);
    logger.debug("dropped", &[]);
    assert!(capture.text().is_empty());

    logger.warn("kept", &[]);
    assert_eq!(capture.lines().len(), 1);
    assert_eq!(capture.records()[0]["level"], json!("warn"));
}

#[test]
fn threshold_is_inclusive() {
    let (logger, capture) = structured(Level::Info);
    logger.debug("d", &[]);
    logger.info("i", &[]);
    logger.warn("w", &[]);
    logger.error("boom", "e", &[]);

    let levels: Vec<_> = capture.records().iter().map(|r| r["level"].clone()).collect();
    assert_eq!(levels, vec![json!("info"), json!("warn"), json!("error")]);
}

#[test]
fn error_folds_cause_into_message() {
    let (logger, capture) = structured(Level::Debug);
    let err = std::io::Error::new(std::io::ErrorKind::NotFound, "kubeconfig missing");
    logger.error(&err, "failed to load config", &[("path", json!("/etc/kube"))]);

    let record = &capture.records()[0];
    assert_eq!(record["msg"], json!("failed to load config: kubeconfig missing"));
    assert_eq!(record["path"], json!("/etc/kube"));
    assert!(record.get("error").is_none());
}

#[test]
fn names_nest_with_dots() {
    let (root, capture) = structured(Level::Info);
    root.with_name("controller").with_name("pods").info("hi", &[]);
    assert_eq!(capture.records()[0]["logger"], json!("controller.pods"));
    assert!(root.name().is_none());
}

#[test]
fn caller_is_the_direct_call_site() {
    let (logger, capture) = structured(Level::Debug);
    let expected = line!() + 1;
    logger.info("direct", &[]);

    assert_eq!(
        capture.records()[0]["caller"],
        json!(format!("{}:{}", file!(), expected))
    );
}

#[test]
fn caller_survives_the_framework_adapter() {
    let (logger, capture) = structured(Level::Debug);
    let framework = logger.framework();

    let info_line = line!() + 1;
    framework.info("bridged", &[]);
    let err = std::io::Error::new(std::io::ErrorKind::Other, "lease lost");
    let error_line = line!() + 1;
    framework.error(&err, "leader election", &[]);

    let records = capture.records();
    assert_eq!(records[0]["caller"], json!(format!("{}:{}", file!(), info_line)));
    assert_eq!(records[1]["caller"], json!(format!("{}:{}", file!(), error_line)));
    assert_eq!(records[1]["msg"], json!("leader election: lease lost"));
}

#[test]
fn framework_enabled_mirrors_threshold() {
    let (logger, _) = structured(Level::Warn);
    let framework = logger.framework();
    assert!(!framework.enabled(Level::Info));
    assert!(framework.enabled(Level::Warn));
    assert!(framework.enabled(Level::Error));
}

#[test]
fn concurrent_records_never_interleave() {
    const PRODUCERS: usize = 32;
    let (logger, capture) = structured(Level::Info);
    let barrier = Arc::new(Barrier::new(PRODUCERS));
    let payload = "x".repeat(8 * 1024);

    let handles: Vec<_> = (0..PRODUCERS)
        .map(|i| {
            let logger = logger.with_values(&[("producer", json!(i))]);
            let barrier = Arc::clone(&barrier);
            let payload = payload.clone();
            thread::spawn(move || {
                barrier.wait();
                logger.info("burst", &[("payload", json!(payload))]);
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let records = capture.records();
    assert_eq!(records.len(), PRODUCERS);
    let mut producers: Vec<u64> = records
        .iter()
        .map(|r| {
            assert_eq!(r["payload"].as_str().unwrap().len(), payload.len());
            r["producer"].as_u64().unwrap()
        })
        .collect();
    producers.sort_unstable();
    assert_eq!(producers, (0..PRODUCERS as u64).collect::<Vec<_>>());
}

#[test]
fn console_timestamp_is_rfc3339_utc() {
    let (logger, capture) = logger(Level::Info, Format::Console);
    logger.info("tick", &[]);

    let line = &capture.lines()[0];
    let ts = line.split('\t').next().unwrap();
    assert!(ts.ends_with('Z'));
    assert_eq!(ts.len(), "2024-01-01T00:00:00Z".len());
    chrono::DateTime::parse_from_rfc3339(ts).unwrap();
}
