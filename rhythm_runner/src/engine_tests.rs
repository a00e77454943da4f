//! Unit tests for the Engine logging hub
//!
//! IMPORTANT: the logger is a global shared by every test in this binary.
//! Tests that swap it are marked #[serial], and only look at entries from
//! their own source since unrelated tests may log concurrently.

use std::sync::{Arc, Mutex};
use serial_test::serial;
use crate::error::Error;
use crate::log::{LogEntry, LogSeverity, Logger};
use super::*;

// ============================================================================
// TEST HELPERS
// ============================================================================

/// Captures (severity, message, file, line) for one source
struct CaptureLogger {
    source: &'static str,
    entries: Arc<Mutex<Vec<(LogSeverity, String, Option<&'static str>, Option<u32>)>>>,
}

impl Logger for CaptureLogger {
    fn log(&self, entry: &LogEntry) {
        if entry.source == self.source {
            self.entries.lock().unwrap().push((
                entry.severity,
                entry.message.clone(),
                entry.file,
                entry.line,
            ));
        }
    }
}

type Captured = Arc<Mutex<Vec<(LogSeverity, String, Option<&'static str>, Option<u32>)>>>;

fn capture(source: &'static str) -> Captured {
    let entries = Arc::new(Mutex::new(Vec::new()));
    Engine::set_logger(CaptureLogger {
        source,
        entries: Arc::clone(&entries),
    });
    entries
}

// ============================================================================
// LOGGER REPLACEMENT
// ============================================================================

#[test]
#[serial]
fn test_set_logger_receives_entries() {
    let entries = capture("test::engine_basic");

    Engine::log(LogSeverity::Info, "test::engine_basic", "hello".to_string());
    Engine::log(LogSeverity::Warn, "test::elsewhere", "ignored".to_string());

    let captured = entries.lock().unwrap().clone();
    Engine::reset_logger();

    assert_eq!(captured.len(), 1);
    assert_eq!(captured[0].0, LogSeverity::Info);
    assert_eq!(captured[0].1, "hello");
    assert_eq!(captured[0].2, None);
}

#[test]
#[serial]
fn test_reset_logger_detaches_custom_logger() {
    let entries = capture("test::engine_reset");
    Engine::reset_logger();

    Engine::log(LogSeverity::Info, "test::engine_reset", "after reset".to_string());

    assert!(entries.lock().unwrap().is_empty());
}

#[test]
#[serial]
fn test_log_detailed_carries_location() {
    let entries = capture("test::engine_detailed");

    Engine::log_detailed(
        LogSeverity::Error,
        "test::engine_detailed",
        "boom".to_string(),
        "spatial_tree.rs",
        42,
    );

    let captured = entries.lock().unwrap().clone();
    Engine::reset_logger();

    assert_eq!(captured.len(), 1);
    assert_eq!(captured[0].2, Some("spatial_tree.rs"));
    assert_eq!(captured[0].3, Some(42));
}

// ============================================================================
// MACROS
// ============================================================================

#[test]
#[serial]
fn test_severity_macros() {
    let entries = capture("test::engine_macros");

    crate::runner_trace!("test::engine_macros", "t {}", 1);
    crate::runner_debug!("test::engine_macros", "d {}", 2);
    crate::runner_info!("test::engine_macros", "i {}", 3);
    crate::runner_warn!("test::engine_macros", "w {}", 4);
    crate::runner_error!("test::engine_macros", "e {}", 5);

    let captured = entries.lock().unwrap().clone();
    Engine::reset_logger();

    let severities: Vec<LogSeverity> = captured.iter().map(|e| e.0).collect();
    assert_eq!(
        severities,
        vec![
            LogSeverity::Trace,
            LogSeverity::Debug,
            LogSeverity::Info,
            LogSeverity::Warn,
            LogSeverity::Error,
        ]
    );
    assert_eq!(captured[2].1, "i 3");
    // Only errors record where they happened
    assert!(captured[..4].iter().all(|e| e.2.is_none()));
    assert!(captured[4].2.is_some() && captured[4].3.is_some());
}

fn failing_operation(value: i32) -> crate::error::Result<i32> {
    if value < 0 {
        crate::runner_bail!("test::engine_bail", InvalidInput, "negative value {}", value);
    }
    Ok(value * 2)
}

#[test]
#[serial]
fn test_runner_err_and_bail() {
    let entries = capture("test::engine_bail");

    let err = crate::runner_err!("test::engine_bail", InvalidConfig, "bad key {}", "x");
    let bailed = failing_operation(-3);
    let ok = failing_operation(4);

    let captured = entries.lock().unwrap().clone();
    Engine::reset_logger();

    assert_eq!(err, Error::InvalidConfig("bad key x".to_string()));
    assert_eq!(bailed, Err(Error::InvalidInput("negative value -3".to_string())));
    assert_eq!(ok, Ok(8));

    assert_eq!(captured.len(), 2);
    assert!(captured.iter().all(|e| e.0 == LogSeverity::Error));
    assert_eq!(captured[1].1, "negative value -3");
}
