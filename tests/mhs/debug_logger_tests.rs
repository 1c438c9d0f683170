use crate::common::IsolatedEnv;
use flate2::read::GzDecoder;
use mhs_probe::core::mhs::debug_logger::{
    EnhancedDebugLogger, LogEntry, LOG_ROTATION_SIZE_BYTES, MAX_ARCHIVES,
};
use serial_test::serial;
use std::fs;
use std::io::Read;
use std::time::{Duration, SystemTime};

fn read_entries(path: &std::path::Path) -> Vec<LogEntry> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

#[test]
#[serial]
fn test_debug_logger_disabled_by_default() {
    let _env = IsolatedEnv::new();
    let logger = EnhancedDebugLogger::new();
    assert!(!logger.is_enabled());
}

#[test]
#[serial]
fn test_debug_logger_env_var_parsing() {
    let env = IsolatedEnv::new();
    let temp_dir = tempfile::tempdir().unwrap();
    env.set("MHS_PROBE_LOG_DIR", temp_dir.path().to_str().unwrap());

    let cases = [
        ("true", true),
        ("ON", true),
        ("1", true),
        ("yes", true),
        ("false", false),
        ("0", false),
        ("", false),
        ("maybe", false),
    ];

    for (value, expected) in cases {
        env.set("MHS_PROBE_DEBUG", value);
        let logger = EnhancedDebugLogger::new();
        assert_eq!(logger.is_enabled(), expected, "Failed for value: {}", value);
    }
}

#[test]
fn test_check_events_written_as_json_lines() {
    let temp_dir = tempfile::tempdir().unwrap();
    let log_path = temp_dir.path().join("checks.log");
    let logger = EnhancedDebugLogger::with_log_path(log_path.clone());

    logger.probe_start("outbound_pds_retrieval", "https://outbound.example.test", Some(20_000), Some("conv-1".to_string()));
    logger.probe_end("outbound_pds_retrieval", true, Some(200), 812, Some("conv-1".to_string()));

    let entries = read_entries(&log_path);
    assert_eq!(entries.len(), 2);

    assert_eq!(entries[0].level, "PROBE");
    assert_eq!(entries[0].event, "probe_start");
    assert_eq!(entries[0].correlation_id.as_deref(), Some("conv-1"));
    assert_eq!(entries[0].fields["timeout_ms"], 20_000);

    assert_eq!(entries[1].event, "probe_end");
    assert_eq!(entries[1].fields["status"], "passed");
    assert_eq!(entries[1].fields["http_status"], 200);
}

#[test]
fn test_session_id_used_without_correlation_id() {
    let temp_dir = tempfile::tempdir().unwrap();
    let log_path = temp_dir.path().join("checks.log");
    let logger = EnhancedDebugLogger::with_log_path(log_path.clone());

    logger.debug_sync("Config", "loaded", "config ready");

    let entries = read_entries(&log_path);
    assert_eq!(entries[0].correlation_id.as_deref(), Some(logger.get_session_id()));
    assert_eq!(logger.get_session_id().len(), 8);
}

#[test]
fn test_redacts_nhs_numbers_and_tokens() {
    let temp_dir = tempfile::tempdir().unwrap();
    let logger = EnhancedDebugLogger::with_log_path(temp_dir.path().join("checks.log"));

    let redacted = logger.redact_sensitive_data("patient 9692294951 with Bearer abc.def");
    assert!(!redacted.contains("9692294951"));
    assert!(!redacted.contains("abc.def"));
    assert!(redacted.contains("[REDACTED]"));

    // ASIDs are 12 digits and stay visible
    assert_eq!(logger.redact_sensitive_data("asid 928942012545"), "asid 928942012545");
}

fn archives_in(dir: &std::path::Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().to_string())
        .filter(|name| name.starts_with("rot.") && name.ends_with(".gz"))
        .collect();
    names.sort();
    names
}

#[test]
fn test_oversized_log_is_archived_as_gzip() {
    let temp_dir = tempfile::tempdir().unwrap();
    let log_path = temp_dir.path().join("rot.log");
    let original = "x".repeat(LOG_ROTATION_SIZE_BYTES as usize);
    fs::write(&log_path, &original).unwrap();

    let logger = EnhancedDebugLogger::with_log_path(log_path.clone());
    logger.debug_sync("Test", "after_rotation", "fresh line");

    let archives = archives_in(temp_dir.path());
    assert_eq!(archives.len(), 1);

    let mut decoder = GzDecoder::new(fs::File::open(temp_dir.path().join(&archives[0])).unwrap());
    let mut restored = String::new();
    decoder.read_to_string(&mut restored).unwrap();
    assert_eq!(restored, original);

    let entries = read_entries(&log_path);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].event, "after_rotation");
    assert!(!temp_dir.path().join("rot.lock").exists());
}

#[test]
fn test_log_under_limit_is_not_archived() {
    let temp_dir = tempfile::tempdir().unwrap();
    let log_path = temp_dir.path().join("rot.log");
    fs::write(&log_path, "x".repeat(1024)).unwrap();

    let logger = EnhancedDebugLogger::with_log_path(log_path.clone());
    logger.debug_sync("Test", "appended", "line");

    assert!(archives_in(temp_dir.path()).is_empty());
    assert!(fs::read_to_string(&log_path).unwrap().starts_with(&"x".repeat(1024)));
}

#[test]
fn test_rotation_keeps_newest_archives() {
    let temp_dir = tempfile::tempdir().unwrap();
    let log_path = temp_dir.path().join("rot.log");
    let now = SystemTime::now();

    for day in 1..=7 {
        let path = temp_dir.path().join(format!("rot.2020010{}_000000.gz", day));
        let file = fs::File::create(&path).unwrap();
        // later days are newer
        file.set_modified(now - Duration::from_secs(3600 * (8 - day)))
            .unwrap();
    }
    fs::write(&log_path, "x".repeat(LOG_ROTATION_SIZE_BYTES as usize)).unwrap();

    let logger = EnhancedDebugLogger::with_log_path(log_path);
    logger.debug_sync("Test", "after_rotation", "fresh line");

    let archives = archives_in(temp_dir.path());
    assert_eq!(archives.len(), MAX_ARCHIVES);
    for day in 1..=3 {
        assert!(!archives.contains(&format!("rot.2020010{}_000000.gz", day)));
    }
    for day in 4..=7 {
        assert!(archives.contains(&format!("rot.2020010{}_000000.gz", day)));
    }
}
