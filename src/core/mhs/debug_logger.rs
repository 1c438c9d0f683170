use std::sync::{Arc, Mutex, OnceLock};
use std::sync::atomic::{AtomicU32, Ordering};
use std::io::{Write, BufReader};
use std::path::{Path, PathBuf};
use std::env;
use std::fs::{File, OpenOptions};
use std::collections::HashMap;

use serde::{Serialize, Deserialize};
use chrono::Local;
use uuid::Uuid;
use flate2::{write::GzEncoder, Compression};
use fs2::FileExt;
use regex::Regex;

/// Size at which the active log is archived
pub const LOG_ROTATION_SIZE_BYTES: u64 = 8 * 1024 * 1024;
/// Gzip archives kept next to the active log
pub const MAX_ARCHIVES: usize = 5;
const ROTATION_CHECK_INTERVAL: u32 = 200;

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct LogEntry {
    pub timestamp: String,                                  // ISO-8601 with timezone
    pub level: String,                                      // DEBUG, ERROR, PROBE, CONFIG
    pub component: String,
    pub event: String,
    pub message: String,                                    // Redacted
    pub correlation_id: Option<String>,                     // Conversation id or session id
    pub fields: HashMap<String, serde_json::Value>,
}

/// Append-only JSONL file archived to `<stem>.<timestamp>.gz` once it grows
/// past `LOG_ROTATION_SIZE_BYTES`
struct RotatingLogger {
    log_path: PathBuf,
    log_dir: PathBuf,
    archive_prefix: String,
    write_count: AtomicU32,
}

impl RotatingLogger {
    fn new(log_path: PathBuf) -> Self {
        let log_dir = log_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let stem = log_path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "mhs-probe-debug".to_string());
        let _ = std::fs::create_dir_all(&log_dir);

        Self {
            log_path,
            log_dir,
            archive_prefix: format!("{}.", stem),
            write_count: AtomicU32::new(0),
        }
    }

    /// Size is checked on the first write and every `ROTATION_CHECK_INTERVAL` after
    fn append(&self, json_line: &str) -> Result<(), std::io::Error> {
        if self.write_count.fetch_add(1, Ordering::Relaxed) % ROTATION_CHECK_INTERVAL == 0 {
            let _ = self.rotate_if_due();
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)?;
        writeln!(file, "{}", json_line)
    }

    fn is_over_limit(&self) -> bool {
        std::fs::metadata(&self.log_path)
            .map(|m| m.len() >= LOG_ROTATION_SIZE_BYTES)
            .unwrap_or(false)
    }

    fn rotate_if_due(&self) -> Result<(), std::io::Error> {
        if !self.is_over_limit() {
            return Ok(());
        }

        // Concurrent runs may share the log; one rotates, the rest skip
        let lock_path = self.log_path.with_extension("lock");
        let lock_file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&lock_path)?;
        if lock_file.try_lock_exclusive().is_err() {
            return Ok(());
        }

        let result = if self.is_over_limit() {
            self.archive_current().and_then(|_| self.prune_archives())
        } else {
            Ok(())
        };
        let _ = FileExt::unlock(&lock_file);
        let _ = std::fs::remove_file(&lock_path);
        result
    }

    fn archive_current(&self) -> Result<(), std::io::Error> {
        let archive_path = self.log_dir.join(format!(
            "{}{}.gz",
            self.archive_prefix,
            Local::now().format("%Y%m%d_%H%M%S")
        ));

        let staging_path = self.log_path.with_extension("rotating");
        std::fs::rename(&self.log_path, &staging_path)?;

        let mut encoder = GzEncoder::new(File::create(&archive_path)?, Compression::default());
        std::io::copy(&mut BufReader::new(File::open(&staging_path)?), &mut encoder)?;
        encoder.finish()?;

        std::fs::remove_file(&staging_path)
    }

    /// Keep the `MAX_ARCHIVES` most recently modified archives
    fn prune_archives(&self) -> Result<(), std::io::Error> {
        let mut archives = Vec::new();
        for entry in std::fs::read_dir(&self.log_dir)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().to_string();
            if name.starts_with(&self.archive_prefix) && name.ends_with(".gz") {
                archives.push((entry.metadata()?.modified()?, entry.path()));
            }
        }

        archives.sort_by(|a, b| b.0.cmp(&a.0));
        for (_, path) in archives.into_iter().skip(MAX_ARCHIVES) {
            let _ = std::fs::remove_file(path);
        }
        Ok(())
    }
}

/// JSON Lines debug logger for probe runs
///
/// Disabled unless `MHS_PROBE_DEBUG` is set. Every message passes through
/// redaction before it is written, so NHS numbers and credentials never
/// reach disk.
pub struct EnhancedDebugLogger {
    enabled: bool,
    rotating_logger: Option<Arc<Mutex<RotatingLogger>>>,
    session_id: String,
    redaction_patterns: &'static [Regex],
}

impl Default for EnhancedDebugLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl EnhancedDebugLogger {
    pub fn new() -> Self {
        let enabled = Self::parse_debug_enabled();
        let log_path = if enabled { Some(Self::get_log_path()) } else { None };
        Self::build(enabled, log_path)
    }

    /// Logger writing to an explicit path, enabled regardless of environment
    pub fn with_log_path(log_path: PathBuf) -> Self {
        Self::build(true, Some(log_path))
    }

    /// Logger that writes nothing, whatever the environment says
    pub fn disabled() -> Self {
        Self::build(false, None)
    }

    fn build(enabled: bool, log_path: Option<PathBuf>) -> Self {
        let session_id = Uuid::new_v4().to_string()[..8].to_string();
        let rotating_logger = log_path.map(|path| Arc::new(Mutex::new(RotatingLogger::new(path))));

        Self {
            enabled,
            rotating_logger,
            session_id,
            redaction_patterns: redaction_patterns(),
        }
    }

    /// Parse debug enabled status from MHS_PROBE_DEBUG
    /// Supports: true/false, 1/0, yes/no, on/off (case insensitive)
    fn parse_debug_enabled() -> bool {
        env::var("MHS_PROBE_DEBUG")
            .map(|v| matches!(v.trim().to_lowercase().as_str(), "true" | "1" | "yes" | "on"))
            .unwrap_or(false)
    }

    fn get_log_path() -> PathBuf {
        if let Ok(dir) = env::var("MHS_PROBE_LOG_DIR") {
            return PathBuf::from(dir).join("mhs-probe-debug.log");
        }

        let mut log_path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
        log_path.push("mhs-probe");
        log_path.push("mhs-probe-debug.log");
        log_path
    }

    pub fn redact_sensitive_data(&self, text: &str) -> String {
        let mut redacted = text.to_string();

        for regex in self.redaction_patterns {
            redacted = regex.replace_all(&redacted, "[REDACTED]").to_string();
        }

        redacted
    }

    fn log_sync(
        &self,
        level: &str,
        component: &str,
        event: &str,
        message: &str,
        correlation_id: Option<String>,
        fields: HashMap<String, serde_json::Value>,
    ) {
        if !self.enabled {
            return;
        }

        let entry = LogEntry {
            timestamp: Local::now().to_rfc3339(),
            level: level.to_string(),
            component: component.to_string(),
            event: event.to_string(),
            message: self.redact_sensitive_data(message),
            correlation_id: correlation_id.or_else(|| Some(self.session_id.clone())),
            fields,
        };

        if let Some(logger) = &self.rotating_logger {
            if let Ok(logger) = logger.lock() {
                if let Ok(json_line) = serde_json::to_string(&entry) {
                    let _ = logger.append(&json_line);
                }
            }
        }
    }

    pub fn debug_sync(&self, component: &str, event: &str, message: &str) {
        self.log_sync("DEBUG", component, event, message, None, HashMap::new());
    }

    pub fn error_sync(&self, component: &str, event: &str, message: &str) {
        self.log_sync("ERROR", component, event, message, None, HashMap::new());
    }

    pub fn probe_start(&self, check: &str, url: &str, timeout_ms: Option<u64>, correlation_id: Option<String>) {
        let mut fields = HashMap::new();
        fields.insert("check".to_string(), serde_json::Value::String(check.to_string()));
        fields.insert("url".to_string(), serde_json::Value::String(url.to_string()));
        if let Some(timeout) = timeout_ms {
            fields.insert("timeout_ms".to_string(), serde_json::Value::Number(timeout.into()));
        }

        self.log_sync("PROBE", "MhsProbe", "probe_start",
                     &format!("Starting {} against {}", check, url),
                     correlation_id, fields);
    }

    pub fn probe_end(&self, check: &str, passed: bool, http_status: Option<u16>, duration_ms: u64, correlation_id: Option<String>) {
        let status = if passed { "passed" } else { "failed" };
        let mut fields = HashMap::new();
        fields.insert("check".to_string(), serde_json::Value::String(check.to_string()));
        fields.insert("status".to_string(), serde_json::Value::String(status.to_string()));
        fields.insert("duration_ms".to_string(), serde_json::Value::Number(duration_ms.into()));

        if let Some(code) = http_status {
            fields.insert("http_status".to_string(), serde_json::Value::Number(code.into()));
        }

        self.log_sync("PROBE", "MhsProbe", "probe_end",
                     &format!("{} {} ({}ms)", check, status, duration_ms),
                     correlation_id, fields);
    }

    pub fn config_loaded(&self, nhs_environment: &str, source: &str) {
        let mut fields = HashMap::new();
        fields.insert("nhs_environment".to_string(), serde_json::Value::String(nhs_environment.to_string()));
        fields.insert("source".to_string(), serde_json::Value::String(source.to_string()));

        self.log_sync("CONFIG", "Config", "config_loaded",
                     &format!("Loaded configuration for {} from {}", nhs_environment, source),
                     None, fields);
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn get_session_id(&self) -> &str {
        &self.session_id
    }
}

/// Compiled once per process
fn redaction_patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            r"(?i)authorization[:\s]+[^\s\n]+",
            r"(?i)bearer[:\s]+[^\s\n]+",
            r"(?i)token[:\s]+[^\s\n]+",
            r"(?i)api[_-]?key[:\s]+[^\s\n]+",
            r"(?i)secret[:\s]+[^\s\n]+",
            // NHS numbers are patient identifiers
            r"\b\d{10}\b",
        ]
        .iter()
        .filter_map(|pattern| Regex::new(pattern).ok())
        .collect()
    })
}

pub fn get_debug_logger() -> EnhancedDebugLogger {
    EnhancedDebugLogger::new()
}
