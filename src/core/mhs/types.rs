// Core types for MHS probing
use std::time::Duration;

/// Interaction id of the PDS retrieval query sent through MHS outbound
pub const PDS_RETRIEVAL_INTERACTION_ID: &str = "QUPA_IN000008UK02";

/// ASID of the PDS spine endpoint receiving retrieval queries
pub const PDS_ASID: &str = "928942012545";

/// Time budget for the outbound send, in milliseconds
pub const OUTBOUND_TIMEOUT_MS: u64 = 20_000;

/// Path appended to the inbound base URL for the health check
pub const HEALTHCHECK_PATH: &str = "/healthcheck";

/// Status every probe expects from MHS
pub const EXPECTED_STATUS: u16 = 200;

/// Which probes a run should execute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProbeSelection {
    /// GET <inbound>/healthcheck only
    Health,
    /// POST of the PDS retrieval message only
    Outbound,
    /// Health check first, then outbound send
    #[default]
    All,
}

impl ProbeSelection {
    pub fn includes_health(&self) -> bool {
        matches!(self, ProbeSelection::Health | ProbeSelection::All)
    }

    pub fn includes_outbound(&self) -> bool {
        matches!(self, ProbeSelection::Outbound | ProbeSelection::All)
    }
}

/// Stable names of the two checks, used in reports and logs
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckName {
    InboundHealth,
    OutboundPdsRetrieval,
}

impl std::fmt::Display for CheckName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CheckName::InboundHealth => write!(f, "inbound_health"),
            CheckName::OutboundPdsRetrieval => write!(f, "outbound_pds_retrieval"),
        }
    }
}

/// Result of a single probe, pass or fail
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CheckOutcome {
    pub name: CheckName,
    pub passed: bool,
    /// URL the probe targeted
    pub url: String,
    /// HTTP status if a response was received
    pub status_code: Option<u16>,
    pub duration_ms: u64,
    /// Conversation id used for the exchange (outbound only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,
    /// Failure reason, absent on success
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Local timestamp when the probe finished
    pub checked_at: String,
}

impl CheckOutcome {
    pub fn passed(name: CheckName, url: String, status_code: u16, duration: Duration) -> Self {
        Self {
            name,
            passed: true,
            url,
            status_code: Some(status_code),
            duration_ms: duration.as_millis() as u64,
            correlation_id: None,
            message: None,
            checked_at: get_local_timestamp(),
        }
    }

    /// Fold a probe error into a failed outcome so the report can keep going
    pub fn failed(name: CheckName, url: String, error: &ProbeError, duration: Duration) -> Self {
        Self {
            name,
            passed: false,
            url,
            status_code: error.status_code(),
            duration_ms: duration.as_millis() as u64,
            correlation_id: None,
            message: Some(error.to_string()),
            checked_at: get_local_timestamp(),
        }
    }

    pub fn with_correlation_id(mut self, correlation_id: String) -> Self {
        self.correlation_id = Some(correlation_id);
        self
    }
}

/// Outcomes of one run, in execution order
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct ProbeReport {
    pub nhs_environment: String,
    pub outcomes: Vec<CheckOutcome>,
}

impl ProbeReport {
    pub fn new(nhs_environment: impl Into<String>) -> Self {
        Self {
            nhs_environment: nhs_environment.into(),
            outcomes: Vec::new(),
        }
    }

    pub fn push(&mut self, outcome: CheckOutcome) {
        self.outcomes.push(outcome);
    }

    /// True only when at least one check ran and none failed
    pub fn all_passed(&self) -> bool {
        !self.outcomes.is_empty() && self.outcomes.iter().all(|o| o.passed)
    }

    pub fn failures(&self) -> impl Iterator<Item = &CheckOutcome> {
        self.outcomes.iter().filter(|o| !o.passed)
    }
}

/// Failures a probe can surface
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProbeError {
    /// Connection refused, DNS failure, timeout or unreadable body
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("Unexpected status from {url}: expected {expected}, got {actual}")]
    UnexpectedStatus {
        url: String,
        expected: u16,
        actual: u16,
    },
    #[error("Response body does not contain expected ODS code {ods_code}")]
    MissingOdsCode { ods_code: String, status_code: u16 },
    /// Request envelope could not be built
    #[error("Envelope error: {0}")]
    Envelope(String),
}

impl ProbeError {
    /// HTTP status carried by the error, if a response was received
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ProbeError::UnexpectedStatus { actual, .. } => Some(*actual),
            ProbeError::MissingOdsCode { status_code, .. } => Some(*status_code),
            ProbeError::Transport(_) | ProbeError::Envelope(_) => None,
        }
    }
}

impl From<serde_json::Error> for ProbeError {
    fn from(error: serde_json::Error) -> Self {
        ProbeError::Envelope(error.to_string())
    }
}

/// Get current local timestamp in ISO-8601 format with timezone
pub fn get_local_timestamp() -> String {
    chrono::Local::now().to_rfc3339()
}
