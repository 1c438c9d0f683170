use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-environment test fixture
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentFixture {
    /// ASID of the sending system (the repository)
    pub repo_asid: String,
    /// NHS number of the synthetic patient queried on PDS
    pub nhs_number: String,
    /// ODS code of the patient's GP, expected in the outbound response
    pub gp_ods_code: String,
}

/// Probe configuration, loaded once and read-only afterwards
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Selected NHS environment, e.g. "dev" or "test"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nhs_environment: Option<String>,
    /// Base URL of MHS inbound; derived from the environment when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mhs_inbound_url: Option<String>,
    /// Override for the MHS outbound endpoint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mhs_outbound_url: Option<String>,
    /// Fixtures keyed by environment name
    #[serde(default)]
    pub fixtures: BTreeMap<String, EnvironmentFixture>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config directory not found")]
    ConfigDirNotFound,
    #[error("Config read error: {0}")]
    Read(String),
    #[error("Config parse error: {0}")]
    Parse(String),
    #[error("No NHS environment selected (set nhs_environment, NHS_ENVIRONMENT or --env)")]
    MissingEnvironment,
    #[error("No fixtures configured for environment '{0}'")]
    UnknownEnvironment(String),
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("HTTP client error: {0}")]
    Client(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(error: std::io::Error) -> Self {
        ConfigError::Read(error.to_string())
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(error: toml::de::Error) -> Self {
        ConfigError::Parse(error.to_string())
    }
}
