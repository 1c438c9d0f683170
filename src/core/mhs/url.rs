//! URL Construction Utilities for MHS Probes
//!
//! MHS deployments follow a fixed naming scheme per NHS environment:
//! - Inbound: `https://inbound.mhs.{env}.non-prod.patient-deductions.nhs.uk`
//! - Outbound: `https://outbound.mhs.{env}.non-prod.patient-deductions.nhs.uk`

use super::types::HEALTHCHECK_PATH;
use url::Url;

const MHS_DOMAIN_SUFFIX: &str = "non-prod.patient-deductions.nhs.uk";

#[derive(Debug, thiserror::Error)]
pub enum UrlError {
    #[error("Invalid URL format: {0}")]
    ParseError(#[from] url::ParseError),
    #[error("Missing host in URL")]
    MissingHost,
    #[error("Unsupported URL scheme: {0}")]
    UnsupportedScheme(String),
}

/// Build the outbound endpoint for an NHS environment
///
/// # Examples
/// - `dev` → `https://outbound.mhs.dev.non-prod.patient-deductions.nhs.uk`
/// - `test` → `https://outbound.mhs.test.non-prod.patient-deductions.nhs.uk`
pub fn build_outbound_url(nhs_environment: &str) -> String {
    format!("https://outbound.mhs.{}.{}", nhs_environment, MHS_DOMAIN_SUFFIX)
}

/// Build the inbound base URL for an NHS environment
///
/// Only used when no inbound URL is configured explicitly.
pub fn build_inbound_url(nhs_environment: &str) -> String {
    format!("https://inbound.mhs.{}.{}", nhs_environment, MHS_DOMAIN_SUFFIX)
}

/// Build health check URL: normalize(base_url) + "/healthcheck"
///
/// # Examples
/// - `https://inbound.example.com` → `https://inbound.example.com/healthcheck`
/// - `http://localhost:8080/` → `http://localhost:8080/healthcheck`
pub fn build_healthcheck_url(base_url: &str) -> String {
    format!("{}{}", normalize_base_url(base_url), HEALTHCHECK_PATH)
}

/// Normalize base URL by trimming trailing slashes
pub fn normalize_base_url(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}

/// Check that a configured URL is absolute http(s) with a host
pub fn validate_url(url_str: &str) -> Result<(), UrlError> {
    let url = Url::parse(url_str)?;

    match url.scheme() {
        "http" | "https" => {}
        other => return Err(UrlError::UnsupportedScheme(other.to_string())),
    }

    url.host_str().ok_or(UrlError::MissingHost)?;
    Ok(())
}
