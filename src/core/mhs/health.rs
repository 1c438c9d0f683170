//! Inbound Health Check Probe
//!
//! One GET to `<mhsInboundUrl>/healthcheck` with the transport's default
//! timeout. Passes iff MHS inbound answers 200.

use super::client::{MhsHttpClient, MhsRequest};
use super::debug_logger::EnhancedDebugLogger;
use super::types::{CheckName, CheckOutcome, ProbeError, EXPECTED_STATUS};
use super::url::build_healthcheck_url;

/// Check that MHS inbound is up
///
/// # Arguments
/// * `base_url` - Inbound base URL, trailing slashes tolerated
/// * `client` - HTTP client for making the request
/// * `logger` - Receives start and end events
///
/// # Returns
/// * `Ok(CheckOutcome)` - Status was 200
/// * `Err(ProbeError::UnexpectedStatus)` - Any other status
/// * `Err(ProbeError::Transport)` - Request never produced a response
pub async fn check_inbound_health(
    base_url: &str,
    client: &dyn MhsHttpClient,
    logger: &EnhancedDebugLogger,
) -> Result<CheckOutcome, ProbeError> {
    let url = build_healthcheck_url(base_url);
    let check = CheckName::InboundHealth.to_string();

    logger.probe_start(&check, &url, None, None);

    let response = match client.send(MhsRequest::get(url.clone())).await {
        Ok(response) => response,
        Err(e) => {
            logger.error_sync("MhsProbe", "transport_error", &e);
            return Err(ProbeError::Transport(e));
        }
    };

    let duration_ms = response.duration.as_millis() as u64;
    let passed = response.status_code == EXPECTED_STATUS;
    logger.probe_end(&check, passed, Some(response.status_code), duration_ms, None);

    if !passed {
        return Err(ProbeError::UnexpectedStatus {
            url,
            expected: EXPECTED_STATUS,
            actual: response.status_code,
        });
    }

    Ok(CheckOutcome::passed(
        CheckName::InboundHealth,
        url,
        response.status_code,
        response.duration,
    ))
}
