//! Outbound Message Sender
//!
//! Builds a fresh PDS retrieval query, wraps it in the JSON envelope MHS
//! outbound expects and POSTs it with a 20 second budget. The send passes
//! iff MHS answers 200 and the body mentions the patient's GP ODS code.

use super::client::{ClockTrait, MhsHttpClient, MhsRequest};
use super::debug_logger::EnhancedDebugLogger;
use super::message::PdsRetrievalMessage;
use super::types::{
    CheckName, CheckOutcome, ProbeError, EXPECTED_STATUS, OUTBOUND_TIMEOUT_MS, PDS_ASID,
    PDS_RETRIEVAL_INTERACTION_ID,
};
use crate::config::EnvironmentFixture;
use serde::Serialize;
use std::time::Duration;
use uuid::Uuid;

/// JSON body accepted by MHS outbound
#[derive(Debug, Serialize)]
struct OutboundBody<'a> {
    payload: &'a str,
}

/// Header set and payload of one outbound send
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundEnvelope {
    pub conversation_id: String,
    pub from_asid: String,
    pub payload: String,
}

impl OutboundEnvelope {
    pub fn new(
        conversation_id: impl Into<String>,
        from_asid: impl Into<String>,
        payload: impl Into<String>,
    ) -> Self {
        Self {
            conversation_id: conversation_id.into(),
            from_asid: from_asid.into(),
            payload: payload.into(),
        }
    }

    /// Headers in send order
    pub fn headers(&self) -> Vec<(String, String)> {
        vec![
            ("Content-Type".to_string(), "application/json".to_string()),
            ("Interaction-ID".to_string(), PDS_RETRIEVAL_INTERACTION_ID.to_string()),
            ("Correlation-Id".to_string(), self.conversation_id.clone()),
            ("Ods-Code".to_string(), "YES".to_string()),
            ("from-asid".to_string(), self.from_asid.clone()),
            ("wait-for-response".to_string(), "false".to_string()),
        ]
    }

    /// `{"payload": "<message>"}`
    pub fn body(&self) -> Result<Vec<u8>, ProbeError> {
        Ok(serde_json::to_vec(&OutboundBody {
            payload: &self.payload,
        })?)
    }

    /// POST request carrying this envelope with the outbound time budget
    pub fn into_request(self, url: &str) -> Result<MhsRequest, ProbeError> {
        let mut request = MhsRequest::post(url, self.body()?)
            .timeout(Duration::from_millis(OUTBOUND_TIMEOUT_MS));
        request.headers = self.headers();
        Ok(request)
    }
}

/// Fresh conversation id, unique per call
pub fn new_conversation_id() -> String {
    Uuid::new_v4().to_string()
}

/// Send a PDS retrieval query through MHS outbound
///
/// # Arguments
/// * `outbound_url` - MHS outbound endpoint for the environment
/// * `fixture` - Sender ASID, patient NHS number and expected GP ODS code
/// * `client` - HTTP client for making the request
/// * `clock` - Source of the message creation time
/// * `logger` - Receives start and end events, keyed by conversation id
///
/// # Returns
/// * `Ok(CheckOutcome)` - 200 with the ODS code present, carrying the conversation id
/// * `Err(ProbeError)` - Transport failure, wrong status or missing ODS code
pub async fn send_pds_retrieval(
    outbound_url: &str,
    fixture: &EnvironmentFixture,
    client: &dyn MhsHttpClient,
    clock: &dyn ClockTrait,
    logger: &EnhancedDebugLogger,
) -> Result<CheckOutcome, ProbeError> {
    send_tracking_conversation(outbound_url, fixture, client, clock, logger)
        .await
        .map_err(|(error, _)| error)
}

/// As `send_pds_retrieval`, also returning the conversation id on failure
pub(crate) async fn send_tracking_conversation(
    outbound_url: &str,
    fixture: &EnvironmentFixture,
    client: &dyn MhsHttpClient,
    clock: &dyn ClockTrait,
    logger: &EnhancedDebugLogger,
) -> Result<CheckOutcome, (ProbeError, String)> {
    let conversation_id = new_conversation_id();
    let check = CheckName::OutboundPdsRetrieval.to_string();

    let message = PdsRetrievalMessage::new(
        conversation_id.clone(),
        clock.message_timestamp(),
        PDS_ASID,
        fixture.repo_asid.clone(),
        fixture.nhs_number.clone(),
    );

    let request = OutboundEnvelope::new(
        conversation_id.clone(),
        fixture.repo_asid.clone(),
        message.render(),
    )
    .into_request(outbound_url)
    .map_err(|e| (e, conversation_id.clone()))?;

    logger.probe_start(&check, outbound_url, Some(OUTBOUND_TIMEOUT_MS), Some(conversation_id.clone()));

    let response = match client.send(request).await {
        Ok(response) => response,
        Err(e) => {
            logger.error_sync("MhsProbe", "transport_error", &e);
            return Err((ProbeError::Transport(e), conversation_id));
        }
    };

    let duration_ms = response.duration.as_millis() as u64;
    let result = if response.status_code != EXPECTED_STATUS {
        Err(ProbeError::UnexpectedStatus {
            url: outbound_url.to_string(),
            expected: EXPECTED_STATUS,
            actual: response.status_code,
        })
    } else if !response.body_text().contains(&fixture.gp_ods_code) {
        Err(ProbeError::MissingOdsCode {
            ods_code: fixture.gp_ods_code.clone(),
            status_code: response.status_code,
        })
    } else {
        Ok(())
    };

    logger.probe_end(
        &check,
        result.is_ok(),
        Some(response.status_code),
        duration_ms,
        Some(conversation_id.clone()),
    );

    match result {
        Ok(()) => Ok(CheckOutcome::passed(
            CheckName::OutboundPdsRetrieval,
            outbound_url.to_string(),
            response.status_code,
            response.duration,
        )
        .with_correlation_id(conversation_id)),
        Err(e) => Err((e, conversation_id)),
    }
}
