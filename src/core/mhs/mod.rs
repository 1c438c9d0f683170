//! MHS Probe Module
//!
//! Probes an external Message Handling Service deployment with:
//! - Inbound health check (`GET <inbound>/healthcheck`)
//! - Outbound PDS retrieval send (`QUPA_IN000008UK02` in a JSON envelope)
//! - Sequential runner folding failures into a single report

pub mod client;
pub mod debug_logger;
pub mod health;
pub mod message;
pub mod outbound;
pub mod report_renderer;
pub mod runner;
pub mod types;
pub mod url;

// Re-export public API
pub use client::{ClockTrait, IsahcMhsClient, MhsHttpClient, MhsRequest, MhsResponse, ProbeMethod, SystemClock};
pub use debug_logger::{get_debug_logger, EnhancedDebugLogger};
pub use health::check_inbound_health;
pub use message::PdsRetrievalMessage;
pub use outbound::{new_conversation_id, send_pds_retrieval, OutboundEnvelope};
pub use report_renderer::ReportRenderer;
pub use runner::ProbeRunner;
pub use types::*;
