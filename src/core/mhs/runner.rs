/*!
Probe runner executing the selected checks against one MHS environment.

Checks run one after the other and never share state. A failing check is
folded into the report as a failed outcome so the next check still runs;
nothing is retried.
*/

use super::client::{ClockTrait, MhsHttpClient, SystemClock};
use super::debug_logger::EnhancedDebugLogger;
use super::health::check_inbound_health;
use super::outbound::send_tracking_conversation;
use super::types::{CheckName, CheckOutcome, ProbeReport, ProbeSelection};
use crate::config::{Config, ConfigError, EnvironmentFixture};

pub struct ProbeRunner {
    http_client: Box<dyn MhsHttpClient>,
    clock: Box<dyn ClockTrait>,
    logger: EnhancedDebugLogger,
}

impl ProbeRunner {
    /// Runner backed by the production isahc client, logging per `MHS_PROBE_DEBUG`
    pub fn new() -> Result<Self, ConfigError> {
        let http_client = Box::new(super::client::IsahcMhsClient::new()?);
        Ok(Self::with_http_client(http_client).with_logger(super::debug_logger::get_debug_logger()))
    }

    /// Configure runner with custom HTTP client (for testing)
    ///
    /// Logging stays off until `with_logger` is called.
    pub fn with_http_client(http_client: Box<dyn MhsHttpClient>) -> Self {
        Self {
            http_client,
            clock: Box::new(SystemClock),
            logger: EnhancedDebugLogger::disabled(),
        }
    }

    /// Configure runner with custom clock (for testing)
    pub fn with_clock(mut self, clock: Box<dyn ClockTrait>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_logger(mut self, logger: EnhancedDebugLogger) -> Self {
        self.logger = logger;
        self
    }

    /// Run the selected checks in order: health first, then outbound
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` only when the configuration cannot supply what a
    /// selected check needs (e.g. no fixture for the environment). Everything
    /// is resolved before the first request, so an error means nothing was
    /// sent. Check failures are reported in the returned `ProbeReport`.
    pub async fn run(
        &self,
        config: &Config,
        selection: ProbeSelection,
    ) -> Result<ProbeReport, ConfigError> {
        let mut report = ProbeReport::new(config.nhs_environment()?);

        let inbound_url = if selection.includes_health() {
            Some(config.inbound_url()?)
        } else {
            None
        };
        let outbound = if selection.includes_outbound() {
            Some((config.outbound_url()?, config.fixture()?))
        } else {
            None
        };

        if let Some(url) = inbound_url {
            report.push(self.run_health(&url).await);
        }

        if let Some((url, fixture)) = outbound {
            report.push(self.run_outbound(&url, fixture).await);
        }

        Ok(report)
    }

    async fn run_health(&self, inbound_url: &str) -> CheckOutcome {
        let start = self.clock.now();
        match check_inbound_health(inbound_url, self.http_client.as_ref(), &self.logger).await {
            Ok(outcome) => outcome,
            Err(e) => CheckOutcome::failed(
                CheckName::InboundHealth,
                super::url::build_healthcheck_url(inbound_url),
                &e,
                start.elapsed(),
            ),
        }
    }

    async fn run_outbound(
        &self,
        outbound_url: &str,
        fixture: &EnvironmentFixture,
    ) -> CheckOutcome {
        let start = self.clock.now();
        match send_tracking_conversation(
            outbound_url,
            fixture,
            self.http_client.as_ref(),
            self.clock.as_ref(),
            &self.logger,
        )
        .await
        {
            Ok(outcome) => outcome,
            Err((e, conversation_id)) => CheckOutcome::failed(
                CheckName::OutboundPdsRetrieval,
                outbound_url.to_string(),
                &e,
                start.elapsed(),
            )
            .with_correlation_id(conversation_id),
        }
    }
}
