//! MHS HTTP Client Implementations
//!
//! Provides the transport abstraction both probes send through: a neutral
//! request/response pair, the `MhsHttpClient` trait used for dependency
//! injection in tests, and the production isahc implementation.

use crate::config::ConfigError;
use std::time::{Duration, Instant};

use isahc::config::{Configurable, RedirectPolicy};
use isahc::{AsyncReadResponseExt, HttpClient, Request};

/// HTTP method used by a probe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeMethod {
    Get,
    Post,
}

impl ProbeMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProbeMethod::Get => "GET",
            ProbeMethod::Post => "POST",
        }
    }
}

/// Transport-neutral request built by a probe
#[derive(Debug, Clone, PartialEq)]
pub struct MhsRequest {
    pub method: ProbeMethod,
    pub url: String,
    /// Header pairs in the order they are sent
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
    /// `None` leaves the transport default in place
    pub timeout: Option<Duration>,
}

impl MhsRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: ProbeMethod::Get,
            url: url.into(),
            headers: Vec::new(),
            body: Vec::new(),
            timeout: None,
        }
    }

    pub fn post(url: impl Into<String>, body: Vec<u8>) -> Self {
        Self {
            method: ProbeMethod::Post,
            url: url.into(),
            headers: Vec::new(),
            body,
            timeout: None,
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// First header value matching `name`, compared case-insensitively
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Response data handed back to the probe for assertions
#[derive(Debug, Clone)]
pub struct MhsResponse {
    /// HTTP status code
    pub status_code: u16,
    /// Full response body
    pub body: Vec<u8>,
    /// Request duration for reporting
    pub duration: Duration,
}

impl MhsResponse {
    /// Body decoded lossily as UTF-8
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// HTTP client abstraction for dependency injection and testing
#[async_trait::async_trait]
pub trait MhsHttpClient: Send + Sync {
    /// Execute a single request and return the complete response
    ///
    /// # Returns
    /// * `Ok(MhsResponse)` - Any HTTP response, whatever its status
    /// * `Err(String)` - Request creation, network, timeout or body read failure
    ///
    /// # Implementation Requirements
    /// * Must send exactly one request (no retries)
    /// * Must follow at most `MAX_REDIRECTS` redirects and report the final response
    /// * Must honour `MhsRequest::timeout` when set
    async fn send(&self, request: MhsRequest) -> Result<MhsResponse, String>;
}

/// Redirects followed before the request fails, same as axios' default
pub const MAX_REDIRECTS: u32 = 5;

/// Production client implementation using isahc
pub struct IsahcMhsClient {
    client: HttpClient,
}

#[async_trait::async_trait]
impl MhsHttpClient for IsahcMhsClient {
    async fn send(&self, request: MhsRequest) -> Result<MhsResponse, String> {
        let start = Instant::now();

        let mut builder = Request::builder()
            .method(request.method.as_str())
            .uri(request.url.as_str())
            .header("User-Agent", concat!("mhs-probe/", env!("CARGO_PKG_VERSION")));

        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let http_request = builder
            .body(request.body)
            .map_err(|e| format!("Request creation failed: {}", e))?;

        let mut response = self
            .client
            .send_async(http_request)
            .await
            .map_err(|e| format!("Request to {} failed: {}", request.url, e))?;

        let status_code = response.status().as_u16();

        let body = response
            .bytes()
            .await
            .map_err(|e| format!("Failed to read response body: {}", e))?;

        Ok(MhsResponse {
            status_code,
            body,
            duration: start.elapsed(),
        })
    }
}

impl IsahcMhsClient {
    pub fn new() -> Result<Self, ConfigError> {
        let client = HttpClient::builder()
            .redirect_policy(RedirectPolicy::Limit(MAX_REDIRECTS))
            .build()
            .map_err(|e| ConfigError::Client(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

/// Clock abstraction for dependency injection and testing
pub trait ClockTrait: Send + Sync {
    /// Get current monotonic time
    fn now(&self) -> Instant;
    /// HL7 creation time in `yyyymmddHHMMss`, local timezone
    fn message_timestamp(&self) -> String;
}

/// Production clock implementation using system time
#[derive(Default)]
pub struct SystemClock;

impl ClockTrait for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn message_timestamp(&self) -> String {
        chrono::Local::now().format("%Y%m%d%H%M%S").to_string()
    }
}
