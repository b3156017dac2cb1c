//! Outbound HTTP probe port.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use turnstile_domain::HeaderMap;

/// One outbound probe to the proxy under test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeRequest {
    /// Absolute URL of the proxy's external endpoint.
    pub target_url: String,
    /// Value the `Host` header is forced to, exercising the routing rule.
    pub host_header: String,
    /// Correlation token, sent in
    /// [`turnstile_domain::TEST_ID_HEADER`].
    pub test_id: String,
    /// Bound on the whole request, connect included.
    pub timeout: Duration,
}

/// The raw response exactly as the probing client observed it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResponse {
    /// HTTP status code.
    pub status: u16,
    /// HTTP version string of the response, e.g. `HTTP/1.1`.
    pub proto: String,
    /// Response headers.
    pub headers: HeaderMap,
    /// Raw response body.
    pub body: Vec<u8>,
}

/// Errors an [`HttpProbe`] implementation can surface.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProbeError {
    /// The target URL could not be parsed.
    #[error("invalid probe URL '{url}': {message}")]
    InvalidUrl {
        /// The offending URL.
        url: String,
        /// Parser diagnostic.
        message: String,
    },

    /// The connection could not be established.
    #[error("connection to '{url}' failed: {message}")]
    ConnectionFailed {
        /// The probed URL.
        url: String,
        /// Transport diagnostic.
        message: String,
    },

    /// The configured timeout elapsed before a response arrived.
    #[error("probe timed out after {timeout_ms}ms")]
    Timeout {
        /// The timeout that elapsed, in milliseconds.
        timeout_ms: u64,
    },

    /// The response body could not be read.
    #[error("failed to read response body: {0}")]
    Body(String),

    /// Any other transport failure.
    #[error("probe failed: {0}")]
    Other(String),
}

/// Port for sending a single probe request.
///
/// Implementations must honor `request.timeout`, must not follow redirects
/// (the proxy's behavior is the thing under observation), and must not
/// retry. Retry policy belongs to the runner.
#[async_trait]
pub trait HttpProbe: Send + Sync {
    /// Sends one request and returns the client's view of the response.
    async fn send(&self, request: &ProbeRequest) -> Result<ProbeResponse, ProbeError>;
}
