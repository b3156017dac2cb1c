//! Request-capture protocol.
//!
//! Sends one probe through the proxy under test and recovers both sides of
//! the exchange: what the backend observed (decoded from the echo payload)
//! and what the client observed. The generated TestId correlates the two
//! even when several probes are in flight against the same backend.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use turnstile_domain::{CapturedRequest, CapturedResponse, TestId};

use crate::ports::{HttpProbe, ProbeError, ProbeRequest};

/// Errors produced by [`CaptureProtocol::capture`].
#[derive(Debug, Error)]
pub enum CaptureError {
    /// The probe itself failed (connection, timeout, body read).
    #[error(transparent)]
    Probe(#[from] ProbeError),

    /// The response body did not decode into the echo payload contract.
    #[error("backend echo payload could not be decoded: {0}")]
    MalformedPayload(String),

    /// The backend echoed a different TestId than the one sent. Indicates
    /// crossed wires under concurrent execution or a backend bug.
    #[error("test id mismatch: sent '{sent}' but backend echoed '{received}'")]
    TestIdMismatch {
        /// The token this probe carried.
        sent: String,
        /// The token found in the echo payload.
        received: String,
    },
}

/// The capture operation shared by every check.
///
/// Performs exactly one request per call and never retries; retry policy is
/// the runner's responsibility.
pub struct CaptureProtocol {
    probe: Arc<dyn HttpProbe>,
}

impl CaptureProtocol {
    /// Creates a capture protocol over the given probe port.
    #[must_use]
    pub fn new(probe: Arc<dyn HttpProbe>) -> Self {
        Self { probe }
    }

    /// Probes `target_url` with the `Host` header forced to `host_header`
    /// and returns the correlated request/response pair.
    ///
    /// # Errors
    ///
    /// Returns [`CaptureError`] when the connection fails, the timeout
    /// elapses, the echo payload cannot be decoded, or the echoed TestId
    /// does not match the one sent.
    pub async fn capture(
        &self,
        check_name: &str,
        target_url: &str,
        host_header: &str,
        timeout: Duration,
    ) -> Result<(CapturedRequest, CapturedResponse), CaptureError> {
        let test_id = TestId::generate(check_name);
        let request = ProbeRequest {
            target_url: target_url.to_string(),
            host_header: host_header.to_string(),
            test_id: test_id.to_string(),
            timeout,
        };

        tracing::debug!(
            test_id = %test_id,
            url = target_url,
            host = host_header,
            "sending probe"
        );
        let response = self.probe.send(&request).await?;

        let captured_request: CapturedRequest = serde_json::from_slice(&response.body)
            .map_err(|e| CaptureError::MalformedPayload(e.to_string()))?;

        if captured_request.test_id != test_id.as_str() {
            return Err(CaptureError::TestIdMismatch {
                sent: test_id.to_string(),
                received: captured_request.test_id,
            });
        }

        let captured_response = CapturedResponse {
            status_code: response.status,
            proto: response.proto,
            headers: response.headers,
        };

        Ok((captured_request, captured_response))
    }
}
