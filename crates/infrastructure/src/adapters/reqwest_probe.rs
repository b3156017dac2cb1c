//! HTTP probe implementation using reqwest.
//!
//! This adapter implements the `HttpProbe` port. Redirects are never
//! followed: the proxy's behavior is exactly the thing under observation.

use async_trait::async_trait;
use reqwest::{Client, Url, header};
use turnstile_application::ports::{HttpProbe, ProbeError, ProbeRequest, ProbeResponse};
use turnstile_domain::{HeaderMap, TEST_ID_HEADER};

/// Probe adapter wrapping `reqwest::Client`.
pub struct ReqwestProbe {
    client: Client,
}

impl ReqwestProbe {
    /// Creates a probe client with harness defaults: fixed User-Agent, no
    /// redirect following. The per-request timeout comes from each
    /// [`ProbeRequest`].
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying client cannot be created.
    pub fn new() -> Result<Self, ProbeError> {
        let client = Client::builder()
            .user_agent(concat!("Turnstile/", env!("CARGO_PKG_VERSION")))
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| ProbeError::Other(e.to_string()))?;

        Ok(Self { client })
    }

    /// Creates a probe adapter over a custom reqwest client.
    #[must_use]
    pub const fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Maps reqwest errors to port `ProbeError`s.
    fn map_error(error: &reqwest::Error, timeout_ms: u64, url: &str) -> ProbeError {
        if error.is_timeout() {
            return ProbeError::Timeout { timeout_ms };
        }
        if error.is_connect() {
            return ProbeError::ConnectionFailed {
                url: url.to_string(),
                message: error.to_string(),
            };
        }
        ProbeError::Other(error.to_string())
    }
}

#[async_trait]
impl HttpProbe for ReqwestProbe {
    async fn send(&self, request: &ProbeRequest) -> Result<ProbeResponse, ProbeError> {
        let url = Url::parse(&request.target_url).map_err(|e| ProbeError::InvalidUrl {
            url: request.target_url.clone(),
            message: e.to_string(),
        })?;
        let timeout_ms = request.timeout.as_millis() as u64;

        let response = self
            .client
            .get(url)
            .header(header::HOST, &request.host_header)
            .header(TEST_ID_HEADER, &request.test_id)
            .timeout(request.timeout)
            .send()
            .await
            .map_err(|e| Self::map_error(&e, timeout_ms, &request.target_url))?;

        let status = response.status().as_u16();
        let proto = format!("{:?}", response.version());

        let mut headers = HeaderMap::new();
        for (name, value) in response.headers() {
            headers.append(name.as_str(), value.to_str().unwrap_or("<binary>"));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| ProbeError::Body(e.to_string()))?
            .to_vec();

        Ok(ProbeResponse {
            status,
            proto,
            headers,
            body,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_client_creation() {
        assert!(ReqwestProbe::new().is_ok());
    }

    #[tokio::test]
    async fn test_invalid_url_is_rejected_before_sending() {
        let probe = ReqwestProbe::new().unwrap();
        let request = ProbeRequest {
            target_url: "not a url".to_string(),
            host_header: "foo.bar.com".to_string(),
            test_id: "t-1".to_string(),
            timeout: Duration::from_millis(100),
        };

        let err = probe.send(&request).await.unwrap_err();
        assert!(matches!(err, ProbeError::InvalidUrl { .. }));
    }
}
