//! Host-rule routing check.

use async_trait::async_trait;
use turnstile_domain::AssertionSet;

use crate::context::CheckContext;
use crate::registry::{Check, CheckError};

/// Response headers a conforming proxy may relay for this scenario.
const ALLOWED_RESPONSE_HEADERS: &[&str] = &["Content-Length", "Content-Type", "Date", "Server"];

/// An ingress with a host rule should send traffic to the correct backend
/// service, preserving the request and relaying the response unmodified
/// except for a restricted header set.
pub struct HostRules;

#[async_trait]
impl Check for HostRules {
    fn name(&self) -> &str {
        "host-rules"
    }

    fn description(&self) -> &str {
        "Ingress with host rule should send traffic to the correct backend service"
    }

    async fn run(&self, cx: &CheckContext) -> Result<AssertionSet, CheckError> {
        let host = cx.resolve_ingress_host("host-rules").await?;
        let (req, res) = cx
            .capture_request(self.name(), &format!("http://{host}"), "foo.bar.com")
            .await?;

        let mut a = AssertionSet::new();
        // The request as received by the backend service.
        a.equals(req.host.as_str(), "foo.bar.com", "the request host")
            .equals(req.method.as_str(), "GET", "the originating request method")
            .equals(req.proto.as_str(), "HTTP/1.1", "the originating request protocol")
            .contains_keys(&req.headers, &["User-Agent"], "the request headers");
        // The response as received by the client.
        a.equals(res.status_code, 200, "the response status code")
            .equals(res.proto.as_str(), "HTTP/1.1", "the response protocol")
            .contains_only_keys(&res.headers, ALLOWED_RESPONSE_HEADERS, "the response headers");

        Ok(a)
    }
}
