//! Default-backend routing check.

use async_trait::async_trait;
use turnstile_domain::AssertionSet;

use crate::context::CheckContext;
use crate::registry::{Check, CheckError};

/// A request matching no declared rule should reach the default backend with
/// the original request intact.
pub struct DefaultBackend;

#[async_trait]
impl Check for DefaultBackend {
    fn name(&self) -> &str {
        "default-backend"
    }

    fn description(&self) -> &str {
        "Ingress with no matching rule should send traffic to the default backend service"
    }

    async fn run(&self, cx: &CheckContext) -> Result<AssertionSet, CheckError> {
        let host = cx.resolve_ingress_host("default-backend").await?;
        let (req, res) = cx
            .capture_request(self.name(), &format!("http://{host}"), "unmatched.example.com")
            .await?;

        let mut a = AssertionSet::new();
        a.equals(req.host.as_str(), "unmatched.example.com", "the request host")
            .equals(req.method.as_str(), "GET", "the originating request method")
            .equals(req.proto.as_str(), "HTTP/1.1", "the originating request protocol");
        a.equals(res.status_code, 200, "the response status code");

        Ok(a)
    }
}
