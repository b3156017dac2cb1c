//! Path-rule routing check.

use async_trait::async_trait;
use turnstile_domain::AssertionSet;

use crate::context::CheckContext;
use crate::registry::{Check, CheckError};

/// An ingress with a path rule should route a matching path to the correct
/// backend service with the path preserved.
pub struct PathRules;

#[async_trait]
impl Check for PathRules {
    fn name(&self) -> &str {
        "path-rules"
    }

    fn description(&self) -> &str {
        "Ingress with path rule should send traffic for a matching path to the correct backend service"
    }

    async fn run(&self, cx: &CheckContext) -> Result<AssertionSet, CheckError> {
        let host = cx.resolve_ingress_host("path-rules").await?;
        let (req, res) = cx
            .capture_request(self.name(), &format!("http://{host}/foo"), "path-rules.example.com")
            .await?;

        let mut a = AssertionSet::new();
        a.equals(req.path.as_str(), "/foo", "the request path")
            .equals(req.host.as_str(), "path-rules.example.com", "the request host")
            .equals(req.method.as_str(), "GET", "the originating request method")
            .contains_keys(&req.headers, &["User-Agent"], "the request headers");
        a.equals(res.status_code, 200, "the response status code");

        Ok(a)
    }
}
