//! Captured request/response snapshots and the echo wire contract.
//!
//! A backend under test answers every probe with a JSON body describing the
//! request it actually received. The field names below (PascalCase on the
//! wire) are a fixed contract that all backends must implement:
//!
//! ```json
//! {
//!   "TestId": "host-rules-0192...",
//!   "Path": "/",
//!   "Host": "foo.bar.com",
//!   "Method": "GET",
//!   "Proto": "HTTP/1.1",
//!   "Headers": {"User-Agent": ["Turnstile/0.1.0"]}
//! }
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::headers::HeaderMap;

/// Request header carrying the correlation token to the backend.
pub const TEST_ID_HEADER: &str = "X-Conformance-Test-Id";

/// A correlation token matching an outbound probe with the backend's echoed
/// record of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestId(String);

impl TestId {
    /// Generates a fresh token, prefixed with the issuing check's name so
    /// probe logs stay attributable.
    #[must_use]
    pub fn generate(prefix: &str) -> Self {
        Self(format!("{prefix}-{}", Uuid::now_v7()))
    }

    /// The token as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A snapshot of the request as the backend observed it, decoded from the
/// echo payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CapturedRequest {
    /// The correlation token the backend read from [`TEST_ID_HEADER`].
    pub test_id: String,
    /// Host the backend saw, after any rewriting by the proxy.
    pub host: String,
    /// Request method as received.
    pub method: String,
    /// HTTP version string, e.g. `HTTP/1.1`.
    pub proto: String,
    /// Request path as received. Optional extension of the base contract.
    #[serde(default)]
    pub path: String,
    /// Request headers as received, case-insensitive.
    pub headers: HeaderMap,
}

/// A snapshot of the response as the probing client observed it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CapturedResponse {
    /// HTTP status code.
    pub status_code: u16,
    /// HTTP version string of the response.
    pub proto: String,
    /// Response headers, case-insensitive.
    pub headers: HeaderMap,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_generated_ids_are_unique_and_prefixed() {
        let a = TestId::generate("host-rules");
        let b = TestId::generate("host-rules");

        assert!(a.as_str().starts_with("host-rules-"));
        assert_ne!(a, b);
    }

    #[test]
    fn test_decode_echo_payload() {
        let payload = r#"{
            "TestId": "host-rules",
            "Host": "foo.bar.com",
            "Method": "GET",
            "Proto": "HTTP/1.1",
            "Headers": {"User-Agent": ["Turnstile/0.1.0"]}
        }"#;

        let req: CapturedRequest = serde_json::from_str(payload).unwrap();
        assert_eq!(req.test_id, "host-rules");
        assert_eq!(req.host, "foo.bar.com");
        assert_eq!(req.method, "GET");
        assert_eq!(req.proto, "HTTP/1.1");
        assert_eq!(req.path, "");
        assert_eq!(req.headers.get("user-agent"), Some("Turnstile/0.1.0"));
    }

    #[test]
    fn test_decode_payload_with_path() {
        let payload = r#"{
            "TestId": "path-rules",
            "Path": "/foo",
            "Host": "path-rules.example.com",
            "Method": "GET",
            "Proto": "HTTP/1.1",
            "Headers": {}
        }"#;

        let req: CapturedRequest = serde_json::from_str(payload).unwrap();
        assert_eq!(req.path, "/foo");
    }

    #[test]
    fn test_decode_rejects_missing_fields() {
        let payload = r#"{"TestId": "x", "Host": "h"}"#;
        assert!(serde_json::from_str::<CapturedRequest>(payload).is_err());
    }

    #[test]
    fn test_request_serializes_with_wire_names() {
        let req = CapturedRequest {
            test_id: "abc".to_string(),
            host: "example.com".to_string(),
            method: "GET".to_string(),
            proto: "HTTP/1.1".to_string(),
            path: "/".to_string(),
            headers: HeaderMap::new(),
        };

        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["TestId"], "abc");
        assert_eq!(json["Host"], "example.com");
        assert_eq!(json["Proto"], "HTTP/1.1");
    }
}
