//! Capture protocol round trips against a live echo backend.
//!
//! These tests exercise the reqwest adapter and the reference echo backend
//! together over real sockets on ephemeral local ports.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::assert_eq;
use turnstile_application::cancel::CancellationToken;
use turnstile_application::capture::{CaptureError, CaptureProtocol};
use turnstile_application::checks::HostRules;
use turnstile_application::ports::ProbeError;
use turnstile_application::{CheckContext, CheckRunner};
use turnstile_domain::{CheckOutcome, RunConfig};
use turnstile_infrastructure::{EchoBackend, ReqwestProbe, StaticIngressResolver};

fn probe() -> Arc<ReqwestProbe> {
    Arc::new(ReqwestProbe::new().unwrap())
}

#[tokio::test]
async fn test_capture_round_trip_correlates_both_sides() {
    let backend = EchoBackend::bind("127.0.0.1:0").await.unwrap();
    let protocol = CaptureProtocol::new(probe());

    let (req, res) = protocol
        .capture("host-rules", &backend.url(), "foo.bar.com", Duration::from_secs(2))
        .await
        .unwrap();

    assert!(req.test_id.starts_with("host-rules-"));
    assert_eq!(req.host, "foo.bar.com");
    assert_eq!(req.method, "GET");
    assert_eq!(req.proto, "HTTP/1.1");
    assert_eq!(req.path, "/");
    assert!(
        req.headers
            .get("user-agent")
            .is_some_and(|ua| ua.starts_with("Turnstile/")),
        "backend must observe the harness user agent"
    );

    assert_eq!(res.status_code, 200);
    assert_eq!(res.proto, "HTTP/1.1");
    assert_eq!(res.headers.get("content-type"), Some("application/json"));

    backend.shutdown().await;
}

#[tokio::test]
async fn test_host_rules_check_passes_against_conforming_backend() {
    let backend = EchoBackend::bind("127.0.0.1:0").await.unwrap();
    let resolver = StaticIngressResolver::new().with_fallback(backend.addr().to_string());
    let context = CheckContext::new(
        RunConfig::default(),
        Arc::new(resolver),
        probe(),
        CancellationToken::new(),
    );

    let result = CheckRunner::new(context).run_check(&HostRules).await;
    assert_eq!(result.outcome, CheckOutcome::Success);

    backend.shutdown().await;
}

#[tokio::test]
async fn test_invented_response_header_fails_host_rules() {
    let backend = EchoBackend::bind_with_response_headers(
        "127.0.0.1:0",
        vec![("X-Debug".to_string(), "1".to_string())],
    )
    .await
    .unwrap();
    let resolver = StaticIngressResolver::new().with_fallback(backend.addr().to_string());
    let context = CheckContext::new(
        RunConfig::default(),
        Arc::new(resolver),
        probe(),
        CancellationToken::new(),
    );

    let result = CheckRunner::new(context).run_check(&HostRules).await;
    match result.outcome {
        CheckOutcome::Failure { violations } => {
            assert_eq!(violations.len(), 1);
            assert!(violations[0].contains("'X-Debug'"), "got: {}", violations[0]);
        }
        other => panic!("expected a failure, got {other:?}"),
    }

    backend.shutdown().await;
}

#[tokio::test]
async fn test_unresponsive_backend_times_out() {
    // Bound but never accepted: the connection sits in the backlog and no
    // response ever arrives.
    let silent = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}", silent.local_addr().unwrap());
    let protocol = CaptureProtocol::new(probe());

    let err = protocol
        .capture("host-rules", &url, "foo.bar.com", Duration::from_millis(300))
        .await
        .unwrap_err();

    match err {
        CaptureError::Probe(ProbeError::Timeout { timeout_ms }) => assert_eq!(timeout_ms, 300),
        other => panic!("expected a timeout, got {other:?}"),
    }
}

#[tokio::test]
async fn test_non_contract_body_is_a_malformed_payload() {
    use axum::Router;
    use axum::routing::get;

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    let app = Router::new().route("/", get(|| async { "hello" }));
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    let protocol = CaptureProtocol::new(probe());
    let err = protocol
        .capture("host-rules", &url, "foo.bar.com", Duration::from_secs(2))
        .await
        .unwrap_err();

    assert!(matches!(err, CaptureError::MalformedPayload(_)));
}
