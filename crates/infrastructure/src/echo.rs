//! Reference echo backend.
//!
//! Implements the capture payload contract: every request, regardless of
//! method or path, is answered with a JSON body describing the request as
//! this backend received it, echoing the correlation token from
//! [`TEST_ID_HEADER`]. Used by the integration tests and runnable via the
//! CLI as a conforming backend to place behind an ingress.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderName, HeaderValue, Method, Uri, Version, header};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use tokio::net::{TcpListener, ToSocketAddrs};
use tokio::task::JoinHandle;
use turnstile_application::CancellationToken;
use turnstile_domain::{CapturedRequest, HeaderMap, TEST_ID_HEADER};

/// Response headers appended to every reply, used by tests to simulate a
/// proxy that invents headers.
#[derive(Debug, Clone, Default)]
struct EchoState {
    extra_headers: Arc<Vec<(String, String)>>,
}

/// Builds the echo router.
#[must_use]
pub fn router() -> Router {
    router_with_response_headers(Vec::new())
}

/// Builds an echo router that appends the given headers to every response.
#[must_use]
pub fn router_with_response_headers(extra_headers: Vec<(String, String)>) -> Router {
    Router::new().fallback(echo).with_state(EchoState {
        extra_headers: Arc::new(extra_headers),
    })
}

/// Answers any request with the echo payload for it.
async fn echo(
    State(state): State<EchoState>,
    method: Method,
    version: Version,
    uri: Uri,
    headers: axum::http::HeaderMap,
) -> Response {
    let mut observed = HeaderMap::new();
    for (name, value) in &headers {
        observed.append(name.as_str(), value.to_str().unwrap_or("<binary>"));
    }

    let payload = CapturedRequest {
        test_id: headers
            .get(TEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string(),
        host: headers
            .get(header::HOST)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string(),
        method: method.to_string(),
        proto: format!("{version:?}"),
        path: uri.path().to_string(),
        headers: observed,
    };

    let mut response = Json(payload).into_response();
    for (name, value) in state.extra_headers.iter() {
        if let (Ok(name), Ok(value)) = (
            HeaderName::try_from(name.as_str()),
            HeaderValue::try_from(value.as_str()),
        ) {
            response.headers_mut().append(name, value);
        }
    }
    response
}

/// A running echo backend on a local listener.
pub struct EchoBackend {
    addr: SocketAddr,
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl EchoBackend {
    /// Binds to `addr` (port 0 for an ephemeral port) and starts serving in
    /// a background task.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener cannot be bound.
    pub async fn bind(addr: impl ToSocketAddrs) -> std::io::Result<Self> {
        Self::bind_with_response_headers(addr, Vec::new()).await
    }

    /// Like [`bind`](Self::bind), with extra headers appended to every
    /// response.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener cannot be bound.
    pub async fn bind_with_response_headers(
        addr: impl ToSocketAddrs,
        extra_headers: Vec<(String, String)>,
    ) -> std::io::Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        let addr = listener.local_addr()?;
        let cancel = CancellationToken::new();
        let shutdown = cancel.clone();

        let handle = tokio::spawn(async move {
            let app = router_with_response_headers(extra_headers);
            let serve = axum::serve(listener, app)
                .with_graceful_shutdown(async move { shutdown.cancelled().await });
            if let Err(e) = serve.await {
                tracing::error!(error = %e, "echo backend exited");
            }
        });

        tracing::info!(%addr, "echo backend listening");
        Ok(Self {
            addr,
            cancel,
            handle,
        })
    }

    /// The bound address.
    #[must_use]
    pub const fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Base URL of the backend.
    #[must_use]
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Stops accepting connections and waits for the server task to finish.
    pub async fn shutdown(self) {
        self.cancel.cancel();
        let _ = self.handle.await;
    }
}
