//! Per-run context handed to every check invocation.

use std::sync::Arc;

use turnstile_domain::{CapturedRequest, CapturedResponse, RunConfig};

use crate::cancel::CancellationToken;
use crate::capture::{CaptureError, CaptureProtocol};
use crate::ports::{HttpProbe, IngressResolver, ResolveError};

/// Everything a check needs at run time: the read-only configuration, the
/// resolver and capture collaborators, and the run-level cancellation token.
///
/// One context is built per run and shared by reference across all checks;
/// nothing in it is mutated during execution.
pub struct CheckContext {
    config: RunConfig,
    resolver: Arc<dyn IngressResolver>,
    capture: CaptureProtocol,
    cancel: CancellationToken,
}

impl CheckContext {
    /// Wires a context from the configuration and the two ports.
    #[must_use]
    pub fn new(
        config: RunConfig,
        resolver: Arc<dyn IngressResolver>,
        probe: Arc<dyn HttpProbe>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            config,
            resolver,
            capture: CaptureProtocol::new(probe),
            cancel,
        }
    }

    /// The run configuration.
    #[must_use]
    pub const fn config(&self) -> &RunConfig {
        &self.config
    }

    /// The run-level cancellation token.
    #[must_use]
    pub const fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Resolves the external host of an ingress declared in the configured
    /// namespace.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError`] when the ingress is absent, not yet
    /// addressable, or the lookup times out.
    pub async fn resolve_ingress_host(&self, ingress_name: &str) -> Result<String, ResolveError> {
        self.resolver
            .resolve(&self.config.namespace, ingress_name)
            .await
    }

    /// Captures one probe through the proxy using the configured timeout.
    ///
    /// # Errors
    ///
    /// Returns [`CaptureError`] on connection failure, timeout, a malformed
    /// echo payload, or TestId mismatch.
    pub async fn capture_request(
        &self,
        check_name: &str,
        target_url: &str,
        host_header: &str,
    ) -> Result<(CapturedRequest, CapturedResponse), CaptureError> {
        self.capture
            .capture(check_name, target_url, host_header, self.config.request_timeout)
            .await
    }
}
