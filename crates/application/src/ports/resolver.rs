//! Ingress host resolution port.

use async_trait::async_trait;
use thiserror::Error;

/// Errors an [`IngressResolver`] implementation can surface.
///
/// Any of these makes the invoking check an infrastructure **error**, never
/// an assertion failure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// The ingress resource does not exist.
    #[error("ingress {namespace}/{name} not found")]
    NotFound {
        /// Namespace that was searched.
        namespace: String,
        /// Name of the missing ingress.
        name: String,
    },

    /// The ingress exists but has no externally reachable address yet.
    #[error("ingress {namespace}/{name} has no assigned address yet")]
    NoAddress {
        /// Namespace of the ingress.
        namespace: String,
        /// Name of the ingress.
        name: String,
    },

    /// The lookup did not complete in time.
    #[error("resolving ingress {namespace}/{name} timed out")]
    Timeout {
        /// Namespace of the ingress.
        namespace: String,
        /// Name of the ingress.
        name: String,
    },

    /// The lookup backend itself failed.
    #[error("ingress lookup failed: {0}")]
    Backend(String),
}

/// Port mapping a declared ingress resource to its externally reachable
/// host name.
#[async_trait]
pub trait IngressResolver: Send + Sync {
    /// Resolves the external host for `namespace`/`ingress_name`.
    async fn resolve(&self, namespace: &str, ingress_name: &str) -> Result<String, ResolveError>;
}
