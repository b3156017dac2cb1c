//! Table-driven ingress host resolution.
//!
//! The harness treats cluster state as an external collaborator; this
//! adapter is fed from CLI flags (`--host-mapping`, `--target`) instead of a
//! live lookup. A mapping resolves one `namespace/name` pair; the fallback,
//! when set, resolves everything else, which is the common case of one
//! external proxy address routing by Host header.

use std::collections::HashMap;

use async_trait::async_trait;
use turnstile_application::ports::{IngressResolver, ResolveError};

/// Resolver over a fixed `namespace/name -> host` table with an optional
/// fallback host.
#[derive(Debug, Clone, Default)]
pub struct StaticIngressResolver {
    hosts: HashMap<String, String>,
    fallback: Option<String>,
}

impl StaticIngressResolver {
    /// Creates an empty resolver; every lookup fails until mappings or a
    /// fallback are added.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a mapping for one ingress.
    #[must_use]
    pub fn with_mapping(
        mut self,
        namespace: impl AsRef<str>,
        name: impl AsRef<str>,
        host: impl Into<String>,
    ) -> Self {
        self.hosts
            .insert(Self::key(namespace.as_ref(), name.as_ref()), host.into());
        self
    }

    /// Sets the host returned for any ingress without an explicit mapping.
    #[must_use]
    pub fn with_fallback(mut self, host: impl Into<String>) -> Self {
        self.fallback = Some(host.into());
        self
    }

    fn key(namespace: &str, name: &str) -> String {
        format!("{namespace}/{name}")
    }
}

#[async_trait]
impl IngressResolver for StaticIngressResolver {
    async fn resolve(&self, namespace: &str, ingress_name: &str) -> Result<String, ResolveError> {
        self.hosts
            .get(&Self::key(namespace, ingress_name))
            .or(self.fallback.as_ref())
            .cloned()
            .ok_or_else(|| ResolveError::NotFound {
                namespace: namespace.to_string(),
                name: ingress_name.to_string(),
            })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_mapping_wins_over_fallback() {
        let resolver = StaticIngressResolver::new()
            .with_mapping("default", "host-rules", "203.0.113.10")
            .with_fallback("198.51.100.1");

        assert_eq!(
            resolver.resolve("default", "host-rules").await.unwrap(),
            "203.0.113.10"
        );
        assert_eq!(
            resolver.resolve("default", "path-rules").await.unwrap(),
            "198.51.100.1"
        );
    }

    #[tokio::test]
    async fn test_unknown_ingress_is_not_found() {
        let resolver = StaticIngressResolver::new().with_mapping("default", "host-rules", "h");

        let err = resolver.resolve("other", "host-rules").await.unwrap_err();
        assert_eq!(
            err,
            ResolveError::NotFound {
                namespace: "other".to_string(),
                name: "host-rules".to_string(),
            }
        );
    }
}
