//! Runtime configuration shared by every check invocation.

use std::str::FromStr;
use std::time::Duration;

use crate::error::{DomainError, DomainResult};

/// How the run report is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Human-readable text, one block per check.
    #[default]
    Text,
    /// The full report as a JSON document.
    Json,
}

impl FromStr for OutputMode {
    type Err = DomainError;

    fn from_str(s: &str) -> DomainResult<Self> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(DomainError::UnsupportedOutputMode(other.to_string())),
        }
    }
}

/// Read-only bag of runtime parameters, constructed once per run and shared
/// by all checks. Never mutated after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// Namespace the declared ingress resources live in.
    pub namespace: String,
    /// Timeout applied to each probe request.
    pub request_timeout: Duration,
    /// Additional attempts the runner may make after an infrastructure
    /// error. Zero disables retries.
    pub retry_attempts: u32,
    /// Report rendering mode.
    pub output: OutputMode,
}

impl RunConfig {
    /// Creates a configuration for the given namespace with defaults for
    /// everything else.
    #[must_use]
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            ..Self::default()
        }
    }

    /// Sets the per-probe timeout.
    #[must_use]
    pub const fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Sets the number of retry attempts for errored checks.
    #[must_use]
    pub const fn with_retry_attempts(mut self, attempts: u32) -> Self {
        self.retry_attempts = attempts;
        self
    }

    /// Sets the report rendering mode.
    #[must_use]
    pub const fn with_output(mut self, output: OutputMode) -> Self {
        self.output = output;
        self
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            namespace: "default".to_string(),
            request_timeout: Duration::from_secs(5),
            retry_attempts: 0,
            output: OutputMode::Text,
        }
    }
}
