//! The check trait and the append-only check registry.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use turnstile_domain::AssertionSet;

use crate::capture::CaptureError;
use crate::context::CheckContext;
use crate::ports::ResolveError;

/// Infrastructure failure inside a check, before or during capture.
///
/// Distinct from assertion violations: a `CheckError` means the harness
/// could not probe, not that the proxy misbehaved.
#[derive(Debug, Error)]
pub enum CheckError {
    /// Host resolution failed.
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// The capture protocol failed.
    #[error(transparent)]
    Capture(#[from] CaptureError),
}

/// One named, independent conformance test unit.
///
/// Implementations resolve their target host, capture a probe, and return
/// the assertion set they filled in. An empty set means success; a non-empty
/// set becomes a Failure; an `Err` becomes an Error result.
#[async_trait]
pub trait Check: Send + Sync {
    /// Unique, stable name used in reports and CLI filters.
    fn name(&self) -> &str;

    /// Human-readable description of the behavior under test.
    fn description(&self) -> &str;

    /// Executes the check against the given context.
    async fn run(&self, cx: &CheckContext) -> Result<AssertionSet, CheckError>;
}

/// Errors raised while populating the registry. Startup-fatal: a run never
/// begins with a corrupted registry.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// A check with the same name was already registered.
    #[error("a check named '{0}' is already registered")]
    Duplicate(String),

    /// The check name is empty.
    #[error("check name must not be empty")]
    EmptyName,
}

/// Append-only collection of checks, initialized once before any check runs.
///
/// Registration order is preserved and defines report order. There is no
/// removal operation.
#[derive(Default)]
pub struct CheckRegistry {
    checks: Vec<Arc<dyn Check>>,
}

impl CheckRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub const fn new() -> Self {
        Self { checks: Vec::new() }
    }

    /// Registers a check under its name.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Duplicate`] if a check with the same name is
    /// already present, [`RegistryError::EmptyName`] if the name is empty.
    pub fn register(&mut self, check: Arc<dyn Check>) -> Result<(), RegistryError> {
        if check.name().is_empty() {
            return Err(RegistryError::EmptyName);
        }
        if self.get(check.name()).is_some() {
            return Err(RegistryError::Duplicate(check.name().to_string()));
        }
        self.checks.push(check);
        Ok(())
    }

    /// All registered checks, in registration order.
    #[must_use]
    pub fn all(&self) -> &[Arc<dyn Check>] {
        &self.checks
    }

    /// Looks a check up by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Check>> {
        self.checks.iter().find(|c| c.name() == name)
    }

    /// Names of all registered checks, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.checks.iter().map(|c| c.name())
    }

    /// Number of registered checks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.checks.len()
    }

    /// Returns true if no checks are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }
}

impl fmt::Debug for CheckRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
