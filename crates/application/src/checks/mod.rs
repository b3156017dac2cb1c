//! Built-in conformance checks.
//!
//! Every check is registered through an explicit call at startup; there is
//! no implicit load-order registration. Each check shares the same
//! machinery: resolve the declared ingress, capture one probe, feed the
//! observed metadata into an assertion set.

use std::sync::Arc;

mod default_backend;
mod host_rules;
mod path_rules;

pub use default_backend::DefaultBackend;
pub use host_rules::HostRules;
pub use path_rules::PathRules;

use crate::registry::{CheckRegistry, RegistryError};

/// Registers every built-in check, in report order.
///
/// # Errors
///
/// Returns [`RegistryError`] if the registry already holds one of the names;
/// callers treat that as fatal before any check runs.
pub fn register_builtin(registry: &mut CheckRegistry) -> Result<(), RegistryError> {
    registry.register(Arc::new(HostRules))?;
    registry.register(Arc::new(PathRules))?;
    registry.register(Arc::new(DefaultBackend))?;
    Ok(())
}
