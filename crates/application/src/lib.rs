//! Turnstile Application - Check execution engine
//!
//! This crate hosts the machinery every conformance check shares: the
//! append-only check registry, the request-capture protocol with TestId
//! correlation, and the runner that turns assertion sets into per-check
//! results. It talks to the outside world only through the ports in
//! [`ports`], implemented by adapters in the infrastructure layer.

pub mod cancel;
pub mod capture;
pub mod checks;
pub mod context;
pub mod ports;
pub mod registry;
pub mod runner;

pub use cancel::CancellationToken;
pub use capture::{CaptureError, CaptureProtocol};
pub use context::CheckContext;
pub use registry::{Check, CheckError, CheckRegistry, RegistryError};
pub use runner::CheckRunner;
