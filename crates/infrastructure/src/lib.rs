//! Turnstile Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports defined in the
//! application layer, plus the reference echo backend that implements the
//! capture payload contract.

pub mod adapters;
pub mod echo;

pub use adapters::{ReqwestProbe, StaticIngressResolver};
pub use echo::EchoBackend;
