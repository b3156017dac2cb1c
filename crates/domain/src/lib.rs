//! Turnstile Domain - Core conformance types
//!
//! This crate defines the domain model for the Turnstile ingress
//! conformance harness. All types here are pure Rust with no I/O
//! dependencies.

pub mod assertion;
pub mod capture;
pub mod check;
pub mod config;
pub mod error;
pub mod headers;

pub use assertion::AssertionSet;
pub use capture::{CapturedRequest, CapturedResponse, TestId, TEST_ID_HEADER};
pub use check::{CheckOutcome, CheckResult, RunReport};
pub use config::{OutputMode, RunConfig};
pub use error::{DomainError, DomainResult};
pub use headers::HeaderMap;
