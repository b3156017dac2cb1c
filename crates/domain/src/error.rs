//! Domain error types

use thiserror::Error;

/// Domain-level errors that can occur during validation or parsing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The output mode string is not recognized.
    #[error("unsupported output mode: {0}")]
    UnsupportedOutputMode(String),

    /// A header name is empty or not a valid HTTP token.
    #[error("invalid header name: {0:?}")]
    InvalidHeaderName(String),
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
