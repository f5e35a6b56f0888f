//! Domain error taxonomy.
//!
//! Variants map one-to-one onto the failure classes the service and HTTP
//! layers distinguish. A `Validation` failure is decided before any
//! collaborator is called, so it carries the guarantee that no storage or
//! network side effect happened.

use thiserror::Error;

pub type DomainResult<T> = Result<T, DomainError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Malformed input, caught before any IO is issued.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The command is well-formed but not allowed in the current state
    /// (wrong wizard step, completed session, session id mismatch).
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    /// An identifier failed to parse.
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    #[error("not found")]
    NotFound,

    /// Stale version or an attempt to rebind state that is already bound.
    #[error("conflict: {0}")]
    Conflict(String),

    #[error("unauthorized")]
    Unauthorized,
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn not_found() -> Self {
        Self::NotFound
    }
}
