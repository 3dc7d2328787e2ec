//! Error taxonomy for the client core.
//!
//! Every failure surfaces to the caller as a typed variant; the core performs
//! no retries and no silent recovery. Precondition and ordering failures in
//! particular must stay observable, since callers build optimistic-concurrency
//! loops and paging logic on top of them.

use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// Malformed request, caught before any store call is made.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Illegal metadata mutation, e.g. removing the content type.
    #[error("invalid update: {0}")]
    InvalidUpdate(String),

    /// A conditional write whose generation precondition did not hold.
    #[error("precondition failed: {0}")]
    PreconditionFailed(String),

    /// The store returned a listing page that violates the ordering contract.
    #[error("corrupt listing: {0}")]
    CorruptListing(String),

    #[error("object `{name}` not found in bucket `{bucket}`")]
    NotFound { bucket: String, name: String },

    /// The caller's cancellation signal fired while the call was in flight.
    #[error("call cancelled")]
    Cancelled,

    /// The caller's deadline passed while the call was in flight.
    #[error("deadline exceeded")]
    DeadlineExceeded,

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Network or backend failure; safe for the caller to retry.
    #[error("transient store failure: {0}")]
    Transient(String),

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl StoreError {
    /// Whether the caller may retry the same request unchanged.
    pub fn is_retryable(&self) -> bool {
        matches!(self, StoreError::Transient(_))
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_transient_failures_are_retryable() {
        assert!(StoreError::Transient("connection reset".into()).is_retryable());
        assert!(!StoreError::Cancelled.is_retryable());
        assert!(!StoreError::PreconditionFailed("stale generation".into()).is_retryable());
        assert!(!StoreError::InvalidArgument("bad name".into()).is_retryable());
        assert!(!StoreError::Unauthorized("expired credentials".into()).is_retryable());
    }
}
