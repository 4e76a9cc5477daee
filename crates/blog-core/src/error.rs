//! Domain-level error types.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

use crate::domain::PostState;

/// Domain errors - business rule failures.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invalid state transition: {from} -> {to}")]
    InvalidTransition { from: PostState, to: PostState },

    #[error("Validation failed: {0}")]
    Validation(String),
}

/// Transport-agnostic classification of a repository failure.
///
/// Callers map `NotFound` to a 404, `InvalidInput` to a 400 and everything
/// else to a 500.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    InvalidInput,
    ConnectionFailure,
    Timeout,
    DecodeFailure,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::NotFound => "not_found",
            ErrorKind::InvalidInput => "invalid_input",
            ErrorKind::ConnectionFailure => "connection_failure",
            ErrorKind::Timeout => "timeout",
            ErrorKind::DecodeFailure => "decode_failure",
        };
        f.write_str(name)
    }
}

/// Repository-level errors.
///
/// Every backend converts its native error type into one of these before
/// returning from a `PostRepository` call.
#[derive(Debug, Clone, Error)]
pub enum RepoError {
    #[error("Post not found: {id}")]
    NotFound { id: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The store could not be reached, or rejected the call.
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Operation timed out after {duration_ms}ms")]
    Timeout { duration_ms: u64 },

    #[error("Stored data could not be decoded: {0}")]
    Decode(String),
}

impl RepoError {
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    pub fn timeout(limit: Duration) -> Self {
        Self::Timeout {
            duration_ms: u64::try_from(limit.as_millis()).unwrap_or(u64::MAX),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode(message.into())
    }

    /// The error kind exposed to callers.
    pub fn kind(&self) -> ErrorKind {
        match self {
            RepoError::NotFound { .. } => ErrorKind::NotFound,
            RepoError::InvalidInput(_) => ErrorKind::InvalidInput,
            RepoError::Connection(_) => ErrorKind::ConnectionFailure,
            RepoError::Timeout { .. } => ErrorKind::Timeout,
            RepoError::Decode(_) => ErrorKind::DecodeFailure,
        }
    }
}
