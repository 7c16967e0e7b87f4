//! Domain-level error types.

use thiserror::Error;

/// Invariant violations raised by domain constructors and the hub aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("{0} must not be empty")]
    EmptyIdentifier(&'static str),

    #[error("field '{0}' must not be empty")]
    EmptyField(&'static str),

    #[error("session '{0}' is already connected")]
    DuplicateSession(String),

    #[error("session '{0}' is not connected")]
    SessionNotFound(String),

    #[error("DJ set must not end before it starts")]
    InvalidSetWindow,
}

/// Errors surfaced by repository implementations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("user '{0}' not found")]
    UserNotFound(String),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Errors surfaced by message pusher implementations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    #[error("session '{0}' is not registered")]
    ClientNotFound(String),

    #[error("push failed: {0}")]
    PushFailed(String),

    #[error("failed to encode event: {0}")]
    EncodeFailed(String),
}
