//! Error types for the sync client.

use thiserror::Error;

/// Client-specific errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// Transport could not be established
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Server frame that is not a known event
    #[error("Failed to decode server event: {0}")]
    Decode(String),

    /// Server sent a visual state that cannot be represented locally
    #[error("Invalid visual state: {0}")]
    InvalidState(String),
}
