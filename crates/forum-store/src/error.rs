//! Error types for the storage layer.

use forum_core::MessageId;
use thiserror::Error;

/// Result type alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Message not found.
    #[error("message not found: {0}")]
    MessageNotFound(MessageId),

    /// User not found.
    #[error("user not found: {0}")]
    UserNotFound(String),

    /// Nickname already taken. Raised by the atomic check-and-create.
    #[error("duplicate nickname: {0}")]
    DuplicateNickname(String),

    /// Profile document rejected by domain validation.
    #[error("invalid profile: {0}")]
    InvalidProfile(String),

    /// Write rejected by the backend for a reason other than the above.
    #[error("storage backend failure: {0}")]
    Backend(String),
}
