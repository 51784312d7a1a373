//! Error types for storage operations.

use thiserror::Error;

/// Error type for storage operations.
///
/// This enum categorizes errors that can occur during cache storage
/// interactions into distinct groups for appropriate handling.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Internal storage error, state or computation error.
    ///
    /// Any error not related to reaching the storage itself.
    #[error(transparent)]
    InternalError(Box<dyn std::error::Error + Send + Sync>),

    /// The storage could not be reached or refused the operation
    /// (quota exceeded, storage disabled, I/O failure).
    #[error(transparent)]
    ConnectionError(Box<dyn std::error::Error + Send + Sync>),
}

impl BackendError {
    /// Creates a [`BackendError::InternalError`] from a message.
    pub fn internal(message: impl Into<String>) -> Self {
        BackendError::InternalError(Box::new(std::io::Error::other(message.into())))
    }

    /// Creates a [`BackendError::ConnectionError`] from a message.
    pub fn connection(message: impl Into<String>) -> Self {
        BackendError::ConnectionError(Box::new(std::io::Error::other(message.into())))
    }
}
