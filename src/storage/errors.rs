//! Storage error types
//!
//! Error codes:
//! - CNS_STORAGE_UNAVAILABLE (WARN severity)
//! - CNS_STORAGE_IO_ERROR (WARN severity)
//! - CNS_STORAGE_ENCODE_FAILED (ERROR severity)
//!
//! No storage error is fatal: the controller surfaces the first one through
//! `on_error` and continues in memory for the rest of the session.

use thiserror::Error;

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Persistence adapter errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    /// The persistence medium cannot be used at all
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// A single read/write/clear failed
    #[error("Storage I/O error: {0}")]
    Io(String),

    /// The record could not be serialized for persistence
    #[error("Failed to encode record for storage: {0}")]
    EncodeFailed(String),
}

impl StorageError {
    /// Returns the stable string code for this error
    pub fn code(&self) -> &'static str {
        match self {
            StorageError::Unavailable(_) => "CNS_STORAGE_UNAVAILABLE",
            StorageError::Io(_) => "CNS_STORAGE_IO_ERROR",
            StorageError::EncodeFailed(_) => "CNS_STORAGE_ENCODE_FAILED",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_are_stable() {
        assert_eq!(
            StorageError::Unavailable("down".into()).code(),
            "CNS_STORAGE_UNAVAILABLE"
        );
        assert_eq!(StorageError::Io("disk".into()).code(), "CNS_STORAGE_IO_ERROR");
        assert_eq!(
            StorageError::EncodeFailed("x".into()).code(),
            "CNS_STORAGE_ENCODE_FAILED"
        );
    }
}
