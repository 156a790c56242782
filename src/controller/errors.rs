//! Unified controller error type
//!
//! This is the error surface the host sees through `on_error`. Every variant
//! is recovered locally; none prevents the host from rendering.

use thiserror::Error;

use crate::config::ConfigError;
use crate::record::CodecError;
use crate::storage::StorageError;

/// Result type for controller operations
pub type ConsentResult<T> = Result<T, ConsentError>;

/// Errors surfaced to the host through `on_error`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConsentError {
    /// Persistence medium failed; session degrades to memory-only
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Stored record failed structural validation
    #[error(transparent)]
    InvalidRecord(#[from] CodecError),

    /// Host configuration rejected
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Attempt to reject a category marked required
    #[error("Category '{0}' is required and cannot be rejected")]
    RequiredCategoryPinned(String),

    /// Update against a category id that is not configured
    #[error("Unknown category id: {0}")]
    UnknownCategory(String),
}

impl ConsentError {
    /// Returns the stable string code for this error
    pub fn code(&self) -> &'static str {
        match self {
            ConsentError::Storage(e) => e.code(),
            ConsentError::InvalidRecord(e) => e.code(),
            ConsentError::Config(e) => e.code(),
            ConsentError::RequiredCategoryPinned(_) => "CNS_REQUIRED_CATEGORY_PINNED",
            ConsentError::UnknownCategory(_) => "CNS_UNKNOWN_CATEGORY",
        }
    }
}
