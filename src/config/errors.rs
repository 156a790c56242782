//! Configuration error types
//!
//! Error codes:
//! - CNS_CONFIG_EMPTY_CATEGORIES (ERROR severity)
//! - CNS_CONFIG_DUPLICATE_CATEGORY (ERROR severity)
//!
//! Configuration errors are surfaced through the host `on_error` callback and
//! never abort initialization; the controller falls back to the deduplicated
//! (possibly empty) category list.

use thiserror::Error;

/// Result type for configuration validation
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The configured category list is empty
    #[error("Category list is empty")]
    EmptyCategories,

    /// Two categories share the same id
    #[error("Duplicate category id: {0}")]
    DuplicateCategoryId(String),
}

impl ConfigError {
    /// Returns the stable string code for this error
    pub fn code(&self) -> &'static str {
        match self {
            ConfigError::EmptyCategories => "CNS_CONFIG_EMPTY_CATEGORIES",
            ConfigError::DuplicateCategoryId(_) => "CNS_CONFIG_DUPLICATE_CATEGORY",
        }
    }
}
