//! Record codec error types
//!
//! Error codes:
//! - CNS_RECORD_MALFORMED (WARN severity)
//! - CNS_RECORD_MISSING_FIELD (WARN severity)
//! - CNS_RECORD_NO_VALID_DECISIONS (WARN severity)
//! - CNS_RECORD_ENCODE_FAILED (ERROR severity)
//!
//! A decode failure is never fatal: the caller treats it exactly like
//! "no record found" and rebuilds from defaults.

use thiserror::Error;

/// Result type for codec operations
pub type CodecResult<T> = Result<T, CodecError>;

/// Structural validation errors for persisted consent records
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// Payload is not well-formed JSON or not an object
    #[error("Malformed consent payload: {0}")]
    Malformed(String),

    /// A required top-level field is absent or of the wrong shape
    #[error("Missing or invalid field: {0}")]
    MissingField(&'static str),

    /// Every decision entry was structurally invalid
    #[error("No valid decisions in stored record")]
    NoValidDecisions,

    /// Record could not be serialized
    #[error("Failed to encode consent record: {0}")]
    EncodeFailed(String),
}

impl CodecError {
    /// Returns the stable string code for this error
    pub fn code(&self) -> &'static str {
        match self {
            CodecError::Malformed(_) => "CNS_RECORD_MALFORMED",
            CodecError::MissingField(_) => "CNS_RECORD_MISSING_FIELD",
            CodecError::NoValidDecisions => "CNS_RECORD_NO_VALID_DECISIONS",
            CodecError::EncodeFailed(_) => "CNS_RECORD_ENCODE_FAILED",
        }
    }
}
