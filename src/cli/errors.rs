//! CLI error types

use std::path::PathBuf;

use thiserror::Error;

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// CLI-level failures, printed to stderr by `main`
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration file could not be read
    #[error("Cannot read config {}: {reason}", path.display())]
    ConfigUnreadable { path: PathBuf, reason: String },

    /// Configuration file is not valid settings JSON
    #[error("Invalid config {}: {reason}", path.display())]
    ConfigInvalid { path: PathBuf, reason: String },

    /// Refusing to overwrite an existing file
    #[error("Refusing to overwrite existing file: {}", .0.display())]
    AlreadyExists(PathBuf),

    /// A command argument was malformed
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Filesystem failure outside the consent store
    #[error("I/O error: {0}")]
    Io(String),
}
