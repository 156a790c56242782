//! Filesystem-backed consent store
//!
//! One JSON document per storage key, written under a root directory. The
//! stand-in for browser local storage when the host is a native process, and
//! the store the CLI harness operates on.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::observability::{Event, Logger};
use crate::record::{decode, encode, ConsentRecord};

use super::adapter::ConsentStore;
use super::errors::{StorageError, StorageResult};

/// Filesystem store, one `<key>.json` file per storage key
#[derive(Debug)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Create a store rooted at the given directory. The directory is
    /// created on first save.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Open a store, verifying the root directory can be created up front.
    ///
    /// # Errors
    ///
    /// `StorageError::Unavailable` when the root cannot be created.
    pub fn open(root: impl Into<PathBuf>) -> StorageResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|e| StorageError::Unavailable(e.to_string()))?;
        Ok(Self { root })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        // Storage keys become file names; path separators are not allowed.
        let sanitized: String = key
            .chars()
            .map(|c| if c == '/' || c == '\\' { '_' } else { c })
            .collect();
        self.root.join(format!("{}.json", sanitized))
    }

    /// The root directory of this store
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ConsentStore for FileStore {
    fn save(&mut self, key: &str, record: &ConsentRecord) -> StorageResult<()> {
        let encoded = encode(record).map_err(|e| StorageError::EncodeFailed(e.to_string()))?;

        fs::create_dir_all(&self.root).map_err(|e| StorageError::Unavailable(e.to_string()))?;
        fs::write(self.path_for(key), encoded).map_err(|e| StorageError::Io(e.to_string()))
    }

    fn load(&mut self, key: &str) -> StorageResult<Option<ConsentRecord>> {
        let raw = match fs::read_to_string(self.path_for(key)) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StorageError::Io(e.to_string())),
        };

        match decode(&raw) {
            Ok(decoded) => {
                if decoded.dropped_decisions > 0 {
                    Logger::warn(
                        Event::RecordInvalid,
                        &[
                            ("dropped_decisions", &decoded.dropped_decisions.to_string()),
                            ("key", key),
                        ],
                    );
                }
                Ok(Some(decoded.record))
            }
            // Invalid stored data is indistinguishable from no data.
            Err(e) => {
                Logger::warn(Event::RecordInvalid, &[("code", e.code()), ("key", key)]);
                Ok(None)
            }
        }
    }

    fn clear(&mut self, key: &str) -> StorageResult<()> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::Io(e.to_string())),
        }
    }
}
