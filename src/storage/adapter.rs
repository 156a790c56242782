//! Storage adapter trait and the in-memory implementation
//!
//! The trait is the seam between consent logic and the host's persistence
//! medium. Implementations must be synchronous; the controller never awaits.

use std::collections::HashMap;

use crate::record::ConsentRecord;

use super::errors::StorageResult;

/// A durable (or session-scoped) consent record store, one record per key
pub trait ConsentStore {
    /// Persist the record under `key`, replacing any previous value
    fn save(&mut self, key: &str, record: &ConsentRecord) -> StorageResult<()>;

    /// Load the record stored under `key`.
    ///
    /// A missing key and a stored payload that fails structural validation
    /// both return `Ok(None)`; the latter is logged by the implementation.
    fn load(&mut self, key: &str) -> StorageResult<Option<ConsentRecord>>;

    /// Remove the record stored under `key`, if any
    fn clear(&mut self, key: &str) -> StorageResult<()>;
}

/// Process-local store; the degraded-mode fallback and the test double
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: HashMap<String, ConsentRecord>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store holds no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl ConsentStore for MemoryStore {
    fn save(&mut self, key: &str, record: &ConsentRecord) -> StorageResult<()> {
        self.records.insert(key.to_string(), record.clone());
        Ok(())
    }

    fn load(&mut self, key: &str) -> StorageResult<Option<ConsentRecord>> {
        Ok(self.records.get(key).cloned())
    }

    fn clear(&mut self, key: &str) -> StorageResult<()> {
        self.records.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{ConsentDecision, ConsentStatus};
    use chrono::{TimeZone, Utc};

    fn sample_record() -> ConsentRecord {
        let t = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        ConsentRecord::new(
            "session_1_x",
            vec![ConsentDecision::new(
                "necessary",
                ConsentStatus::Accepted,
                t,
                "1.0",
            )],
            "1.0",
            t,
        )
    }

    #[test]
    fn test_save_load_roundtrip() {
        let mut store = MemoryStore::new();
        let record = sample_record();

        store.save("consentry", &record).unwrap();
        assert_eq!(store.load("consentry").unwrap(), Some(record));
    }

    #[test]
    fn test_load_missing_key_is_none() {
        let mut store = MemoryStore::new();
        assert_eq!(store.load("absent").unwrap(), None);
    }

    #[test]
    fn test_clear_removes_record() {
        let mut store = MemoryStore::new();
        store.save("consentry", &sample_record()).unwrap();
        store.clear("consentry").unwrap();
        assert_eq!(store.load("consentry").unwrap(), None);
        assert!(store.is_empty());
    }

    #[test]
    fn test_clear_missing_key_is_ok() {
        let mut store = MemoryStore::new();
        assert!(store.clear("absent").is_ok());
    }

    #[test]
    fn test_keys_are_independent() {
        let mut store = MemoryStore::new();
        store.save("a", &sample_record()).unwrap();
        assert_eq!(store.load("b").unwrap(), None);
        assert_eq!(store.len(), 1);
    }
}
