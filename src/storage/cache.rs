//! Write-through cache wrapper
//!
//! Guarantees read-your-write consistency for a single consent session: a
//! load always observes the last record this process successfully wrote for
//! the same key. The cache holds exactly one entry and is keyed by the
//! storage key, so a key change between initializations invalidates it.

use crate::record::ConsentRecord;

use super::adapter::ConsentStore;
use super::errors::StorageResult;

/// Wraps any store with a single-entry last-written cache
#[derive(Debug)]
pub struct WriteThroughCache<S: ConsentStore> {
    inner: S,
    cached: Option<(String, Option<ConsentRecord>)>,
}

impl<S: ConsentStore> WriteThroughCache<S> {
    /// Wrap a store
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            cached: None,
        }
    }

    /// Access the wrapped store
    pub fn inner(&self) -> &S {
        &self.inner
    }

    fn cached_for(&self, key: &str) -> Option<&Option<ConsentRecord>> {
        match &self.cached {
            Some((k, value)) if k == key => Some(value),
            _ => None,
        }
    }
}

impl<S: ConsentStore> ConsentStore for WriteThroughCache<S> {
    fn save(&mut self, key: &str, record: &ConsentRecord) -> StorageResult<()> {
        self.inner.save(key, record)?;
        self.cached = Some((key.to_string(), Some(record.clone())));
        Ok(())
    }

    fn load(&mut self, key: &str) -> StorageResult<Option<ConsentRecord>> {
        if let Some(value) = self.cached_for(key) {
            return Ok(value.clone());
        }

        let loaded = self.inner.load(key)?;
        self.cached = Some((key.to_string(), loaded.clone()));
        Ok(loaded)
    }

    fn clear(&mut self, key: &str) -> StorageResult<()> {
        self.inner.clear(key)?;
        self.cached = Some((key.to_string(), None));
        Ok(())
    }
}
