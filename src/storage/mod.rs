//! Persistence adapter for consent records
//!
//! One serialized record per storage key. All operations are synchronous and
//! best-effort: a `ConsentStore` reports failures as typed errors, and the
//! controller degrades to memory-only operation rather than propagating them.
//!
//! # Design Principles
//!
//! - Full-record writes (no partial updates)
//! - A load that fails decoding is treated as "no record found"
//! - Read-your-write consistency via the write-through cache wrapper

mod adapter;
mod cache;
mod errors;
mod file;

pub use adapter::{ConsentStore, MemoryStore};
pub use cache::WriteThroughCache;
pub use errors::{StorageError, StorageResult};
pub use file::FileStore;
