//! Consent record data model and codec
//!
//! The consent record is the canonical unit of state: one set of per-category
//! decisions plus metadata for a single user/session. Records are
//! immutable-update: every mutation builds a new record.
//!
//! # Invariants Enforced
//!
//! - CNS-R1: at most one decision per category id (codec dedupes on decode)
//! - CNS-R2: timestamps are canonical `DateTime<Utc>` after decode
//! - CNS-R3: encode/decode round-trips any record produced by this crate

mod codec;
mod errors;
mod types;

pub use codec::{decode, encode, DecodedRecord};
pub use errors::{CodecError, CodecResult};
pub use types::{generate_session_id, ConsentDecision, ConsentRecord, ConsentStatus};
