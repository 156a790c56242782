//! Consent record reconciliation
//!
//! Reconciliation derives the authoritative in-memory record from
//! possibly-stale or incomplete persisted data and the current configuration.
//! The engine is pure: no I/O, no clock access, no randomness. All inputs,
//! including `now` and the fallback session id, are injected by the caller.
//!
//! # Invariants Enforced
//!
//! - CNS-E1: the output record's version equals the current configuration
//!   version
//! - CNS-E2: required categories are accepted in the output, whatever the
//!   stored record said
//! - CNS-E3: reconcile is total; it always returns a usable record

mod engine;

pub use engine::{
    default_decisions, default_status, reconcile, Disposition, RebuildReason, ReconcileOutcome,
};
