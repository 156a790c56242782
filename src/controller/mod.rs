//! Consent state controller
//!
//! The controller is the single mutation route for consent state: UI events
//! call its operations, every operation routes through the reconciliation
//! engine and the persistence adapter, and observers are notified after state
//! and persistence are settled. One controller instance per consent session;
//! construction performs the one-time initialization (load, decode,
//! reconcile), so there is no separate init flag to guard.
//!
//! # Invariants Enforced
//!
//! - CNS-C1: required categories resolve to accepted after every operation
//! - CNS-C2: `last_updated` is monotonically non-decreasing
//! - CNS-C3: a fired auto-show deadline never resurrects the banner once a
//!   decision has been made
//! - CNS-C4: storage failure is surfaced once, then the session runs
//!   memory-only

mod core;
mod errors;

pub use core::ConsentController;
pub use errors::{ConsentError, ConsentResult};
