//! consentry - A strict, deterministic, embeddable consent-management core
//!
//! Tracks a user's acceptance/rejection decisions for categories of data
//! processing, persists the decision set locally, reconciles it against the
//! current configuration on load, and drives banner/preferences visibility
//! for a host-rendered UI.

pub mod cli;
pub mod config;
pub mod controller;
pub mod observability;
pub mod reconcile;
pub mod record;
pub mod storage;
pub mod theme;
