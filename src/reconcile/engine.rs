//! Reconciliation engine
//!
//! Decision table, applied in order:
//!
//! 1. no stored record                       -> rebuild from defaults
//! 2. stored version != current version      -> rebuild from defaults
//! 3. stored record expired                  -> rebuild from defaults
//! 4. stored covers all configured ids       -> reuse (with required pin)
//! 5. otherwise                              -> union stored + synthesized
//!
//! The required-category pin is applied on every path, never left to the
//! caller.

use chrono::{DateTime, Duration, Utc};

use crate::config::ConsentCategory;
use crate::record::{ConsentDecision, ConsentRecord, ConsentStatus};

/// Why a stored record was discarded and rebuilt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RebuildReason {
    /// Nothing persisted, or the stored payload failed decoding
    NoStoredRecord,
    /// Stored record was built under a different configuration version
    VersionMismatch,
    /// Stored record aged past the expiration window
    Expired,
}

impl RebuildReason {
    /// Name used in diagnostics
    pub fn as_str(&self) -> &'static str {
        match self {
            RebuildReason::NoStoredRecord => "no_stored_record",
            RebuildReason::VersionMismatch => "version_mismatch",
            RebuildReason::Expired => "expired",
        }
    }
}

/// How the authoritative record was derived
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Stored record reused as-is (modulo the required pin)
    Reused,
    /// Stored decisions unioned with synthesized defaults
    Merged {
        /// Decisions synthesized for uncovered categories
        synthesized: usize,
    },
    /// Fresh default record built
    Rebuilt(RebuildReason),
}

/// Result of a reconciliation pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileOutcome {
    /// The authoritative record
    pub record: ConsentRecord,
    /// Which path produced it
    pub disposition: Disposition,
    /// Required categories corrected from a stale non-accepted status
    pub pinned: usize,
}

impl ReconcileOutcome {
    /// Whether a valid stored record survived (reused or merged). When false,
    /// the caller treats the session as "decision outstanding".
    pub fn had_valid_stored(&self) -> bool {
        !matches!(self.disposition, Disposition::Rebuilt(_))
    }
}

/// Derives the authoritative record from a stored record (if any) and the
/// current configuration.
///
/// `fallback_session_id` is used when no stored session id survives; callers
/// generate it once per uninitialized state.
pub fn reconcile(
    stored: Option<ConsentRecord>,
    categories: &[ConsentCategory],
    current_version: &str,
    expiration_days: i64,
    now: DateTime<Utc>,
    fallback_session_id: &str,
) -> ReconcileOutcome {
    let stored = match stored {
        Some(s) => s,
        None => {
            return rebuild(
                RebuildReason::NoStoredRecord,
                categories,
                current_version,
                now,
                fallback_session_id.to_string(),
            )
        }
    };

    if stored.version != current_version {
        return rebuild(
            RebuildReason::VersionMismatch,
            categories,
            current_version,
            now,
            stored.session_id,
        );
    }

    let expires_at = stored.last_updated + Duration::days(expiration_days);
    if expires_at <= now {
        return rebuild(
            RebuildReason::Expired,
            categories,
            current_version,
            now,
            stored.session_id,
        );
    }

    merge(stored, categories, current_version, now)
}

/// Union path: stored decisions are kept (pinned where required), and a
/// default decision is synthesized for every configured category the stored
/// record does not cover. Stored decisions for categories no longer
/// configured are carried along unchanged.
fn merge(
    stored: ConsentRecord,
    categories: &[ConsentCategory],
    current_version: &str,
    now: DateTime<Utc>,
) -> ReconcileOutcome {
    let mut pinned = 0usize;

    let mut decisions: Vec<ConsentDecision> = stored
        .decisions
        .into_iter()
        .map(|d| {
            let required = categories
                .iter()
                .any(|c| c.id == d.category_id && c.required);
            if required && !d.status.is_accepted() {
                pinned += 1;
                ConsentDecision::new(d.category_id, ConsentStatus::Accepted, now, current_version)
            } else {
                d
            }
        })
        .collect();

    let mut synthesized = 0usize;
    for category in categories {
        if decisions.iter().all(|d| d.category_id != category.id) {
            decisions.push(ConsentDecision::new(
                category.id.clone(),
                default_status(category),
                now,
                current_version,
            ));
            synthesized += 1;
        }
    }

    let last_updated = if synthesized > 0 { now } else { stored.last_updated };

    let mut record = ConsentRecord::new(
        stored.session_id,
        decisions,
        current_version,
        last_updated,
    );
    record.user_id = stored.user_id;
    record.ip_address = stored.ip_address;
    record.user_agent = stored.user_agent;

    let disposition = if synthesized > 0 {
        Disposition::Merged { synthesized }
    } else {
        Disposition::Reused
    };

    ReconcileOutcome {
        record,
        disposition,
        pinned,
    }
}

fn rebuild(
    reason: RebuildReason,
    categories: &[ConsentCategory],
    current_version: &str,
    now: DateTime<Utc>,
    session_id: String,
) -> ReconcileOutcome {
    let record = ConsentRecord::new(
        session_id,
        default_decisions(categories, current_version, now),
        current_version,
        now,
    );
    ReconcileOutcome {
        record,
        disposition: Disposition::Rebuilt(reason),
        pinned: 0,
    }
}

/// The fallback status for a category with no recorded decision
pub fn default_status(category: &ConsentCategory) -> ConsentStatus {
    if category.required || category.default_value {
        ConsentStatus::Accepted
    } else {
        ConsentStatus::Rejected
    }
}

/// One default-derived decision per configured category
pub fn default_decisions(
    categories: &[ConsentCategory],
    version: &str,
    now: DateTime<Utc>,
) -> Vec<ConsentDecision> {
    categories
        .iter()
        .map(|c| ConsentDecision::new(c.id.clone(), default_status(c), now, version))
        .collect()
}
