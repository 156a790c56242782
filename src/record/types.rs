//! Consent record types
//!
//! Wire layout is camelCase JSON: top-level `sessionId`, `decisions`,
//! `lastUpdated`, `version` plus optional `userId`, `ipAddress`, `userAgent`;
//! decisions carry `categoryId`, `status`, `timestamp`, `version`. Timestamps
//! are RFC 3339.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Consent status for one category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsentStatus {
    /// User granted consent
    Accepted,
    /// User declined consent
    Rejected,
    /// No decision yet
    Pending,
}

impl ConsentStatus {
    /// Maps an accept/reject boolean to a status
    pub fn from_accepted(accepted: bool) -> Self {
        if accepted {
            ConsentStatus::Accepted
        } else {
            ConsentStatus::Rejected
        }
    }

    /// Whether this status grants consent
    pub fn is_accepted(&self) -> bool {
        matches!(self, ConsentStatus::Accepted)
    }

    /// Returns the wire string for this status
    pub fn as_str(&self) -> &'static str {
        match self {
            ConsentStatus::Accepted => "accepted",
            ConsentStatus::Rejected => "rejected",
            ConsentStatus::Pending => "pending",
        }
    }

    /// Parses a wire string, if valid
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "accepted" => Some(ConsentStatus::Accepted),
            "rejected" => Some(ConsentStatus::Rejected),
            "pending" => Some(ConsentStatus::Pending),
            _ => None,
        }
    }
}

/// The recorded status of consent for one category at one point in time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsentDecision {
    /// References a configured `ConsentCategory::id`
    pub category_id: String,
    /// Current status
    pub status: ConsentStatus,
    /// When this decision last changed
    pub timestamp: DateTime<Utc>,
    /// Configuration version active when the decision was made
    pub version: String,
}

impl ConsentDecision {
    /// Create a decision stamped with the given time and version
    pub fn new(
        category_id: impl Into<String>,
        status: ConsentStatus,
        timestamp: DateTime<Utc>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            category_id: category_id.into(),
            status,
            timestamp,
            version: version.into(),
        }
    }
}

/// The full decision set plus metadata for one user/session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsentRecord {
    /// Opaque identifier, generated once per uninitialized state
    pub session_id: String,
    /// Decisions, unique by category id
    pub decisions: Vec<ConsentDecision>,
    /// Timestamp of the most recent mutation
    pub last_updated: DateTime<Utc>,
    /// Configuration version this record was built under
    pub version: String,
    /// Stable user identifier, if the host supplied one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// Client IP address, if the host chose to record it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    /// Client user-agent string
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

impl ConsentRecord {
    /// Create a record from a decision set, stamped with the given time
    pub fn new(
        session_id: impl Into<String>,
        decisions: Vec<ConsentDecision>,
        version: impl Into<String>,
        last_updated: DateTime<Utc>,
    ) -> Self {
        Self {
            session_id: session_id.into(),
            decisions,
            last_updated,
            version: version.into(),
            user_id: None,
            ip_address: None,
            user_agent: None,
        }
    }

    /// Look up the decision for a category, if one exists
    pub fn decision(&self, category_id: &str) -> Option<&ConsentDecision> {
        self.decisions.iter().find(|d| d.category_id == category_id)
    }

    /// Status for a category, or `None` when the record has no decision
    pub fn status_of(&self, category_id: &str) -> Option<ConsentStatus> {
        self.decision(category_id).map(|d| d.status)
    }

    /// Whether every listed category id is accepted in this record
    pub fn all_accepted(&self, category_ids: impl IntoIterator<Item = impl AsRef<str>>) -> bool {
        category_ids.into_iter().all(|id| {
            self.status_of(id.as_ref())
                .map(|s| s.is_accepted())
                .unwrap_or(false)
        })
    }
}

const SESSION_SUFFIX_LEN: usize = 13;
const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Generates a session identifier: `session_<unix_millis>_<base36 suffix>`
pub fn generate_session_id(now: DateTime<Utc>) -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..SESSION_SUFFIX_LEN)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect();
    format!("session_{}_{}", now.timestamp_millis(), suffix)
}
