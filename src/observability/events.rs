//! Observable consent lifecycle events
//!
//! Events are explicit and typed; each maps to exactly one log line. The
//! event name doubles as the `event` field of the emitted JSON.

use std::fmt;

/// Observable events in the consent lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Initialization
    /// Controller initialization begins
    InitStart,
    /// Controller initialization complete, active record established
    InitComplete,
    /// Configuration rejected (empty or duplicate categories)
    ConfigRejected,

    // Stored record disposition
    /// A persisted record was loaded and decoded
    RecordLoaded,
    /// A persisted record failed structural validation
    RecordInvalid,
    /// A persisted record was discarded due to a version mismatch
    VersionMismatch,
    /// A persisted record was discarded as expired
    RecordExpired,
    /// Decisions were synthesized for categories missing from storage
    DecisionsSynthesized,

    // Mutations
    /// The active record changed and was persisted
    ConsentChanged,
    /// A required category was pinned to accepted during reconciliation
    RequiredPinned,
    /// An update against a required or unknown category was refused
    UpdateRejected,
    /// Consent was reset to an unpersisted default record
    ConsentReset,
    /// Do-Not-Track override applied
    DoNotTrackApplied,

    // Visibility
    /// Banner became visible
    BannerShown,
    /// Banner was hidden
    BannerHidden,
    /// Preferences surface became visible
    PreferencesShown,
    /// Preferences surface was hidden
    PreferencesHidden,

    // Storage
    /// Storage degraded to memory-only for the rest of the session
    StorageDegraded,
}

impl Event {
    /// Returns the event name used in log output
    pub fn name(&self) -> &'static str {
        match self {
            Event::InitStart => "INIT_START",
            Event::InitComplete => "INIT_COMPLETE",
            Event::ConfigRejected => "CONFIG_REJECTED",
            Event::RecordLoaded => "RECORD_LOADED",
            Event::RecordInvalid => "RECORD_INVALID",
            Event::VersionMismatch => "VERSION_MISMATCH",
            Event::RecordExpired => "RECORD_EXPIRED",
            Event::DecisionsSynthesized => "DECISIONS_SYNTHESIZED",
            Event::ConsentChanged => "CONSENT_CHANGED",
            Event::RequiredPinned => "REQUIRED_PINNED",
            Event::UpdateRejected => "UPDATE_REJECTED",
            Event::ConsentReset => "CONSENT_RESET",
            Event::DoNotTrackApplied => "DO_NOT_TRACK_APPLIED",
            Event::BannerShown => "BANNER_SHOWN",
            Event::BannerHidden => "BANNER_HIDDEN",
            Event::PreferencesShown => "PREFERENCES_SHOWN",
            Event::PreferencesHidden => "PREFERENCES_HIDDEN",
            Event::StorageDegraded => "STORAGE_DEGRADED",
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
