//! Controller implementation
//!
//! All operations run synchronously on the host thread. The auto-show timer
//! is a stored deadline the host fires by calling `tick` from its event loop;
//! there is no background thread.

use chrono::{DateTime, Duration, Utc};

use crate::config::{
    dedupe_categories, validate_settings, ConsentCallbacks, ConsentSettings, HostEnvironment,
};
use crate::observability::{Event, Logger};
use crate::reconcile::{default_decisions, reconcile, Disposition, RebuildReason};
use crate::record::{
    generate_session_id, ConsentDecision, ConsentRecord, ConsentStatus,
};
use crate::storage::ConsentStore;

use super::errors::ConsentError;

/// The consent state controller; one instance per consent session
pub struct ConsentController {
    settings: ConsentSettings,
    environment: HostEnvironment,
    callbacks: ConsentCallbacks,
    store: Box<dyn ConsentStore>,
    record: ConsentRecord,
    banner_visible: bool,
    preferences_visible: bool,
    banner_due_at: Option<DateTime<Utc>>,
    decision_made: bool,
    storage_degraded: bool,
}

impl ConsentController {
    /// Initialize a controller with the current wall clock.
    ///
    /// See [`ConsentController::initialize_at`].
    pub fn initialize(
        settings: ConsentSettings,
        environment: HostEnvironment,
        callbacks: ConsentCallbacks,
        store: Box<dyn ConsentStore>,
    ) -> Self {
        let now = Utc::now();
        Self::initialize_at(settings, environment, callbacks, store, now)
    }

    /// Initialize a controller: validate configuration, load and reconcile
    /// the persisted record, apply the Do-Not-Track override, and arm the
    /// banner auto-show deadline. Runs exactly once, at construction.
    pub fn initialize_at(
        mut settings: ConsentSettings,
        environment: HostEnvironment,
        callbacks: ConsentCallbacks,
        store: Box<dyn ConsentStore>,
        now: DateTime<Utc>,
    ) -> Self {
        Logger::trace(Event::InitStart, &[("version", &settings.version)]);

        let config_error = validate_settings(&settings).err();
        if config_error.is_some() {
            settings.categories = dedupe_categories(&settings.categories);
        }

        let fallback_session = generate_session_id(now);

        let mut controller = Self {
            settings,
            environment,
            callbacks,
            store,
            record: ConsentRecord::new(fallback_session.clone(), vec![], "", now),
            banner_visible: false,
            preferences_visible: false,
            banner_due_at: None,
            decision_made: false,
            storage_degraded: false,
        };

        if let Some(err) = config_error {
            Logger::error(Event::ConfigRejected, &[("code", err.code())]);
            controller.fire_error(&ConsentError::Config(err));
        }

        let stored = controller.load_stored();
        let outcome = reconcile(
            stored,
            &controller.settings.categories,
            &controller.settings.version,
            controller.settings.expiration_days,
            now,
            &fallback_session,
        );
        controller.log_disposition(&outcome.disposition, outcome.pinned);

        let had_valid_stored = outcome.had_valid_stored();
        controller.record = outcome.record;
        controller.stamp_environment();

        if controller.settings.respect_do_not_track && controller.environment.do_not_track {
            controller.apply_do_not_track(now);
        } else if !had_valid_stored {
            let delay = Duration::milliseconds(controller.settings.auto_show_delay_ms as i64);
            controller.banner_due_at = Some(now + delay);
        }

        Logger::info(
            Event::InitComplete,
            &[
                ("categories", &controller.settings.categories.len().to_string()),
                ("version", &controller.settings.version.clone()),
            ],
        );

        // Fires immediately when the configured delay is zero.
        controller.tick(now);
        controller
    }

    // =========================================================================
    // Read accessors
    // =========================================================================

    /// The active consent record
    pub fn get_all_consent(&self) -> &ConsentRecord {
        &self.record
    }

    /// Status for a category: the recorded decision when one exists,
    /// otherwise the category default mapped to accepted/pending. Unknown
    /// ids are pending.
    pub fn get_consent(&self, category_id: &str) -> ConsentStatus {
        if let Some(status) = self.record.status_of(category_id) {
            return status;
        }
        match self.settings.category(category_id) {
            Some(c) if c.default_value || c.required => ConsentStatus::Accepted,
            Some(_) => ConsentStatus::Pending,
            None => ConsentStatus::Pending,
        }
    }

    /// Whether the category is currently accepted
    pub fn has_consent(&self, category_id: &str) -> bool {
        self.get_consent(category_id).is_accepted()
    }

    /// Whether the banner is currently visible
    pub fn is_banner_visible(&self) -> bool {
        self.banner_visible
    }

    /// Whether the preferences surface is currently visible
    pub fn is_preferences_visible(&self) -> bool {
        self.preferences_visible
    }

    /// Whether persistence has degraded to memory-only for this session
    pub fn is_storage_degraded(&self) -> bool {
        self.storage_degraded
    }

    /// The validated host settings this controller runs under
    pub fn settings(&self) -> &ConsentSettings {
        &self.settings
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Accept every configured category. A true no-op on data when the
    /// record already has every category accepted at the current version;
    /// the banner and preferences are hidden either way.
    pub fn accept_all(&mut self) {
        let now = Utc::now();
        let already_accepted = self.record.version == self.settings.version
            && self
                .record
                .all_accepted(self.settings.categories.iter().map(|c| c.id.as_str()));

        if !already_accepted {
            let decisions: Vec<ConsentDecision> = self
                .settings
                .categories
                .iter()
                .map(|c| {
                    ConsentDecision::new(
                        c.id.clone(),
                        ConsentStatus::Accepted,
                        now,
                        self.settings.version.clone(),
                    )
                })
                .collect();
            self.commit(decisions, now);
        } else {
            self.decision_made = true;
            self.banner_due_at = None;
        }

        self.hide_banner();
        self.hide_preferences();
    }

    /// Reject every optional category; required categories stay accepted.
    pub fn reject_all(&mut self) {
        let now = Utc::now();
        let decisions: Vec<ConsentDecision> = self
            .settings
            .categories
            .iter()
            .map(|c| {
                let status = if c.required {
                    ConsentStatus::Accepted
                } else {
                    ConsentStatus::Rejected
                };
                ConsentDecision::new(c.id.clone(), status, now, self.settings.version.clone())
            })
            .collect();

        self.commit(decisions, now);
        self.hide_banner();
        self.hide_preferences();
    }

    /// Update a single category, leaving all others untouched.
    ///
    /// A no-op with a diagnostic when the id is not configured or when the
    /// category is required and a rejection is requested.
    pub fn update_consent(&mut self, category_id: &str, accepted: bool) {
        let now = Utc::now();

        let category = match self.settings.category(category_id) {
            Some(c) => c,
            None => {
                Logger::warn(
                    Event::UpdateRejected,
                    &[("category_id", category_id), ("reason", "unknown")],
                );
                self.fire_error(&ConsentError::UnknownCategory(category_id.to_string()));
                return;
            }
        };

        if category.required && !accepted {
            Logger::warn(
                Event::UpdateRejected,
                &[("category_id", category_id), ("reason", "required")],
            );
            self.fire_error(&ConsentError::RequiredCategoryPinned(
                category_id.to_string(),
            ));
            return;
        }

        let mut decisions = self.record.decisions.clone();
        let replacement = ConsentDecision::new(
            category_id,
            ConsentStatus::from_accepted(accepted),
            now,
            self.settings.version.clone(),
        );
        match decisions.iter_mut().find(|d| d.category_id == category_id) {
            Some(existing) => *existing = replacement,
            None => decisions.push(replacement),
        }

        self.commit(decisions, now);
    }

    /// Clear persisted storage and rebuild an unpersisted default record.
    /// The fresh record is not written back until the user makes an explicit
    /// choice, preserving the "decision outstanding" signal.
    pub fn reset_consent(&mut self) {
        let now = Utc::now();

        if !self.storage_degraded {
            if let Err(e) = self.store.clear(&self.settings.storage_key) {
                self.degrade_storage(e);
            }
        }

        self.record = ConsentRecord::new(
            self.record.session_id.clone(),
            default_decisions(&self.settings.categories, &self.settings.version, now),
            self.settings.version.clone(),
            now,
        );
        self.stamp_environment();
        self.decision_made = false;
        self.banner_due_at = None;

        Logger::info(Event::ConsentReset, &[("key", &self.settings.storage_key)]);
        self.show_banner();
        self.hide_preferences();
    }

    // =========================================================================
    // Visibility
    // =========================================================================

    /// Show the banner and notify the host
    pub fn show_banner(&mut self) {
        if !self.banner_visible {
            self.banner_visible = true;
            Logger::info(Event::BannerShown, &[]);
            if let Some(cb) = self.callbacks.on_banner_show.as_mut() {
                cb();
            }
        }
    }

    /// Hide the banner and notify the host
    pub fn hide_banner(&mut self) {
        if self.banner_visible {
            self.banner_visible = false;
            Logger::info(Event::BannerHidden, &[]);
            if let Some(cb) = self.callbacks.on_banner_hide.as_mut() {
                cb();
            }
        }
    }

    /// Show the preferences surface
    pub fn show_preferences(&mut self) {
        if !self.preferences_visible {
            self.preferences_visible = true;
            Logger::trace(Event::PreferencesShown, &[]);
        }
    }

    /// Hide the preferences surface
    pub fn hide_preferences(&mut self) {
        if self.preferences_visible {
            self.preferences_visible = false;
            Logger::trace(Event::PreferencesHidden, &[]);
        }
    }

    /// Fire the auto-show deadline if due. A deadline that fires after a
    /// decision has been made is discarded, never shown. Returns whether the
    /// banner became visible.
    pub fn tick(&mut self, now: DateTime<Utc>) -> bool {
        match self.banner_due_at {
            Some(due) if due <= now => {}
            _ => return false,
        }
        self.banner_due_at = None;

        if self.decision_made {
            return false;
        }

        let was_visible = self.banner_visible;
        self.show_banner();
        !was_visible
    }

    // =========================================================================
    // Internal
    // =========================================================================

    /// Replace the active record with a new one built from `decisions`,
    /// persist it, and notify observers. The single mutation route.
    fn commit(&mut self, decisions: Vec<ConsentDecision>, now: DateTime<Utc>) {
        // last_updated never moves backwards, even if the wall clock does.
        let last_updated = now.max(self.record.last_updated);

        let mut record = ConsentRecord::new(
            self.record.session_id.clone(),
            decisions,
            self.settings.version.clone(),
            last_updated,
        );
        record.user_id = self.environment.user_id.clone();
        record.ip_address = self.environment.ip_address.clone();
        record.user_agent = self.environment.user_agent.clone();

        self.persist(&record);
        self.record = record;
        self.decision_made = true;
        self.banner_due_at = None;

        Logger::info(
            Event::ConsentChanged,
            &[("decisions", &self.record.decisions.len().to_string())],
        );
        if let Some(cb) = self.callbacks.on_consent_change.as_mut() {
            cb(&self.record);
        }
    }

    fn persist(&mut self, record: &ConsentRecord) {
        if self.storage_degraded {
            return;
        }
        if let Err(e) = self.store.save(&self.settings.storage_key, record) {
            self.degrade_storage(e);
        }
    }

    fn load_stored(&mut self) -> Option<ConsentRecord> {
        if self.storage_degraded {
            return None;
        }
        match self.store.load(&self.settings.storage_key) {
            Ok(Some(record)) => {
                Logger::trace(Event::RecordLoaded, &[("key", &self.settings.storage_key)]);
                Some(record)
            }
            Ok(None) => None,
            Err(e) => {
                self.degrade_storage(e);
                None
            }
        }
    }

    /// Surface a storage failure once, then run memory-only.
    fn degrade_storage(&mut self, error: crate::storage::StorageError) {
        if self.storage_degraded {
            return;
        }
        self.storage_degraded = true;
        Logger::warn(Event::StorageDegraded, &[("code", error.code())]);
        self.fire_error(&ConsentError::Storage(error));
    }

    fn fire_error(&mut self, error: &ConsentError) {
        if let Some(cb) = self.callbacks.on_error.as_mut() {
            cb(error);
        }
    }

    fn stamp_environment(&mut self) {
        if self.record.user_id.is_none() {
            self.record.user_id = self.environment.user_id.clone();
        }
        if self.record.ip_address.is_none() {
            self.record.ip_address = self.environment.ip_address.clone();
        }
        if self.record.user_agent.is_none() {
            self.record.user_agent = self.environment.user_agent.clone();
        }
    }

    fn apply_do_not_track(&mut self, now: DateTime<Utc>) {
        let decisions: Vec<ConsentDecision> = self
            .settings
            .categories
            .iter()
            .map(|c| {
                let status = if c.required {
                    ConsentStatus::Accepted
                } else {
                    ConsentStatus::Rejected
                };
                ConsentDecision::new(c.id.clone(), status, now, self.settings.version.clone())
            })
            .collect();

        Logger::info(Event::DoNotTrackApplied, &[]);
        self.commit(decisions, now);
    }

    fn log_disposition(&self, disposition: &Disposition, pinned: usize) {
        match disposition {
            Disposition::Reused => {}
            Disposition::Merged { synthesized } => {
                Logger::info(
                    Event::DecisionsSynthesized,
                    &[("count", &synthesized.to_string())],
                );
            }
            Disposition::Rebuilt(RebuildReason::VersionMismatch) => {
                Logger::info(Event::VersionMismatch, &[("current", &self.settings.version)]);
            }
            Disposition::Rebuilt(RebuildReason::Expired) => {
                Logger::info(
                    Event::RecordExpired,
                    &[("expiration_days", &self.settings.expiration_days.to_string())],
                );
            }
            Disposition::Rebuilt(RebuildReason::NoStoredRecord) => {}
        }
        if pinned > 0 {
            Logger::warn(Event::RequiredPinned, &[("count", &pinned.to_string())]);
        }
    }
}
