//! Controller lifecycle tests
//!
//! End-to-end behavior of the consent state controller: observer callbacks,
//! persistence discipline (one write per mutating call, deferred persistence
//! after reset), required-category pinning, Do-Not-Track, auto-show, and
//! storage degradation.

use std::cell::RefCell;
use std::rc::Rc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use consentry::config::{ConsentCallbacks, ConsentCategory, ConsentSettings, HostEnvironment};
use consentry::controller::{ConsentController, ConsentError};
use consentry::record::{ConsentRecord, ConsentStatus};
use consentry::storage::{ConsentStore, MemoryStore, StorageError, StorageResult};

// =============================================================================
// Helper Functions
// =============================================================================

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
}

fn settings() -> ConsentSettings {
    ConsentSettings::new(
        vec![
            ConsentCategory::required("necessary", "Necessary"),
            ConsentCategory::optional("analytics", "Analytics", false),
            ConsentCategory::optional("marketing", "Marketing", false),
        ],
        "1.0",
    )
}

/// Store double that counts operations and shares its state with the test
#[derive(Clone, Default)]
struct CountingStore {
    inner: Rc<RefCell<MemoryStore>>,
    saves: Rc<RefCell<usize>>,
}

impl CountingStore {
    fn new() -> Self {
        Self::default()
    }

    fn save_count(&self) -> usize {
        *self.saves.borrow()
    }

    fn stored(&self, key: &str) -> Option<ConsentRecord> {
        self.inner.borrow_mut().load(key).unwrap()
    }
}

impl ConsentStore for CountingStore {
    fn save(&mut self, key: &str, record: &ConsentRecord) -> StorageResult<()> {
        *self.saves.borrow_mut() += 1;
        self.inner.borrow_mut().save(key, record)
    }

    fn load(&mut self, key: &str) -> StorageResult<Option<ConsentRecord>> {
        self.inner.borrow_mut().load(key)
    }

    fn clear(&mut self, key: &str) -> StorageResult<()> {
        self.inner.borrow_mut().clear(key)
    }
}

/// Store double whose every operation fails
struct BrokenStore;

impl ConsentStore for BrokenStore {
    fn save(&mut self, _key: &str, _record: &ConsentRecord) -> StorageResult<()> {
        Err(StorageError::Unavailable("medium offline".into()))
    }

    fn load(&mut self, _key: &str) -> StorageResult<Option<ConsentRecord>> {
        Err(StorageError::Unavailable("medium offline".into()))
    }

    fn clear(&mut self, _key: &str) -> StorageResult<()> {
        Err(StorageError::Unavailable("medium offline".into()))
    }
}

fn init_with_store(store: impl ConsentStore + 'static) -> ConsentController {
    ConsentController::initialize_at(
        settings(),
        HostEnvironment::default(),
        ConsentCallbacks::new(),
        Box::new(store),
        t0(),
    )
}

// =============================================================================
// Persistence Discipline
// =============================================================================

/// reject_all then update("analytics", true): analytics accepted, necessary
/// pinned accepted, marketing as reject_all left it, one write per call.
#[test]
fn test_reject_all_then_single_update() {
    let store = CountingStore::new();
    let mut c = init_with_store(store.clone());
    assert_eq!(store.save_count(), 0, "initialization never writes");

    c.reject_all();
    assert_eq!(store.save_count(), 1);

    c.update_consent("analytics", true);
    assert_eq!(store.save_count(), 2);

    assert_eq!(c.get_consent("analytics"), ConsentStatus::Accepted);
    assert_eq!(c.get_consent("necessary"), ConsentStatus::Accepted);
    assert_eq!(c.get_consent("marketing"), ConsentStatus::Rejected);

    let persisted = store.stored("consentry").unwrap();
    assert_eq!(persisted, *c.get_all_consent());
}

/// A second controller over the same store resumes the persisted state.
#[test]
fn test_persisted_record_survives_reinitialization() {
    let store = CountingStore::new();
    let mut c = init_with_store(store.clone());
    c.accept_all();
    let committed = c.get_all_consent().clone();
    drop(c);

    let c2 = ConsentController::initialize_at(
        settings(),
        HostEnvironment::default(),
        ConsentCallbacks::new(),
        Box::new(store.clone()),
        t0() + Duration::days(1),
    );

    assert_eq!(c2.get_all_consent(), &committed);
    assert!(!c2.is_banner_visible(), "valid stored record, no auto-show");
}

/// Repeated accept_all does not touch storage again.
#[test]
fn test_accept_all_idempotent_write() {
    let store = CountingStore::new();
    let mut c = init_with_store(store.clone());

    c.accept_all();
    c.accept_all();
    assert_eq!(store.save_count(), 1);
}

// =============================================================================
// Reset Semantics
// =============================================================================

/// reset clears storage but does not persist the fresh default record until
/// the user decides again.
#[test]
fn test_reset_defers_persistence() {
    let store = CountingStore::new();
    let mut c = init_with_store(store.clone());

    c.accept_all();
    assert!(store.stored("consentry").is_some());

    c.reset_consent();
    assert!(store.stored("consentry").is_none());
    assert!(c.is_banner_visible());
    assert_eq!(store.save_count(), 1, "reset itself writes nothing");

    c.reject_all();
    assert_eq!(store.save_count(), 2);
    assert!(store.stored("consentry").is_some());
}

// =============================================================================
// Observer Callbacks
// =============================================================================

#[test]
fn test_change_and_banner_callbacks() {
    let changes: Rc<RefCell<Vec<ConsentRecord>>> = Rc::new(RefCell::new(Vec::new()));
    let shows = Rc::new(RefCell::new(0usize));
    let hides = Rc::new(RefCell::new(0usize));

    let callbacks = {
        let changes = Rc::clone(&changes);
        let shows = Rc::clone(&shows);
        let hides = Rc::clone(&hides);
        ConsentCallbacks::new()
            .on_consent_change(move |record| changes.borrow_mut().push(record.clone()))
            .on_banner_show(move || *shows.borrow_mut() += 1)
            .on_banner_hide(move || *hides.borrow_mut() += 1)
    };

    let mut c = ConsentController::initialize_at(
        settings(),
        HostEnvironment::default(),
        callbacks,
        Box::new(MemoryStore::new()),
        t0(),
    );

    // Zero-delay auto-show fires during initialization.
    assert_eq!(*shows.borrow(), 1);

    c.accept_all();
    assert_eq!(changes.borrow().len(), 1);
    assert_eq!(*hides.borrow(), 1);
    assert!(changes.borrow()[0].all_accepted(["necessary", "analytics", "marketing"]));

    // Idempotent accept_all fires no further change.
    c.accept_all();
    assert_eq!(changes.borrow().len(), 1);
}

#[test]
fn test_required_rejection_surfaces_error() {
    let errors: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new(Vec::new()));
    let callbacks = {
        let errors = Rc::clone(&errors);
        ConsentCallbacks::new().on_error(move |e| errors.borrow_mut().push(e.code().to_string()))
    };

    let mut c = ConsentController::initialize_at(
        settings(),
        HostEnvironment::default(),
        callbacks,
        Box::new(MemoryStore::new()),
        t0(),
    );

    c.update_consent("necessary", false);
    assert_eq!(errors.borrow().as_slice(), ["CNS_REQUIRED_CATEGORY_PINNED"]);
    assert_eq!(c.get_consent("necessary"), ConsentStatus::Accepted);

    c.update_consent("nonexistent", true);
    assert_eq!(errors.borrow().len(), 2);
    assert_eq!(errors.borrow()[1], "CNS_UNKNOWN_CATEGORY");
}

// =============================================================================
// Storage Degradation
// =============================================================================

/// A broken medium surfaces exactly one error, then the session runs in
/// memory without further callbacks.
#[test]
fn test_storage_failure_surfaced_once() {
    let errors: Rc<RefCell<Vec<ConsentError>>> = Rc::new(RefCell::new(Vec::new()));
    let callbacks = {
        let errors = Rc::clone(&errors);
        ConsentCallbacks::new().on_error(move |e| errors.borrow_mut().push(e.clone()))
    };

    let mut c = ConsentController::initialize_at(
        settings(),
        HostEnvironment::default(),
        callbacks,
        Box::new(BrokenStore),
        t0(),
    );

    assert!(c.is_storage_degraded());
    assert_eq!(errors.borrow().len(), 1);

    // Mutations still work, in memory, without re-surfacing the failure.
    c.accept_all();
    c.reject_all();
    assert_eq!(errors.borrow().len(), 1);
    assert_eq!(c.get_consent("necessary"), ConsentStatus::Accepted);
}

// =============================================================================
// Auto-Show & Do-Not-Track
// =============================================================================

#[test]
fn test_auto_show_after_configured_delay() {
    let mut s = settings();
    s.auto_show_delay_ms = 2_000;
    let mut c = ConsentController::initialize_at(
        s,
        HostEnvironment::default(),
        ConsentCallbacks::new(),
        Box::new(MemoryStore::new()),
        t0(),
    );

    assert!(!c.is_banner_visible());
    assert!(!c.tick(t0() + Duration::milliseconds(1_999)));
    assert!(c.tick(t0() + Duration::milliseconds(2_000)));
    assert!(c.is_banner_visible());
}

/// A decision made before the deadline cancels it for good.
#[test]
fn test_decision_cancels_pending_auto_show() {
    let mut s = settings();
    s.auto_show_delay_ms = 2_000;
    let mut c = ConsentController::initialize_at(
        s,
        HostEnvironment::default(),
        ConsentCallbacks::new(),
        Box::new(MemoryStore::new()),
        t0(),
    );

    c.update_consent("analytics", true);
    assert!(!c.tick(t0() + Duration::seconds(5)));
    assert!(!c.is_banner_visible());
}

#[test]
fn test_do_not_track_rejects_optional_and_persists() {
    let store = CountingStore::new();
    let mut s = settings();
    s.respect_do_not_track = true;
    let env = HostEnvironment {
        do_not_track: true,
        ..Default::default()
    };

    let c = ConsentController::initialize_at(
        s,
        env,
        ConsentCallbacks::new(),
        Box::new(store.clone()),
        t0(),
    );

    assert!(!c.is_banner_visible());
    assert_eq!(store.save_count(), 1);
    let persisted = store.stored("consentry").unwrap();
    assert_eq!(persisted.status_of("necessary"), Some(ConsentStatus::Accepted));
    assert_eq!(persisted.status_of("analytics"), Some(ConsentStatus::Rejected));
    assert_eq!(persisted.status_of("marketing"), Some(ConsentStatus::Rejected));
}

/// DNT signal without the config opt-in changes nothing.
#[test]
fn test_do_not_track_ignored_without_opt_in() {
    let env = HostEnvironment {
        do_not_track: true,
        ..Default::default()
    };
    let c = ConsentController::initialize_at(
        settings(),
        env,
        ConsentCallbacks::new(),
        Box::new(MemoryStore::new()),
        t0(),
    );

    assert!(c.is_banner_visible(), "no opt-in: normal auto-show applies");
    assert_eq!(c.get_consent("analytics"), ConsentStatus::Rejected);
}

// =============================================================================
// Required Pin Holds Everywhere
// =============================================================================

/// The required category reads accepted after every operation sequence.
#[test]
fn test_required_always_accepted() {
    let mut c = init_with_store(MemoryStore::new());
    assert_eq!(c.get_consent("necessary"), ConsentStatus::Accepted);

    c.accept_all();
    assert_eq!(c.get_consent("necessary"), ConsentStatus::Accepted);

    c.reject_all();
    assert_eq!(c.get_consent("necessary"), ConsentStatus::Accepted);

    c.update_consent("necessary", false);
    assert_eq!(c.get_consent("necessary"), ConsentStatus::Accepted);

    c.reset_consent();
    assert_eq!(c.get_consent("necessary"), ConsentStatus::Accepted);
}

/// last_updated never decreases across the record's observed lifecycle.
#[test]
fn test_last_updated_monotonic() {
    let mut c = init_with_store(MemoryStore::new());
    let mut previous = c.get_all_consent().last_updated;

    c.reject_all();
    assert!(c.get_all_consent().last_updated >= previous);
    previous = c.get_all_consent().last_updated;

    c.update_consent("marketing", true);
    assert!(c.get_all_consent().last_updated >= previous);
}
