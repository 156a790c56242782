//! Configuration type definitions
//!
//! `ConsentSettings` is the serializable host configuration (the CLI reads it
//! from a JSON file); `ConsentCallbacks` and `HostEnvironment` are the
//! non-serializable parts of the host boundary and are passed to the
//! controller separately.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::controller::ConsentError;
use crate::record::ConsentRecord;

/// A named purpose for which consent is requested
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsentCategory {
    /// Unique category key
    pub id: String,
    /// Human-readable name
    pub name: String,
    /// Human-readable description
    pub description: String,
    /// Free-form grouping label for host UI (analytics, marketing, ...);
    /// has no effect on reconciliation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Required categories cannot be rejected
    pub required: bool,
    /// Fallback acceptance state when no decision exists
    pub default_value: bool,
}

impl ConsentCategory {
    /// Create a required category (always accepted, default on)
    pub fn required(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            kind: None,
            required: true,
            default_value: true,
        }
    }

    /// Create an optional category with the given default acceptance state
    pub fn optional(
        id: impl Into<String>,
        name: impl Into<String>,
        default_value: bool,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            kind: None,
            required: false,
            default_value,
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the grouping label
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }
}

/// Host configuration consumed by the consent controller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsentSettings {
    /// Configured consent categories
    pub categories: Vec<ConsentCategory>,
    /// Configuration version; stored records from other versions are rebuilt
    pub version: String,
    /// Days after `lastUpdated` at which a stored record expires
    #[serde(default = "default_expiration_days")]
    pub expiration_days: i64,
    /// Storage key the record is persisted under
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
    /// Delay before the banner auto-shows when no decision exists
    #[serde(default)]
    pub auto_show_delay_ms: u64,
    /// Whether an asserted Do-Not-Track signal rejects all optional categories
    #[serde(default)]
    pub respect_do_not_track: bool,
}

fn default_expiration_days() -> i64 {
    365
}

fn default_storage_key() -> String {
    "consentry".to_string()
}

impl ConsentSettings {
    /// Create settings with defaults for everything but categories and version
    pub fn new(categories: Vec<ConsentCategory>, version: impl Into<String>) -> Self {
        Self {
            categories,
            version: version.into(),
            expiration_days: default_expiration_days(),
            storage_key: default_storage_key(),
            auto_show_delay_ms: 0,
            respect_do_not_track: false,
        }
    }

    /// Look up a configured category by id
    pub fn category(&self, id: &str) -> Option<&ConsentCategory> {
        self.categories.iter().find(|c| c.id == id)
    }
}

/// Environment signals supplied by the host at controller construction
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostEnvironment {
    /// Whether the user agent asserts Do-Not-Track
    pub do_not_track: bool,
    /// Stable user identifier, if the host has one
    pub user_id: Option<String>,
    /// Client IP address, if the host chooses to record it
    pub ip_address: Option<String>,
    /// Client user-agent string
    pub user_agent: Option<String>,
}

/// Lifecycle callbacks the host registers with the controller
///
/// All callbacks are optional. They are invoked synchronously on the calling
/// thread, after the controller's own state and persistence are settled.
#[derive(Default)]
pub struct ConsentCallbacks {
    pub(crate) on_consent_change: Option<Box<dyn FnMut(&ConsentRecord)>>,
    pub(crate) on_banner_show: Option<Box<dyn FnMut()>>,
    pub(crate) on_banner_hide: Option<Box<dyn FnMut()>>,
    pub(crate) on_error: Option<Box<dyn FnMut(&ConsentError)>>,
}

impl ConsentCallbacks {
    /// Create an empty callback set
    pub fn new() -> Self {
        Self::default()
    }

    /// Invoked with the new record after every persisted consent change
    pub fn on_consent_change(mut self, f: impl FnMut(&ConsentRecord) + 'static) -> Self {
        self.on_consent_change = Some(Box::new(f));
        self
    }

    /// Invoked when the banner becomes visible
    pub fn on_banner_show(mut self, f: impl FnMut() + 'static) -> Self {
        self.on_banner_show = Some(Box::new(f));
        self
    }

    /// Invoked when the banner is hidden
    pub fn on_banner_hide(mut self, f: impl FnMut() + 'static) -> Self {
        self.on_banner_hide = Some(Box::new(f));
        self
    }

    /// Invoked with every recovered error (degraded storage, rejected
    /// updates, invalid configuration)
    pub fn on_error(mut self, f: impl FnMut(&ConsentError) + 'static) -> Self {
        self.on_error = Some(Box::new(f));
        self
    }
}

impl fmt::Debug for ConsentCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConsentCallbacks")
            .field("on_consent_change", &self.on_consent_change.is_some())
            .field("on_banner_show", &self.on_banner_show.is_some())
            .field("on_banner_hide", &self.on_banner_hide.is_some())
            .field("on_error", &self.on_error.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_constructors() {
        let necessary = ConsentCategory::required("necessary", "Strictly necessary");
        assert!(necessary.required);
        assert!(necessary.default_value);

        let analytics = ConsentCategory::optional("analytics", "Analytics", false)
            .with_description("Usage measurement")
            .with_kind("analytics");
        assert!(!analytics.required);
        assert!(!analytics.default_value);
        assert_eq!(analytics.kind.as_deref(), Some("analytics"));
    }

    #[test]
    fn test_settings_defaults() {
        let settings = ConsentSettings::new(
            vec![ConsentCategory::required("necessary", "Necessary")],
            "1.0",
        );
        assert_eq!(settings.expiration_days, 365);
        assert_eq!(settings.storage_key, "consentry");
        assert_eq!(settings.auto_show_delay_ms, 0);
        assert!(!settings.respect_do_not_track);
    }

    #[test]
    fn test_settings_partial_json_applies_defaults() {
        let raw = r#"{
            "categories": [
                {"id": "necessary", "name": "Necessary", "description": "",
                 "required": true, "defaultValue": true}
            ],
            "version": "2.0"
        }"#;
        let settings: ConsentSettings = serde_json::from_str(raw).unwrap();
        assert_eq!(settings.version, "2.0");
        assert_eq!(settings.expiration_days, 365);
        assert_eq!(settings.storage_key, "consentry");
    }

    #[test]
    fn test_category_lookup() {
        let settings = ConsentSettings::new(
            vec![
                ConsentCategory::required("necessary", "Necessary"),
                ConsentCategory::optional("analytics", "Analytics", false),
            ],
            "1.0",
        );
        assert!(settings.category("analytics").is_some());
        assert!(settings.category("marketing").is_none());
    }

    #[test]
    fn test_callbacks_debug_shows_registration() {
        let callbacks = ConsentCallbacks::new().on_banner_show(|| {});
        let rendered = format!("{:?}", callbacks);
        assert!(rendered.contains("on_banner_show: true"));
        assert!(rendered.contains("on_consent_change: false"));
    }
}
