//! Host configuration for consentry
//!
//! The host supplies the category list, the configuration version, the
//! expiration window, and the banner policy knobs. Configuration is consumed,
//! never produced, by the consent core, and is validated once at controller
//! initialization.

mod errors;
mod types;
mod validator;

pub use errors::{ConfigError, ConfigResult};
pub use types::{ConsentCallbacks, ConsentCategory, ConsentSettings, HostEnvironment};
pub use validator::{dedupe_categories, validate_settings};
