//! Configuration validation
//!
//! Validation is deterministic and runs once, at controller initialization.
//! A rejected configuration never aborts the controller: the caller surfaces
//! the error and continues with the deduplicated category list.

use std::collections::HashSet;

use super::errors::{ConfigError, ConfigResult};
use super::types::ConsentSettings;
use crate::config::ConsentCategory;

/// Validates host settings.
///
/// # Errors
///
/// - `ConfigError::EmptyCategories` when no categories are configured
/// - `ConfigError::DuplicateCategoryId` on the first repeated id
pub fn validate_settings(settings: &ConsentSettings) -> ConfigResult<()> {
    if settings.categories.is_empty() {
        return Err(ConfigError::EmptyCategories);
    }

    let mut seen = HashSet::new();
    for category in &settings.categories {
        if !seen.insert(category.id.as_str()) {
            return Err(ConfigError::DuplicateCategoryId(category.id.clone()));
        }
    }

    Ok(())
}

/// Returns the category list with duplicate ids removed, first occurrence
/// winning. This is the fallback list used after a failed validation.
pub fn dedupe_categories(categories: &[ConsentCategory]) -> Vec<ConsentCategory> {
    let mut seen = HashSet::new();
    categories
        .iter()
        .filter(|c| seen.insert(c.id.clone()))
        .cloned()
        .collect()
}
