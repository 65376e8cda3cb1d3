//! Input validators shared by the engines.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::CoreError;

/// Maximum length for names and titles.
pub const MAX_NAME_LEN: usize = 200;

/// Maximum length for incident update messages and descriptions.
pub const MAX_TEXT_LEN: usize = 10_000;

/// Maximum length for an organization slug (one DNS label).
pub const MAX_SLUG_LEN: usize = 63;

const SLUG_PATTERN: &str = r"^[a-z0-9]+(?:-[a-z0-9]+)*$";

static SLUG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(SLUG_PATTERN).expect("valid regex"));

/// Trim `value` and require it to be non-empty and at most `max_len` chars.
///
/// Returns the trimmed value.
pub fn require_text(field: &str, value: &str, max_len: usize) -> Result<String, CoreError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(format!("{field} must not be empty")));
    }
    if trimmed.chars().count() > max_len {
        return Err(CoreError::Validation(format!(
            "{field} must be at most {max_len} characters"
        )));
    }
    Ok(trimmed.to_string())
}

/// Like [`require_text`] but an empty value is allowed.
pub fn optional_text(field: &str, value: &str, max_len: usize) -> Result<String, CoreError> {
    let trimmed = value.trim();
    if trimmed.chars().count() > max_len {
        return Err(CoreError::Validation(format!(
            "{field} must be at most {max_len} characters"
        )));
    }
    Ok(trimmed.to_string())
}

/// Validate a public organization slug (lowercase, digits, single hyphens).
pub fn validate_slug(slug: &str) -> Result<(), CoreError> {
    if slug.len() > MAX_SLUG_LEN || !SLUG_RE.is_match(slug) {
        return Err(CoreError::Validation(format!(
            "Invalid slug '{slug}': use lowercase letters, digits and single hyphens \
             (max {MAX_SLUG_LEN} characters)"
        )));
    }
    Ok(())
}
