//! Input validation helpers
//!
//! Centralized text length constants and validation functions for the
//! dashboard create payloads.

use shared::error::AppError;

// ── Text length limits ──────────────────────────────────────────────

/// Names and titles: team member, project, course, module
pub const MAX_NAME_LEN: usize = 200;

/// Roles, student names, slugs
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Bios, project descriptions
pub const MAX_NOTE_LEN: usize = 2000;

/// Photo URLs, project links
pub const MAX_URL_LEN: usize = 2048;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty"))
            .with_detail("field", field));
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        ))
        .with_detail("field", field));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.len()
        ))
        .with_detail("field", field));
    }
    Ok(())
}

/// Validate a URL-safe slug: lowercase ASCII letters, digits and single dashes.
pub fn validate_slug(value: &str, field: &str) -> Result<(), AppError> {
    validate_required_text(value, field, MAX_SHORT_TEXT_LEN)?;
    let valid = value
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        && !value.starts_with('-')
        && !value.ends_with('-')
        && !value.contains("--");
    if !valid {
        return Err(AppError::validation(format!(
            "{field} must contain only lowercase letters, digits and dashes"
        ))
        .with_detail("field", field));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_text() {
        assert!(validate_required_text("Ada", "name", MAX_NAME_LEN).is_ok());
        assert!(validate_required_text("   ", "name", MAX_NAME_LEN).is_err());
        assert!(validate_required_text(&"x".repeat(201), "name", MAX_NAME_LEN).is_err());
    }

    #[test]
    fn test_optional_text() {
        assert!(validate_optional_text(&None, "bio", MAX_NOTE_LEN).is_ok());
        assert!(validate_optional_text(&Some("short".into()), "bio", MAX_NOTE_LEN).is_ok());
        assert!(validate_optional_text(&Some("x".repeat(2001)), "bio", MAX_NOTE_LEN).is_err());
    }

    #[test]
    fn test_slug() {
        assert!(validate_slug("intro-to-rust", "slug").is_ok());
        assert!(validate_slug("rust2024", "slug").is_ok());
        assert!(validate_slug("Intro", "slug").is_err());
        assert!(validate_slug("-rust", "slug").is_err());
        assert!(validate_slug("a--b", "slug").is_err());
        assert!(validate_slug("", "slug").is_err());
    }
}
