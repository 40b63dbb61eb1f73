//! Input validation helpers
//!
//! Centralized text length constants and validation functions.
//! Validation happens synchronously before any persistence call, so a
//! rejected input is never partially applied.

use shared::CoreError;

// ── Text length limits ──────────────────────────────────────────────

/// Entity names: client, product, material
pub const MAX_NAME_LEN: usize = 200;

/// Observations / descriptions
pub const MAX_NOTE_LEN: usize = 500;

/// Short identifiers: phone, contact handles
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Addresses
pub const MAX_ADDRESS_LEN: usize = 500;

/// Image URLs
pub const MAX_URL_LEN: usize = 2048;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::validation(format!("{field} must not be empty")));
    }
    if value.len() > max_len {
        return Err(CoreError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), CoreError> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(CoreError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.len()
        )));
    }
    Ok(())
}
