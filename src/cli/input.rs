//! Input normalization for shell commands.
//!
//! The store does not validate field contents; these helpers are where empty
//! names, phone numbers, and queries are rejected.

use crate::{Error, Result};

/// Trims `value` and rejects it if nothing is left.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] naming `field` when the value is blank.
pub fn required(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidInput(format!("{field} cannot be empty")));
    }
    Ok(trimmed.to_string())
}

/// Trims an optional value; blank means "keep the current value".
#[must_use]
pub fn keep_if_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Trims an optional email; absent means empty.
#[must_use]
pub fn email(value: Option<&str>) -> String {
    value.map(str::trim).unwrap_or_default().to_string()
}
