//! Input validation utilities.
//!
//! Console input is free text. These helpers turn it into the values the store
//! accepts, reporting `ClinicError::MalformedInput` for anything unusable.

use crate::{ClinicError, ClinicResult};

/// Trims `value` and rejects it if nothing is left.
///
/// # Arguments
///
/// * `label` - Human-readable field name used in the error message.
/// * `value` - Raw operator input.
///
/// # Errors
///
/// Returns `ClinicError::MalformedInput` if the trimmed value is empty.
pub fn require_field(label: &str, value: &str) -> ClinicResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ClinicError::MalformedInput(format!("{label} is required")));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_field_trims() {
        assert_eq!(require_field("name", "  Ana  ").unwrap(), "Ana");
    }

    #[test]
    fn test_require_field_rejects_blank() {
        let err = require_field("doctor id", " \t ").unwrap_err();
        assert!(matches!(err, ClinicError::MalformedInput(ref m) if m == "doctor id is required"));
    }
}
