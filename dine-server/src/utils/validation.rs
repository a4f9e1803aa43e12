//! Input validation helpers
//!
//! Centralized text length constants and validation functions.
//! SQLite TEXT has no built-in length enforcement, so limits live here.

use validator::ValidationErrors;

use crate::utils::AppError;

// ── Text length limits ──────────────────────────────────────────────

/// Entity names: dish, category, table number, tax, event title
pub const MAX_NAME_LEN: usize = 200;

/// Descriptions
pub const MAX_NOTE_LEN: usize = 1000;

/// Phone numbers, GSTIN, cuisine type
pub const MAX_SHORT_TEXT_LEN: usize = 32;

/// URLs / image paths
pub const MAX_URL_LEN: usize = 2048;

/// Maximum price per dish
pub const MAX_PRICE: f64 = 1_000_000.0;

/// Maximum quantity per line item
pub const MAX_QUANTITY: i32 = 999;

/// Maximum line items per order
pub const MAX_ITEMS_PER_ORDER: usize = 100;

// ── Validation helpers (CRUD handlers) ──────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
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
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.len()
        )));
    }
    Ok(())
}

/// Validate a money amount: finite, non-negative, below `max`.
pub fn validate_amount(value: f64, field: &str, max: f64) -> Result<(), AppError> {
    if !value.is_finite() {
        return Err(AppError::validation(format!(
            "{field} must be a finite number"
        )));
    }
    if value < 0.0 {
        return Err(AppError::validation(format!(
            "{field} must be non-negative, got {value}"
        )));
    }
    if value > max {
        return Err(AppError::validation(format!(
            "{field} exceeds maximum allowed ({max}), got {value}"
        )));
    }
    Ok(())
}

/// Validate a phone number: 7-15 digits, optional leading `+`, separators allowed.
pub fn validate_phone(value: &str, field: &str) -> Result<(), AppError> {
    let normalized = shared::models::normalize_phone(value);
    let digits = normalized.trim_start_matches('+');
    let only_allowed = value
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | ' ' | '-'));
    if !only_allowed || digits.len() < 7 || digits.len() > 15 || digits.contains('+') {
        return Err(AppError::with_message(
            shared::ErrorCode::InvalidFormat,
            format!("{field} is not a valid phone number"),
        )
        .with_detail("field", field));
    }
    Ok(())
}

/// Convert `validator` derive errors into a single validation error
pub fn from_validation_errors(errors: ValidationErrors) -> AppError {
    let fields: Vec<String> = errors
        .field_errors()
        .keys()
        .map(|k| k.to_string())
        .collect();
    AppError::validation(format!("Invalid request: {}", fields.join(", ")))
        .with_detail("fields", fields)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_text() {
        assert!(validate_required_text("T5", "number", MAX_NAME_LEN).is_ok());
        assert!(validate_required_text("   ", "number", MAX_NAME_LEN).is_err());
        assert!(validate_required_text(&"x".repeat(201), "name", MAX_NAME_LEN).is_err());
    }

    #[test]
    fn test_amount() {
        assert!(validate_amount(850.0, "price", MAX_PRICE).is_ok());
        assert!(validate_amount(0.0, "price", MAX_PRICE).is_ok());
        assert!(validate_amount(-1.0, "price", MAX_PRICE).is_err());
        assert!(validate_amount(f64::NAN, "price", MAX_PRICE).is_err());
        assert!(validate_amount(2_000_000.0, "price", MAX_PRICE).is_err());
    }

    #[test]
    fn test_phone() {
        assert!(validate_phone("9845012345", "phone").is_ok());
        assert!(validate_phone("+91 98450-12345", "phone").is_ok());
        assert!(validate_phone("12345", "phone").is_err());
        assert!(validate_phone("98450abc45", "phone").is_err());
        assert!(validate_phone("98+4501234", "phone").is_err());
    }
}
