//! Field-level checks shared by every record type.

use std::sync::LazyLock;

use regex::Regex;

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s.]+$").unwrap());

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    Required { field: &'static str },

    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },

    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: &'static str, min: i64, max: i64 },

    #[error("{field} is not a valid email address")]
    InvalidEmail { field: &'static str },

    #[error("{field} must be a non-negative amount with at most 2 decimals")]
    InvalidPrice { field: &'static str },
}

/// Non-empty (after trimming) and within `max` characters.
pub fn required(field: &'static str, value: &str, max: usize) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required { field });
    }
    max_len(field, value, max)
}

pub fn max_len(field: &'static str, value: &str, max: usize) -> Result<(), ValidationError> {
    if value.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(())
}

pub fn in_range(field: &'static str, value: i64, min: i64, max: i64) -> Result<(), ValidationError> {
    if value < min || value > max {
        return Err(ValidationError::OutOfRange { field, min, max });
    }
    Ok(())
}

/// Blank is accepted only when `allow_blank` is set.
pub fn email(field: &'static str, value: &str, allow_blank: bool) -> Result<(), ValidationError> {
    if value.is_empty() {
        return if allow_blank {
            Ok(())
        } else {
            Err(ValidationError::Required { field })
        };
    }
    max_len(field, value, 254)?;
    if !EMAIL_PATTERN.is_match(value) {
        return Err(ValidationError::InvalidEmail { field });
    }
    Ok(())
}

/// Price column is DECIMAL(10, 2) in spirit: 8 integer digits, 2 decimals.
pub fn price(field: &'static str, value: f64) -> Result<(), ValidationError> {
    let cents = value * 100.0;
    if !value.is_finite() || value < 0.0 || value > 99_999_999.99 || (cents - cents.round()).abs() > 1e-6 {
        return Err(ValidationError::InvalidPrice { field });
    }
    Ok(())
}
