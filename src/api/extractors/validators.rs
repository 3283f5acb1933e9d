//! Custom field validators used by request DTOs.
//!
//! Every validator accepts the empty string: presence is checked separately
//! with `length(min = 1)` where a field is required.

use once_cell::sync::Lazy;
use regex::Regex;
use uuid::Uuid;
use validator::{ValidateEmail, ValidationError};

use crate::config::{ORDERABLE_FIELDS, SORT_DIRECTIONS, UNSAFE_TEXT_PATTERN};

static SAFE_TEXT: Lazy<Regex> =
    Lazy::new(|| Regex::new(UNSAFE_TEXT_PATTERN).expect("unsafe text pattern is a valid regex"));

/// Rejects quotes, brackets, angle brackets and braces.
pub fn validate_safe_text(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || SAFE_TEXT.is_match(value) {
        Ok(())
    } else {
        Err(ValidationError::new("unsafe_characters"))
    }
}

pub fn validate_digits(value: &str) -> Result<(), ValidationError> {
    if value.chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        Err(ValidationError::new("digits"))
    }
}

pub fn validate_order_by(value: &str) -> Result<(), ValidationError> {
    one_of(value, ORDERABLE_FIELDS)
}

pub fn validate_sort_by(value: &str) -> Result<(), ValidationError> {
    one_of(value, SORT_DIRECTIONS)
}

pub fn validate_bool(value: &str) -> Result<(), ValidationError> {
    one_of(value, &["true", "false"])
}

pub fn validate_uuid(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || Uuid::parse_str(value).is_ok() {
        Ok(())
    } else {
        Err(ValidationError::new("uuid"))
    }
}

/// Every entry must be a well-formed address.
pub fn validate_email_list(emails: &[String]) -> Result<(), ValidationError> {
    if emails.iter().all(|email| email.validate_email()) {
        Ok(())
    } else {
        Err(ValidationError::new("email"))
    }
}

fn one_of(value: &str, allowed: &[&str]) -> Result<(), ValidationError> {
    if value.is_empty() || allowed.contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::new("one_of"))
    }
}
