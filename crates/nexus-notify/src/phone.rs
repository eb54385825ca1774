//! Phone number validation for WhatsApp recipients.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::{NotifyError, Result};

/// Message returned when the country code is missing.
pub const MISSING_COUNTRY_CODE: &str = "Phone number must start with country code e.g., +91";

static E164: OnceLock<Regex> = OnceLock::new();

fn e164() -> &'static Regex {
    E164.get_or_init(|| Regex::new(r"^\+[1-9][0-9]{6,14}$").expect("valid E.164 pattern"))
}

/// Validate an E.164 phone number, returning it trimmed.
pub fn validate_phone(phone: &str) -> Result<String> {
    let phone = phone.trim();

    if !phone.starts_with('+') {
        return Err(NotifyError::InvalidRecipient(MISSING_COUNTRY_CODE.to_string()));
    }

    if !e164().is_match(phone) {
        return Err(NotifyError::InvalidRecipient(format!(
            "Phone number must be + followed by 7 to 15 digits, got {}",
            phone
        )));
    }

    Ok(phone.to_string())
}
