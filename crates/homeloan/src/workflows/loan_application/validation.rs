use chrono::NaiveDate;
use serde::Serialize;

use super::formatting::{
    format_aadhaar, format_pan, format_phone, strip_separators, AADHAAR_DIGITS, PAN_LENGTH,
    PHONE_DIGITS,
};

/// Advisory state of a single field. `Incomplete` is never flagged inline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationStatus {
    Incomplete,
    Valid,
    Invalid,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldValidation {
    pub status: ValidationStatus,
    pub normalized: String,
}

impl FieldValidation {
    fn new(status: ValidationStatus, normalized: String) -> Self {
        Self { status, normalized }
    }

    pub fn is_valid(&self) -> bool {
        self.status == ValidationStatus::Valid
    }

    pub fn is_invalid(&self) -> bool {
        self.status == ValidationStatus::Invalid
    }
}

/// `[A-Z]{5}[0-9]{4}[A-Z]`, checked once ten characters are present.
pub fn validate_pan(input: &str) -> FieldValidation {
    let trimmed = input.trim();
    let normalized = format_pan(trimmed);
    if trimmed.chars().count() < PAN_LENGTH {
        return FieldValidation::new(ValidationStatus::Incomplete, normalized);
    }

    let status = if is_pan_shaped(trimmed) {
        ValidationStatus::Valid
    } else {
        ValidationStatus::Invalid
    };
    FieldValidation::new(status, normalized)
}

fn is_pan_shaped(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() == PAN_LENGTH
        && bytes[..5].iter().all(u8::is_ascii_uppercase)
        && bytes[5..9].iter().all(u8::is_ascii_digit)
        && bytes[9].is_ascii_uppercase()
}

/// Twelve digits once group separators are stripped.
pub fn validate_aadhaar(input: &str) -> FieldValidation {
    let stripped = strip_separators(input);
    let status = if !stripped.chars().all(|ch| ch.is_ascii_digit()) {
        ValidationStatus::Invalid
    } else if stripped.len() < AADHAAR_DIGITS {
        ValidationStatus::Incomplete
    } else if stripped.len() == AADHAAR_DIGITS {
        ValidationStatus::Valid
    } else {
        ValidationStatus::Invalid
    };

    let normalized = if status == ValidationStatus::Invalid {
        input.trim().to_string()
    } else {
        format_aadhaar(&stripped)
    };
    FieldValidation::new(status, normalized)
}

/// `DD/MM/YYYY`, a real calendar date, not after `today`.
pub fn validate_date_of_birth(input: &str, today: NaiveDate) -> FieldValidation {
    let trimmed = input.trim();
    if trimmed.len() < 10 {
        return FieldValidation::new(ValidationStatus::Incomplete, trimmed.to_string());
    }

    let status = match parse_date_of_birth(trimmed) {
        Some(date) if date <= today => ValidationStatus::Valid,
        _ => ValidationStatus::Invalid,
    };
    FieldValidation::new(status, trimmed.to_string())
}

pub fn parse_date_of_birth(input: &str) -> Option<NaiveDate> {
    let trimmed = input.trim();
    if trimmed.len() != 10 {
        return None;
    }
    NaiveDate::parse_from_str(trimmed, "%d/%m/%Y").ok()
}

pub fn validate_phone(input: &str) -> FieldValidation {
    let has_foreign = input
        .chars()
        .any(|ch| !(ch.is_ascii_digit() || ch.is_whitespace() || ch == '-'));
    let normalized = format_phone(input);
    let digit_count = input.chars().filter(char::is_ascii_digit).count();

    let status = if has_foreign || digit_count > PHONE_DIGITS {
        ValidationStatus::Invalid
    } else if digit_count < PHONE_DIGITS {
        ValidationStatus::Incomplete
    } else {
        ValidationStatus::Valid
    };
    FieldValidation::new(status, normalized)
}

pub fn validate_email(input: &str) -> FieldValidation {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return FieldValidation::new(ValidationStatus::Incomplete, String::new());
    }

    let valid = match trimmed.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain
                    .split_once('.')
                    .map(|(host, tld)| !host.is_empty() && !tld.is_empty())
                    .unwrap_or(false)
                && !trimmed.chars().any(char::is_whitespace)
        }
        None => false,
    };
    let status = if valid {
        ValidationStatus::Valid
    } else {
        ValidationStatus::Invalid
    };
    FieldValidation::new(status, trimmed.to_ascii_lowercase())
}

/// GSTIN: two-digit state code, embedded PAN, entity digit, `Z`, checksum character.
pub fn validate_gst(input: &str) -> FieldValidation {
    let normalized: String = input
        .trim()
        .chars()
        .map(|ch| ch.to_ascii_uppercase())
        .collect();
    if normalized.len() < 15 {
        return FieldValidation::new(ValidationStatus::Incomplete, normalized);
    }

    let bytes = normalized.as_bytes();
    let valid = bytes.len() == 15
        && bytes.iter().all(u8::is_ascii_alphanumeric)
        && bytes[..2].iter().all(u8::is_ascii_digit)
        && is_pan_shaped(&normalized[2..12])
        && bytes[12].is_ascii_alphanumeric()
        && bytes[13] == b'Z';
    let status = if valid {
        ValidationStatus::Valid
    } else {
        ValidationStatus::Invalid
    };
    FieldValidation::new(status, normalized)
}
