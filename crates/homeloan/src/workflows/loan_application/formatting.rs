//! Keystroke formatters producing the canonical display form of identity fields.

pub const PAN_LENGTH: usize = 10;
pub const AADHAAR_DIGITS: usize = 12;
pub const PHONE_DIGITS: usize = 10;
const DATE_DIGITS: usize = 8;

/// Uppercase alphanumerics, at most ten characters.
pub fn format_pan(raw: &str) -> String {
    raw.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|ch| ch.to_ascii_uppercase())
        .take(PAN_LENGTH)
        .collect()
}

/// Digits only, at most twelve, grouped in fours: `1234 5678 9012`.
pub fn format_aadhaar(raw: &str) -> String {
    let digits: Vec<char> = raw
        .chars()
        .filter(char::is_ascii_digit)
        .take(AADHAAR_DIGITS)
        .collect();

    digits
        .chunks(4)
        .map(|group| group.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Removes the group separators used by [`format_aadhaar`].
pub fn strip_separators(value: &str) -> String {
    value
        .chars()
        .filter(|ch| !ch.is_whitespace() && *ch != '-')
        .collect()
}

/// Slash-delimited `DD/MM/YYYY` built from the digits typed so far.
pub fn format_date_input(raw: &str) -> String {
    let digits: Vec<char> = raw
        .chars()
        .filter(char::is_ascii_digit)
        .take(DATE_DIGITS)
        .collect();

    let mut formatted = String::with_capacity(DATE_DIGITS + 2);
    for (index, digit) in digits.into_iter().enumerate() {
        if index == 2 || index == 4 {
            formatted.push('/');
        }
        formatted.push(digit);
    }
    formatted
}

pub fn format_phone(raw: &str) -> String {
    raw.chars()
        .filter(char::is_ascii_digit)
        .take(PHONE_DIGITS)
        .collect()
}

/// Digits only; used for amounts, incomes and year counts.
pub fn format_amount(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

/// Uppercase alphanumerics for GSTIN entry.
pub fn format_gst(raw: &str) -> String {
    raw.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|ch| ch.to_ascii_uppercase())
        .take(15)
        .collect()
}
