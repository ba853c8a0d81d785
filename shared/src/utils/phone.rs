//! Phone number utilities

use once_cell::sync::Lazy;
use regex::Regex;

// International phone number, optional leading '+' (E.164 digits)
static PHONE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\+?[1-9]\d{1,14}$").expect("phone number pattern is valid")
});

/// Normalize a phone number by removing common formatting characters
pub fn normalize_phone_number(phone: &str) -> String {
    phone
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .collect()
}

/// Canonical form used to key pending codes: digits only behind a single
/// leading `+`, so `911234567890`, `+91 12345-67890` and `+911234567890`
/// name the same handset. Returns an empty string when no digits remain.
pub fn canonical_phone_number(phone: &str) -> String {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        digits
    } else {
        format!("+{}", digits)
    }
}

/// Check if a phone number is acceptable for OTP delivery.
///
/// Accepts E.164 numbers with or without the leading `+`; spaces, dashes,
/// dots and parentheses are ignored. Letters are never accepted.
pub fn is_valid_phone(phone: &str) -> bool {
    let trimmed = phone.trim();
    if trimmed
        .chars()
        .any(|c| !(c.is_ascii_digit() || matches!(c, '+' | ' ' | '-' | '.' | '(' | ')')))
    {
        return false;
    }
    PHONE_REGEX.is_match(&normalize_phone_number(trimmed))
}

/// Mask a phone number for logging, keeping only the last four digits
///
/// `+911234567890` becomes `+********7890`.
pub fn mask_phone_number(phone: &str) -> String {
    let len = phone.chars().count();
    if len <= 4 {
        return "*".repeat(len);
    }

    let last_digits: String = phone.chars().skip(len - 4).collect();
    if let Some(rest) = phone.strip_prefix('+') {
        format!("+{}{}", "*".repeat(rest.chars().count() - 4), last_digits)
    } else {
        format!("{}{}", "*".repeat(len - 4), last_digits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_phone_number() {
        assert_eq!(normalize_phone_number("+91 12345-67890"), "+911234567890");
        assert_eq!(normalize_phone_number("(415) 555-2671"), "4155552671");
    }

    #[test]
    fn test_canonical_phone_number() {
        assert_eq!(canonical_phone_number("911234567890"), "+911234567890");
        assert_eq!(canonical_phone_number("+911234567890"), "+911234567890");
        assert_eq!(canonical_phone_number(" +91 (123) 456-7890 "), "+911234567890");
        assert_eq!(canonical_phone_number("++911234567890"), "+911234567890");
        assert_eq!(canonical_phone_number("+"), "");
        assert_eq!(canonical_phone_number("   "), "");
    }

    #[test]
    fn test_is_valid_phone() {
        assert!(is_valid_phone("+911234567890"));
        assert!(is_valid_phone("911234567890"));
        assert!(is_valid_phone("+1 (415) 555-2671"));

        assert!(!is_valid_phone(""));
        assert!(!is_valid_phone("+0123456789")); // leading zero
        assert!(!is_valid_phone("+1234567890123456")); // 16 digits
        assert!(!is_valid_phone("+12abc34567"));
        assert!(!is_valid_phone("+"));
    }

    #[test]
    fn test_mask_phone_number() {
        assert_eq!(mask_phone_number("+911234567890"), "+********7890");
        assert_eq!(mask_phone_number("1234567890"), "******7890");
        assert_eq!(mask_phone_number("1234"), "****");
        assert_eq!(mask_phone_number("12"), "**");
    }
}
