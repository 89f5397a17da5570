//! Field Rules
//!
//! Single-field validators shared by every form.
//!
//! ## Password policy
//! - At least [`PASSWORD_MIN_LENGTH`] characters
//! - At least one uppercase letter, one lowercase letter and one digit
//! - At least one of [`PASSWORD_SPECIAL_CHARS`]
//!
//! ## Name policy
//! - Required, [`NAME_MIN_LENGTH`]..=[`NAME_MAX_LENGTH`] characters

use derive_more::Display;
use regex::Regex;
use std::sync::LazyLock;

// ============================================================================
// Constants
// ============================================================================

pub const PASSWORD_MIN_LENGTH: usize = 8;

/// Characters that satisfy the "special character" password rule
pub const PASSWORD_SPECIAL_CHARS: &str = "!@#$%^&*(),.?\":{}|<>";

pub const NAME_MIN_LENGTH: usize = 2;
pub const NAME_MAX_LENGTH: usize = 50;

const BYTES_PER_MIB: f64 = 1024.0 * 1024.0;

static EMAIL: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").ok());

static PHONE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9\s-]{9,15}$").ok());

fn matches(re: &LazyLock<Option<Regex>>, value: &str) -> bool {
    re.as_ref().is_some_and(|re| re.is_match(value))
}

// ============================================================================
// Email
// ============================================================================

/// `local@domain.tld` with no whitespace and a single `@`
pub fn validate_email(email: &str) -> bool {
    matches(&EMAIL, email)
}

// ============================================================================
// Password
// ============================================================================

/// A password rule that was not met
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum PasswordRule {
    #[display("Password must be at least 8 characters")]
    MinLength,
    #[display("Password must contain at least one uppercase letter")]
    Uppercase,
    #[display("Password must contain at least one lowercase letter")]
    Lowercase,
    #[display("Password must contain at least one number")]
    Digit,
    #[display("Password must contain at least one special character")]
    SpecialChar,
}

/// Every unmet rule, in policy order. Empty means the password is acceptable.
pub fn validate_password(password: &str) -> Vec<PasswordRule> {
    let mut unmet = Vec::new();
    if password.chars().count() < PASSWORD_MIN_LENGTH {
        unmet.push(PasswordRule::MinLength);
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        unmet.push(PasswordRule::Uppercase);
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        unmet.push(PasswordRule::Lowercase);
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        unmet.push(PasswordRule::Digit);
    }
    if !password.chars().any(|c| PASSWORD_SPECIAL_CHARS.contains(c)) {
        unmet.push(PasswordRule::SpecialChar);
    }
    unmet
}

// ============================================================================
// Name
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum NameRule {
    #[display("Name is required")]
    Required,
    #[display("Name must be at least 2 characters")]
    TooShort,
    #[display("Name cannot be longer than 50 characters")]
    TooLong,
}

/// First violated name rule, if any
pub fn validate_name(name: &str) -> Option<NameRule> {
    let length = name.chars().count();
    if length == 0 {
        Some(NameRule::Required)
    } else if length < NAME_MIN_LENGTH {
        Some(NameRule::TooShort)
    } else if length > NAME_MAX_LENGTH {
        Some(NameRule::TooLong)
    } else {
        None
    }
}

// ============================================================================
// Numbers, URLs, phones
// ============================================================================

/// Parse a user-typed decimal number
///
/// Blank or non-finite input is not a number.
pub fn parse_number(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// `true` if `value` is a number within `min..=max`
pub fn validate_number(value: &str, min: f64, max: f64) -> bool {
    parse_number(value).is_some_and(|n| n >= min && n <= max)
}

/// Absolute URL with a scheme
pub fn validate_url(value: &str) -> bool {
    url::Url::parse(value).is_ok()
}

/// Optional leading `+`, then 9–15 digits, spaces or hyphens
pub fn validate_phone(phone: &str) -> bool {
    matches(&PHONE, phone)
}

// ============================================================================
// Files
// ============================================================================

/// MIME type is one of `allowed`
pub fn validate_file_type(mime: &str, allowed: &[&str]) -> bool {
    allowed.iter().any(|a| a.eq_ignore_ascii_case(mime))
}

/// Size in bytes does not exceed `max_mb` mebibytes
pub fn validate_file_size(size_bytes: u64, max_mb: f64) -> bool {
    size_bytes as f64 <= max_mb * BYTES_PER_MIB
}
