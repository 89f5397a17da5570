//! Payment Validators
//!
//! Card number (Luhn), expiry (MM/YY) and CVC checks, plus the composite
//! validator for the checkout's saved payment methods.

use kernel::FieldErrors;
use platform::clock::{Clock, SystemClock};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::LazyLock;

use super::rules::{validate_email, validate_name};
use super::{FormValues, field};

pub const CARD_MIN_DIGITS: usize = 13;
pub const CARD_MAX_DIGITS: usize = 19;

static EXPIRY: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^([0-9]{2})/([0-9]{2})$").ok());

static CVC: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"^[0-9]{3,4}$").ok());

static BIZUM_PHONE: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"^[0-9]{9}$").ok());

// ============================================================================
// Card fields
// ============================================================================

/// Luhn checksum over 13–19 digits; spaces and hyphens are ignored
pub fn validate_credit_card(number: &str) -> bool {
    let digits: Vec<u32> = number
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .map(|c| c.to_digit(10))
        .collect::<Option<Vec<_>>>()
        .unwrap_or_default();

    if !(CARD_MIN_DIGITS..=CARD_MAX_DIGITS).contains(&digits.len()) {
        return false;
    }

    let sum: u32 = digits
        .iter()
        .rev()
        .enumerate()
        .map(|(i, &d)| {
            if i % 2 == 1 {
                let doubled = d * 2;
                if doubled > 9 { doubled - 9 } else { doubled }
            } else {
                d
            }
        })
        .sum();
    sum % 10 == 0
}

/// `MM/YY` not before the current month, judged by the system clock
pub fn validate_expiry_date(expiry: &str) -> bool {
    validate_expiry_date_at(expiry, &SystemClock)
}

/// `MM/YY` not before the month reported by `clock`
///
/// A card expiring in the current month is still valid.
pub fn validate_expiry_date_at(expiry: &str, clock: &dyn Clock) -> bool {
    let Some(caps) = EXPIRY.as_ref().and_then(|re| re.captures(expiry)) else {
        return false;
    };
    let (Ok(month), Ok(year)) = (caps[1].parse::<u32>(), caps[2].parse::<u32>()) else {
        return false;
    };
    if !(1..=12).contains(&month) {
        return false;
    }

    let (current_month, current_year) = clock.month_and_short_year();
    !(year < current_year || (year == current_year && month < current_month))
}

/// Three or four digits
pub fn validate_cvc(cvc: &str) -> bool {
    CVC.as_ref().is_some_and(|re| re.is_match(cvc))
}

// ============================================================================
// Payment methods
// ============================================================================

/// Payment method offered at checkout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethodKind {
    Card,
    PayPal,
    Bizum,
}

impl PaymentMethodKind {
    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            PaymentMethodKind::Card => "card",
            PaymentMethodKind::PayPal => "paypal",
            PaymentMethodKind::Bizum => "bizum",
        }
    }

    /// Fields the method's form collects
    pub const fn fields(&self) -> &'static [&'static str] {
        match self {
            PaymentMethodKind::Card => &["number", "holder", "expiry", "cvc"],
            PaymentMethodKind::PayPal => &["email"],
            PaymentMethodKind::Bizum => &["phone"],
        }
    }
}

impl FromStr for PaymentMethodKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "card" | "tarjeta" => Ok(PaymentMethodKind::Card),
            "paypal" => Ok(PaymentMethodKind::PayPal),
            "bizum" => Ok(PaymentMethodKind::Bizum),
            _ => Err(()),
        }
    }
}

impl std::fmt::Display for PaymentMethodKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Validate a payment form identified by its method code
///
/// Unknown codes produce a single `method` error.
pub fn validate_payment_method(kind: &str, values: &FormValues) -> FieldErrors {
    validate_payment_method_at(kind, values, &SystemClock)
}

pub fn validate_payment_method_at(
    kind: &str,
    values: &FormValues,
    clock: &dyn Clock,
) -> FieldErrors {
    match kind.parse::<PaymentMethodKind>() {
        Ok(kind) => validate_payment(kind, values, clock),
        Err(()) => {
            let mut errors = FieldErrors::new();
            errors.insert("method", "Select a valid payment method");
            errors
        }
    }
}

/// Validate the fields of a known payment method
pub fn validate_payment(
    kind: PaymentMethodKind,
    values: &FormValues,
    clock: &dyn Clock,
) -> FieldErrors {
    let mut errors = FieldErrors::new();
    match kind {
        PaymentMethodKind::Card => {
            let number = field(values, "number");
            if number.is_empty() {
                errors.insert_first("number", "Card number is required");
            } else if !validate_credit_card(number) {
                errors.insert_first("number", "Card number is not valid");
            }

            let holder = field(values, "holder");
            if holder.is_empty() {
                errors.insert_first("holder", "Cardholder name is required");
            } else if let Some(rule) = validate_name(holder) {
                errors.insert_first("holder", rule.to_string());
            }

            let expiry = field(values, "expiry");
            if expiry.is_empty() {
                errors.insert_first("expiry", "Expiry date is required");
            } else if !validate_expiry_date_at(expiry, clock) {
                errors.insert_first("expiry", "Expiry date must be a future MM/YY date");
            }

            let cvc = field(values, "cvc");
            if cvc.is_empty() {
                errors.insert_first("cvc", "CVC is required");
            } else if !validate_cvc(cvc) {
                errors.insert_first("cvc", "CVC must be 3 or 4 digits");
            }
        }
        PaymentMethodKind::PayPal => {
            let email = field(values, "email");
            if email.is_empty() {
                errors.insert_first("email", "PayPal email is required");
            } else if !validate_email(email) {
                errors.insert_first("email", "PayPal email is not valid");
            }
        }
        PaymentMethodKind::Bizum => {
            let phone = field(values, "phone");
            if phone.is_empty() {
                errors.insert_first("phone", "Phone number is required");
            } else if !BIZUM_PHONE.as_ref().is_some_and(|re| re.is_match(phone)) {
                errors.insert_first("phone", "Phone number must have 9 digits");
            }
        }
    }
    errors
}
