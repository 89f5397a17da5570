//! Domain Layer
//!
//! Pure validation rules. No I/O, no clocks except through
//! [`platform::clock::Clock`].

pub mod account;
pub mod catalog;
pub mod payment;
pub mod rules;

use std::collections::BTreeMap;

/// Field name → current (sanitized) value
pub type FormValues = BTreeMap<String, String>;

/// Trimmed value of a field, empty when missing
pub(crate) fn field<'a>(values: &'a FormValues, name: &str) -> &'a str {
    values.get(name).map_or("", |v| v.trim())
}
