//! Shared Kernel - Vocabulary shared by every client crate
//!
//! This crate contains the "smallest core" of the storefront client:
//! - Common error types and result aliases
//! - The field-error mapping consumed by presentation layers
//! - Notification identifiers
//!
//! **Design Principle**: Only include things that are "hard to change"
//! and have consistent meaning across all features.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
pub mod field_errors;
pub mod id;

pub use field_errors::FieldErrors;
