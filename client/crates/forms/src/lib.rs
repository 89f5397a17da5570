//! Forms Module
//!
//! Clean Architecture structure:
//! - `domain/` - Pure field rules and composite validators
//! - `application/` - The form controller and its configuration
//!
//! ## Features
//! - Field validators (email, password, name, number, URL, phone, files)
//! - Payment validators (Luhn card check, MM/YY expiry, CVC)
//! - Composite validators for account, payment, product and article forms
//! - A form controller that sanitizes input, validates on blur and submit,
//!   and rate-limits submissions (5 per minute by default)
//!
//! Validators never fail: an invalid value yields `false`, a rule list, or a
//! [`FieldErrors`] entry.

pub mod application;
pub mod domain;
pub mod error;

// Re-exports for convenience
pub use application::config::FormConfig;
pub use application::controller::{FormController, FormState, SubmitHandler};
pub use domain::FormValues;
pub use error::{FormError, FormResult};

// Re-export kernel types used in every signature
pub use kernel::FieldErrors;
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

pub mod validators {
    pub use crate::domain::account::*;
    pub use crate::domain::catalog::*;
    pub use crate::domain::payment::*;
    pub use crate::domain::rules::*;
}
