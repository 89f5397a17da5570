//! Form Error Types
//!
//! Outcome of a rejected submission. Every variant is recoverable and is
//! already reflected in the controller's `errors` when it is returned.

use kernel::FieldErrors;
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Forms-specific result type alias
pub type FormResult<T> = Result<T, FormError>;

#[derive(Debug, Error)]
pub enum FormError {
    /// Too many submissions inside the rate-limit window
    #[error("Too many attempts. Please wait a moment.")]
    RateLimited,

    /// One or more fields failed validation
    #[error("{} field(s) need attention", .0.len())]
    Invalid(FieldErrors),

    /// The submit callback failed
    #[error("{0}")]
    Submission(String),
}

impl FormError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            FormError::RateLimited => ErrorKind::RateLimited,
            FormError::Invalid(_) => ErrorKind::Validation,
            FormError::Submission(_) => ErrorKind::Submission,
        }
    }

    /// Errors as shown next to fields or the submit button
    pub fn field_errors(&self) -> FieldErrors {
        match self {
            FormError::Invalid(errors) => errors.clone(),
            other => FieldErrors::submit(other.to_string()),
        }
    }

    pub fn to_app_error(&self) -> AppError {
        let err = AppError::new(self.kind(), self.to_string());
        match self {
            FormError::RateLimited => err.with_action("Wait a minute before trying again"),
            FormError::Invalid(_) => err.with_action("Correct the highlighted fields"),
            FormError::Submission(_) => err,
        }
    }

    /// Log the error with appropriate level
    pub(crate) fn log(&self) {
        match self {
            FormError::RateLimited => {
                tracing::warn!("Form submission rate limited");
            }
            FormError::Invalid(errors) => {
                tracing::debug!(fields = ?errors.fields().collect::<Vec<_>>(), "Form invalid");
            }
            FormError::Submission(message) => {
                tracing::warn!(message = %message, "Form submission failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        assert_eq!(FormError::RateLimited.kind(), ErrorKind::RateLimited);
        assert_eq!(
            FormError::Invalid(FieldErrors::new()).kind(),
            ErrorKind::Validation
        );
        assert_eq!(
            FormError::Submission("x".into()).kind(),
            ErrorKind::Submission
        );
    }

    #[test]
    fn test_field_errors() {
        let err = FormError::Submission("Network error".into());
        assert_eq!(err.field_errors().get("submit"), Some("Network error"));

        let mut invalid = FieldErrors::new();
        invalid.insert("email", "Email is required");
        let err = FormError::Invalid(invalid.clone());
        assert_eq!(err.field_errors(), invalid);
        assert_eq!(err.to_string(), "1 field(s) need attention");
    }

    #[test]
    fn test_to_app_error() {
        let app = FormError::RateLimited.to_app_error();
        assert_eq!(app.kind(), ErrorKind::RateLimited);
        assert!(app.action().is_some());
        assert!(app.is_recoverable());
    }
}
