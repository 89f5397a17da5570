//! Error conversions - From implementations for common error types

use super::app_error::AppError;
use super::kind::ErrorKind;

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        let kind = if err.is_syntax() || err.is_data() {
            ErrorKind::Validation
        } else {
            ErrorKind::Internal
        };
        AppError::new(kind, format!("JSON error: {err}")).with_source(err)
    }
}
