//! Session Error Types
//!
//! Failures of tracker commands. None of them are fatal: the UI keeps
//! running and the tracker stays usable.

use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Session-specific result type alias
pub type SessionResult<T> = Result<T, SessionError>;

#[derive(Debug, Error)]
pub enum SessionError {
    /// `extend` was called while no warning is running
    #[error("No expiration warning is active")]
    NoActiveWarning,

    /// The other end of a signal channel is gone
    #[error("Session signal channel closed")]
    ChannelClosed,
}

impl SessionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SessionError::NoActiveWarning => ErrorKind::SessionInactive,
            SessionError::ChannelClosed => ErrorKind::ChannelClosed,
        }
    }

    pub fn to_app_error(&self) -> AppError {
        AppError::new(self.kind(), self.to_string())
    }

    /// Log the error with appropriate level
    pub(crate) fn log(&self) {
        match self {
            SessionError::NoActiveWarning => {
                tracing::debug!("Extend ignored: no active warning");
            }
            SessionError::ChannelClosed => {
                tracing::warn!("Session signal channel closed");
            }
        }
    }
}
