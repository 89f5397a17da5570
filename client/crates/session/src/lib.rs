//! Session Expiration Module
//!
//! Clean Architecture structure:
//! - `domain/` - Warning state machine, signals, events, notifications
//! - `application/` - The tracker, its configuration and the signal channel
//! - `presentation/` - Countdown display derivations
//!
//! ## Flow
//! The auth layer sends [`SessionSignal`]s through a [`SignalSender`]. The
//! [`ExpirationTracker`] turns an expiration warning into a countdown and
//! the expired/extended signals into toasts, and publishes every change as a
//! [`TrackerEvent`] to its subscribers.

pub mod application;
pub mod domain;
pub mod error;
pub mod presentation;

// Re-exports for convenience
pub use application::{
    ExpirationTracker, SessionConfig, SignalReceiver, SignalSender, signal_channel,
};
pub use domain::{
    Notification, NotificationKind, OnContinue, SessionExpirationState, SessionSignal,
    TrackerEvent, WarningPhase, on_continue,
};
pub use error::{SessionError, SessionResult};
pub use presentation::CountdownView;

// Re-export kernel error types for unified error handling
pub use kernel::error::{app_error::AppError, kind::ErrorKind};
