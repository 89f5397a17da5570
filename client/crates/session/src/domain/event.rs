//! Session Events
//!
//! Signals flow in from the auth layer ([`SessionSignal`]); observers are
//! told what the tracker did ([`TrackerEvent`]).

use std::fmt;
use std::time::Duration;

use derive_more::Display;
use futures::future::BoxFuture;
use kernel::id::NotificationId;
use serde::{Serialize, Serializer};

/// Token refresh supplied with a warning, run at most once on extend
pub type OnContinue = Box<dyn FnOnce() -> BoxFuture<'static, ()> + Send>;

/// Wrap an async closure as an [`OnContinue`]
pub fn on_continue<F, Fut>(f: F) -> OnContinue
where
    F: FnOnce() -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    Box::new(move || Box::pin(f()))
}

// ============================================================================
// Inbound
// ============================================================================

/// Signal emitted by the auth layer
pub enum SessionSignal {
    /// The token is about to expire
    ExpirationWarning {
        message: String,
        time_until_expiration_secs: u32,
        on_continue: OnContinue,
    },
    /// The session has ended
    SessionExpired { message: String },
    /// The token was refreshed
    SessionExtended { message: String },
}

impl SessionSignal {
    pub fn code(&self) -> &'static str {
        match self {
            SessionSignal::ExpirationWarning { .. } => "expiration_warning",
            SessionSignal::SessionExpired { .. } => "session_expired",
            SessionSignal::SessionExtended { .. } => "session_extended",
        }
    }
}

impl fmt::Debug for SessionSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionSignal::ExpirationWarning {
                message,
                time_until_expiration_secs,
                ..
            } => f
                .debug_struct("ExpirationWarning")
                .field("message", message)
                .field("time_until_expiration_secs", time_until_expiration_secs)
                .finish_non_exhaustive(),
            SessionSignal::SessionExpired { message } => f
                .debug_struct("SessionExpired")
                .field("message", message)
                .finish(),
            SessionSignal::SessionExtended { message } => f
                .debug_struct("SessionExtended")
                .field("message", message)
                .finish(),
        }
    }
}

// ============================================================================
// Notifications
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    #[display("success")]
    Success,
    #[display("error")]
    Error,
    #[display("info")]
    Info,
    #[display("warning")]
    Warning,
}

/// Transient toast, removed after `duration`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub id: NotificationId,
    pub message: String,
    pub kind: NotificationKind,
    #[serde(rename = "duration_ms", serialize_with = "serialize_millis")]
    pub duration: Duration,
}

impl Notification {
    pub fn new(message: impl Into<String>, kind: NotificationKind, duration: Duration) -> Self {
        Self {
            id: NotificationId::new(),
            message: message.into(),
            kind,
            duration,
        }
    }
}

fn serialize_millis<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(duration.as_millis() as u64)
}

// ============================================================================
// Outbound
// ============================================================================

/// What the tracker did, in order
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TrackerEvent {
    /// A warning countdown began (or replaced the running one)
    Started { total_seconds: u32, message: String },
    /// One second elapsed
    Tick { seconds_remaining: u32 },
    /// The user extended; `on_continue` has completed
    Extended,
    /// The user logged out from the warning
    LoggedOut,
    /// The countdown reached zero
    Expired,
    NotificationAdded { notification: Notification },
    NotificationRemoved { id: NotificationId },
}
