pub mod event;
pub mod state;

pub use event::{
    Notification, NotificationKind, OnContinue, SessionSignal, TrackerEvent, on_continue,
};
pub use state::{SessionExpirationState, TickOutcome, WarningPhase};
