//! Warning Phase
//!
//! The expiration warning state machine. Transitions are pure; timers and
//! callbacks live in the application layer.
//!
//! ```text
//! Idle ──warn(T)──▶ WarningActive(T, T) ──tick──▶ WarningActive(T-1, T) ...
//!                          │                              │
//!                   extend / logout                WarningActive(0, T) ──tick──▶ Expired
//!                          ▼
//!                         Idle
//! ```

use serde::Serialize;

use super::event::Notification;

// ============================================================================
// WarningPhase
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum WarningPhase {
    /// No warning shown
    #[default]
    Idle,

    /// Countdown running
    WarningActive {
        seconds_remaining: u32,
        total_window: u32,
    },

    /// Countdown reached zero without an extension
    Expired,
}

/// Result of advancing the countdown by one second
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Still counting; carries the new value
    Counting(u32),
    /// This tick reached zero and closed the warning
    Reached,
    /// No warning active; the tick is stale
    Ignored,
}

impl WarningPhase {
    /// Enter the warning state. Overwrites a warning already running.
    pub fn warn(total_seconds: u32) -> Self {
        WarningPhase::WarningActive {
            seconds_remaining: total_seconds,
            total_window: total_seconds,
        }
    }

    #[inline]
    pub const fn is_active(&self) -> bool {
        matches!(self, WarningPhase::WarningActive { .. })
    }

    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            WarningPhase::Idle => "idle",
            WarningPhase::WarningActive { .. } => "warning_active",
            WarningPhase::Expired => "expired",
        }
    }

    pub const fn seconds_remaining(&self) -> u32 {
        match self {
            WarningPhase::WarningActive {
                seconds_remaining, ..
            } => *seconds_remaining,
            _ => 0,
        }
    }

    pub const fn total_window(&self) -> u32 {
        match self {
            WarningPhase::WarningActive { total_window, .. } => *total_window,
            _ => 0,
        }
    }

    /// Advance one second
    ///
    /// `WarningActive(s, T)` becomes `WarningActive(s - 1, T)`. The tick that
    /// lands on zero moves the phase straight to `Expired`.
    pub fn tick(&mut self) -> TickOutcome {
        let WarningPhase::WarningActive {
            seconds_remaining,
            total_window,
        } = *self
        else {
            return TickOutcome::Ignored;
        };

        match seconds_remaining.saturating_sub(1) {
            0 => {
                *self = WarningPhase::Expired;
                TickOutcome::Reached
            }
            next => {
                *self = WarningPhase::WarningActive {
                    seconds_remaining: next,
                    total_window,
                };
                TickOutcome::Counting(next)
            }
        }
    }

    /// Back to `Idle`. Returns whether a warning was active.
    pub fn reset(&mut self) -> bool {
        let was_active = self.is_active();
        *self = WarningPhase::Idle;
        was_active
    }
}

// ============================================================================
// Snapshot
// ============================================================================

/// Read-only view of the tracker for rendering
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionExpirationState {
    pub phase: WarningPhase,
    pub is_warning_visible: bool,
    pub seconds_remaining: u32,
    pub total_warning_window: u32,
    /// Text of the active warning
    pub message: Option<String>,
    pub notifications: Vec<Notification>,
}

impl SessionExpirationState {
    pub fn new(
        phase: WarningPhase,
        message: Option<String>,
        notifications: Vec<Notification>,
    ) -> Self {
        Self {
            phase,
            is_warning_visible: phase.is_active(),
            seconds_remaining: phase.seconds_remaining(),
            total_warning_window: phase.total_window(),
            message: message.filter(|_| phase.is_active()),
            notifications,
        }
    }
}
