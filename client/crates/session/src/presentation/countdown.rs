//! Countdown View
//!
//! Display values for the expiration warning, derived from the countdown
//! alone. Nothing here is stored; recompute on every tick.

use serde::Serialize;

use crate::domain::{SessionExpirationState, WarningPhase};

/// At or below this many seconds the warning is critical
pub const CRITICAL_SECONDS: u32 = 10;
/// At or below this many seconds the progress bar shimmers
pub const SHIMMER_SECONDS: u32 = 30;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountdownView {
    pub seconds_remaining: u32,
    /// `ceil(seconds_remaining / 60)`
    pub minutes: u32,
    /// `seconds_remaining % 60`
    pub seconds: u32,
    pub is_urgent: bool,
    pub is_critical: bool,
    pub shimmer: bool,
    /// Fraction of the window left, in `[0, 1]`
    pub progress: f64,
}

impl CountdownView {
    pub fn new(seconds_remaining: u32, total_window: u32) -> Self {
        let minutes = seconds_remaining.div_ceil(60);
        let progress = if total_window == 0 {
            0.0
        } else {
            (f64::from(seconds_remaining) / f64::from(total_window)).clamp(0.0, 1.0)
        };

        Self {
            seconds_remaining,
            minutes,
            seconds: seconds_remaining % 60,
            is_urgent: minutes <= 1,
            is_critical: seconds_remaining <= CRITICAL_SECONDS,
            shimmer: seconds_remaining <= SHIMMER_SECONDS,
            progress,
        }
    }

    /// `None` unless a warning is showing
    pub fn from_phase(phase: &WarningPhase) -> Option<Self> {
        match *phase {
            WarningPhase::WarningActive {
                seconds_remaining,
                total_window,
            } => Some(Self::new(seconds_remaining, total_window)),
            _ => None,
        }
    }

    pub fn from_state(state: &SessionExpirationState) -> Option<Self> {
        Self::from_phase(&state.phase)
    }

    /// Progress as a whole percentage
    pub fn percent(&self) -> u32 {
        (self.progress * 100.0).round() as u32
    }

    /// `m:ss`, with whole minutes rounded down
    pub fn clock_label(&self) -> String {
        format!(
            "{}:{:02}",
            self.seconds_remaining / 60,
            self.seconds_remaining % 60
        )
    }

    /// "3 minutes", "1 minute", or seconds once no minute is left
    pub fn headline(&self) -> String {
        if self.minutes > 0 {
            plural(self.minutes, "minute")
        } else {
            plural(self.seconds, "second")
        }
    }

    pub fn prompt(&self) -> &'static str {
        if self.is_urgent {
            "Act quickly so you don't lose your progress!"
        } else {
            "Do you want to continue your current session?"
        }
    }

    pub fn extend_label(&self) -> &'static str {
        if self.is_urgent {
            "Extend now!"
        } else {
            "Continue session"
        }
    }
}

fn plural(count: u32, unit: &str) -> String {
    if count == 1 {
        format!("{count} {unit}")
    } else {
        format!("{count} {unit}s")
    }
}
