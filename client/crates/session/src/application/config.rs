//! Application Configuration
//!
//! Configuration for the session expiration tracker.

use std::time::Duration;

/// Session tracker configuration
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Countdown granularity
    pub tick_period: Duration,
    /// How long the "session expired" toast stays up
    pub expired_toast: Duration,
    /// How long the "session extended" toast stays up
    pub extended_toast: Duration,
    /// Buffered tracker events per subscriber
    pub event_capacity: usize,
    /// Buffered signals from the auth layer
    pub signal_capacity: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            tick_period: Duration::from_secs(1),
            expired_toast: Duration::from_millis(5000),
            extended_toast: Duration::from_millis(3000),
            event_capacity: 64,
            signal_capacity: 16,
        }
    }
}

impl SessionConfig {
    pub fn with_tick_period(tick_period: Duration) -> Self {
        Self {
            tick_period,
            ..Default::default()
        }
    }

    pub fn tick_period_ms(&self) -> i64 {
        self.tick_period.as_millis() as i64
    }

    pub fn expired_toast_ms(&self) -> i64 {
        self.expired_toast.as_millis() as i64
    }

    pub fn extended_toast_ms(&self) -> i64 {
        self.extended_toast.as_millis() as i64
    }
}
