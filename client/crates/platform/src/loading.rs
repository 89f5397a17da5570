//! Minimum-Duration Loading Indicator
//!
//! Keeps a spinner on screen for a minimum time after it appeared, so fast
//! responses do not flash the indicator on and off.

use std::sync::Arc;
use std::time::Duration;

use crate::clock::{Clock, system_clock};

/// Loading indicator configuration
#[derive(Debug, Clone)]
pub struct LoadingConfig {
    /// Shortest time the indicator stays visible
    pub minimum: Duration,
}

impl Default for LoadingConfig {
    fn default() -> Self {
        Self {
            minimum: Duration::from_millis(800),
        }
    }
}

/// Tracks when loading started and how long to hold the indicator
pub struct LoadingGate {
    config: LoadingConfig,
    clock: Arc<dyn Clock>,
    started_at_ms: i64,
    loading: bool,
}

impl LoadingGate {
    pub fn start(config: LoadingConfig) -> Self {
        Self::start_with_clock(config, system_clock())
    }

    pub fn start_with_clock(config: LoadingConfig, clock: Arc<dyn Clock>) -> Self {
        let started_at_ms = clock.now_ms();
        Self {
            config,
            clock,
            started_at_ms,
            loading: true,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Time still owed before the indicator may be hidden
    pub fn remaining(&self) -> Duration {
        let elapsed = (self.clock.now_ms() - self.started_at_ms).max(0) as u64;
        self.config
            .minimum
            .saturating_sub(Duration::from_millis(elapsed))
    }

    /// Mark the work as done and return how long to keep showing the indicator
    pub fn finish(&mut self) -> Duration {
        let remaining = self.remaining();
        if remaining.is_zero() {
            self.loading = false;
        }
        remaining
    }

    /// Wait out the minimum duration, then clear the loading flag
    pub async fn finish_and_wait(&mut self) {
        let remaining = self.finish();
        if !remaining.is_zero() {
            tokio::time::sleep(remaining).await;
        }
        self.loading = false;
    }
}
