//! Rate Limiting Infrastructure
//!
//! Sliding-window attempt counter keyed by an arbitrary string.
//!
//! ## Policy
//! - Each key keeps the timestamps of its *admitted* attempts, oldest first
//! - On every check, timestamps with `now - t >= window` are discarded
//! - An attempt is admitted iff fewer than `max_requests` remain; admission
//!   records `now`
//! - Rejected attempts are not recorded, so retrying while blocked does not
//!   push the window further out
//! - Keys whose history becomes empty are removed

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use crate::clock::{Clock, system_clock};

/// Rate limit configuration
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Maximum attempts allowed in the window
    pub max_requests: u32,
    /// Time window duration
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 5,
            window: Duration::from_secs(60),
        }
    }
}

impl RateLimitConfig {
    pub fn new(max_requests: u32, window_ms: u64) -> Self {
        Self {
            max_requests,
            window: Duration::from_millis(window_ms),
        }
    }

    pub fn window_ms(&self) -> i64 {
        self.window.as_millis() as i64
    }
}

/// Rate limit check result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitResult {
    pub allowed: bool,
    /// Attempts still available in the current window (after this one)
    pub remaining: u32,
    /// When the oldest recorded attempt leaves the window
    pub reset_at_ms: i64,
}

/// Sliding-window limiter
///
/// State is private to the instance; clone the `Arc` to share one.
///
/// ```rust
/// use std::sync::Arc;
/// use platform::clock::ManualClock;
/// use platform::rate_limit::{RateLimitConfig, RateLimiter};
///
/// let clock = Arc::new(ManualClock::new(0));
/// let limiter = RateLimiter::with_clock(RateLimitConfig::new(2, 1_000), clock.clone());
/// assert!(limiter.attempt("login"));
/// assert!(limiter.attempt("login"));
/// assert!(!limiter.attempt("login"));
/// clock.advance_ms(1_000);
/// assert!(limiter.attempt("login"));
/// ```
pub struct RateLimiter {
    config: RateLimitConfig,
    clock: Arc<dyn Clock>,
    attempts: Mutex<HashMap<String, VecDeque<i64>>>,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self::with_clock(config, system_clock())
    }

    pub fn with_clock(config: RateLimitConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            config,
            clock,
            attempts: Mutex::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    /// Record an attempt for `key` if the window allows it
    pub fn attempt(&self, key: &str) -> bool {
        self.check_and_record(key).allowed
    }

    /// Like [`attempt`](Self::attempt) but reports the remaining budget
    pub fn check_and_record(&self, key: &str) -> RateLimitResult {
        let now = self.clock.now_ms();
        let window = self.config.window_ms();
        let max = self.config.max_requests as usize;

        let mut attempts = self.attempts.lock();
        let history = attempts.entry(key.to_string()).or_default();
        while history.front().is_some_and(|&t| now - t >= window) {
            history.pop_front();
        }

        let allowed = history.len() < max;
        if allowed {
            history.push_back(now);
        }

        let result = RateLimitResult {
            allowed,
            remaining: max.saturating_sub(history.len()) as u32,
            reset_at_ms: history.front().map_or(now, |&oldest| oldest + window),
        };

        if history.is_empty() {
            attempts.remove(key);
        }

        if !allowed {
            tracing::debug!(key, reset_at_ms = result.reset_at_ms, "Rate limit exceeded");
        }
        result
    }

    /// Number of keys currently tracked
    pub fn tracked_keys(&self) -> usize {
        self.attempts.lock().len()
    }

    /// Drop every key whose history has fully left the window
    pub fn purge_expired(&self) {
        let now = self.clock.now_ms();
        let window = self.config.window_ms();
        self.attempts.lock().retain(|_, history| {
            history.retain(|&t| now - t < window);
            !history.is_empty()
        });
    }

    /// Forget all attempts for a key
    pub fn reset(&self, key: &str) {
        self.attempts.lock().remove(key);
    }
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter")
            .field("config", &self.config)
            .field("tracked_keys", &self.tracked_keys())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    fn limiter(max: u32, window_ms: u64) -> (RateLimiter, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(1_000_000));
        let limiter = RateLimiter::with_clock(RateLimitConfig::new(max, window_ms), clock.clone());
        (limiter, clock)
    }

    #[test]
    fn test_five_in_a_row_then_blocked_then_released() {
        let (limiter, clock) = limiter(5, 60_000);
        for _ in 0..5 {
            assert!(limiter.attempt("k"));
        }
        assert!(!limiter.attempt("k"));

        clock.advance_ms(60_001);
        assert!(limiter.attempt("k"));
    }

    #[test]
    fn test_window_boundary_is_exclusive() {
        let (limiter, clock) = limiter(1, 1_000);
        assert!(limiter.attempt("k"));
        clock.advance_ms(999);
        assert!(!limiter.attempt("k"));
        clock.advance_ms(1);
        assert!(limiter.attempt("k"));
    }

    #[test]
    fn test_rejections_are_not_recorded() {
        let (limiter, clock) = limiter(2, 1_000);
        assert!(limiter.attempt("k"));
        clock.advance_ms(500);
        assert!(limiter.attempt("k"));
        for _ in 0..10 {
            assert!(!limiter.attempt("k"));
        }
        // The first admitted attempt leaves the window at t+1000 regardless
        // of the rejected retries in between.
        clock.advance_ms(500);
        assert!(limiter.attempt("k"));
    }

    #[test]
    fn test_sliding_not_fixed_bucket() {
        let (limiter, clock) = limiter(2, 1_000);
        assert!(limiter.attempt("k"));
        clock.advance_ms(900);
        assert!(limiter.attempt("k"));
        clock.advance_ms(200);
        // One slot freed (first attempt expired), second still inside.
        assert!(limiter.attempt("k"));
        assert!(!limiter.attempt("k"));
    }

    #[test]
    fn test_keys_are_independent() {
        let (limiter, _clock) = limiter(1, 1_000);
        assert!(limiter.attempt("a"));
        assert!(!limiter.attempt("a"));
        assert!(limiter.attempt("b"));
    }

    #[test]
    fn test_remaining_and_reset_at() {
        let (limiter, clock) = limiter(3, 1_000);
        let start = clock.now_ms();
        let first = limiter.check_and_record("k");
        assert_eq!(first.remaining, 2);
        assert_eq!(first.reset_at_ms, start + 1_000);

        limiter.check_and_record("k");
        limiter.check_and_record("k");
        let blocked = limiter.check_and_record("k");
        assert!(!blocked.allowed);
        assert_eq!(blocked.remaining, 0);
    }

    #[test]
    fn test_expired_keys_are_pruned() {
        let (limiter, clock) = limiter(1, 1_000);
        limiter.attempt("a");
        limiter.attempt("b");
        assert_eq!(limiter.tracked_keys(), 2);

        clock.advance_ms(1_000);
        limiter.purge_expired();
        assert_eq!(limiter.tracked_keys(), 0);
    }

    #[test]
    fn test_zero_budget_never_admits_and_leaves_no_key() {
        let (limiter, _clock) = limiter(0, 1_000);
        assert!(!limiter.attempt("k"));
        assert_eq!(limiter.tracked_keys(), 0);
    }

    #[test]
    fn test_reset() {
        let (limiter, _clock) = limiter(1, 1_000);
        assert!(limiter.attempt("k"));
        limiter.reset("k");
        assert!(limiter.attempt("k"));
    }
}
