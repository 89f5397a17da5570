//! Application Configuration
//!
//! Configuration for form controllers.

use std::time::Duration;

/// Re-export RateLimitConfig from platform
pub use platform::rate_limit::RateLimitConfig;

/// Form controller configuration
#[derive(Debug, Clone)]
pub struct FormConfig {
    /// Rate limiter key used for submissions
    pub submit_key: String,
    /// Submissions allowed per window
    pub submit_rate_limit: RateLimitConfig,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            submit_key: "form_submit".to_string(),
            submit_rate_limit: RateLimitConfig {
                max_requests: 5,
                window: Duration::from_secs(60),
            },
        }
    }
}

impl FormConfig {
    pub fn with_rate_limit(max_requests: u32, window: Duration) -> Self {
        Self {
            submit_rate_limit: RateLimitConfig {
                max_requests,
                window,
            },
            ..Default::default()
        }
    }

    pub fn submit_window_ms(&self) -> i64 {
        self.submit_rate_limit.window_ms()
    }
}
