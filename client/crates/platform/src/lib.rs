//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations for the client:
//! - Injectable clocks (system and manual)
//! - Input and HTML sanitization
//! - Sliding-window rate limiting
//! - Scoped background tasks (aborted on drop)
//! - Minimum-duration loading indicators

pub mod clock;
pub mod loading;
pub mod rate_limit;
pub mod sanitize;
pub mod task;
