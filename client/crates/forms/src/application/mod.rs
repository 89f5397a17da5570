//! Application Layer
//!
//! Form controller and configuration.

pub mod config;
pub mod controller;

// Re-exports
pub use config::FormConfig;
pub use controller::{FormController, FormState, SubmitHandler};
