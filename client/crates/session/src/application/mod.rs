pub mod config;
pub mod listener;
pub mod tracker;

pub use config::SessionConfig;
pub use listener::{SignalReceiver, SignalSender, signal_channel};
pub use tracker::ExpirationTracker;
