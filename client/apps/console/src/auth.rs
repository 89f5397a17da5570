//! Simulated Auth Layer
//!
//! Stands in for the token manager: signs users in, warns before the token
//! expires, refreshes it on request, and reports expiry.

use std::time::Duration;

use forms::FormValues;
use session::{SessionResult, SignalSender, on_continue};

/// Password the simulated backend accepts
pub const DEMO_PASSWORD: &str = "retro-1234";

const SIGN_IN_LATENCY: Duration = Duration::from_millis(300);
const REFRESH_LATENCY: Duration = Duration::from_millis(200);

#[derive(Debug, Clone)]
pub struct AuthSimulator {
    signals: SignalSender,
    warning_secs: u32,
}

impl AuthSimulator {
    pub fn new(signals: SignalSender, warning_secs: u32) -> Self {
        Self {
            signals,
            warning_secs,
        }
    }

    pub fn warning_secs(&self) -> u32 {
        self.warning_secs
    }

    pub async fn sign_in(&self, values: FormValues) -> Result<(), String> {
        tokio::time::sleep(SIGN_IN_LATENCY).await;
        let email = values.get("email").map_or("", String::as_str);
        if values.get("password").map(String::as_str) == Some(DEMO_PASSWORD) {
            tracing::info!(email, "Signed in");
            Ok(())
        } else {
            Err("Invalid email or password".to_string())
        }
    }

    /// Emit an expiration warning whose continuation refreshes the token
    pub async fn warn(&self, secs: Option<u32>) -> SessionResult<()> {
        let secs = secs.unwrap_or(self.warning_secs);
        let signals = self.signals.clone();
        let refresh = on_continue(move || async move {
            tokio::time::sleep(REFRESH_LATENCY).await;
            tracing::info!("Token refreshed");
            // The tracker may already be gone on shutdown.
            let _ = signals
                .session_extended("Your session has been extended")
                .await;
        });

        let message = format!("Your session will expire in {secs} seconds");
        self.signals.expiration_warning(message, secs, refresh).await
    }

    pub async fn expire(&self) -> SessionResult<()> {
        tracing::info!("Token expired; signing out");
        self.signals
            .session_expired("Your session has expired. Please sign in again.")
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use session::{ExpirationTracker, NotificationKind, signal_channel};

    fn credentials(password: &str) -> FormValues {
        let mut values = FormValues::new();
        values.insert("email".into(), "ana@tienda.es".into());
        values.insert("password".into(), password.into());
        values
    }

    #[tokio::test(start_paused = true)]
    async fn test_sign_in() {
        let (tx, _rx) = signal_channel(4);
        let auth = AuthSimulator::new(tx, 60);
        assert!(auth.sign_in(credentials(DEMO_PASSWORD)).await.is_ok());
        assert_eq!(
            auth.sign_in(credentials("wrong")).await,
            Err("Invalid email or password".to_string())
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_warning_then_extend_posts_toast() {
        let tracker = ExpirationTracker::default();
        let (tx, rx) = signal_channel(4);
        let _listener = tracker.listen(rx);
        let auth = AuthSimulator::new(tx, 60);

        auth.warn(Some(20)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(tracker.state().total_warning_window, 20);

        tracker.extend().await.unwrap();
        tokio::time::sleep(Duration::from_millis(10)).await;

        let state = tracker.state();
        assert!(!state.is_warning_visible);
        assert_eq!(state.notifications.len(), 1);
        assert_eq!(state.notifications[0].kind, NotificationKind::Success);
    }
}
