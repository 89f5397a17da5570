//! Signal Channel
//!
//! Bounded channel from the auth layer to the tracker. The auth layer holds
//! a [`SignalSender`]; [`ExpirationTracker::listen`] consumes the receiver on
//! a background task until every sender is dropped.

use platform::task::TaskGuard;
use tokio::sync::mpsc;

use crate::application::tracker::ExpirationTracker;
use crate::domain::{OnContinue, SessionSignal};
use crate::error::{SessionError, SessionResult};

pub type SignalReceiver = mpsc::Receiver<SessionSignal>;

/// Auth-layer handle for emitting session signals
#[derive(Debug, Clone)]
pub struct SignalSender {
    tx: mpsc::Sender<SessionSignal>,
}

pub fn signal_channel(capacity: usize) -> (SignalSender, SignalReceiver) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (SignalSender { tx }, rx)
}

impl SignalSender {
    pub async fn send(&self, signal: SessionSignal) -> SessionResult<()> {
        self.tx.send(signal).await.map_err(|_| {
            let err = SessionError::ChannelClosed;
            err.log();
            err
        })
    }

    pub async fn expiration_warning(
        &self,
        message: impl Into<String>,
        time_until_expiration_secs: u32,
        on_continue: OnContinue,
    ) -> SessionResult<()> {
        self.send(SessionSignal::ExpirationWarning {
            message: message.into(),
            time_until_expiration_secs,
            on_continue,
        })
        .await
    }

    pub async fn session_expired(&self, message: impl Into<String>) -> SessionResult<()> {
        self.send(SessionSignal::SessionExpired {
            message: message.into(),
        })
        .await
    }

    pub async fn session_extended(&self, message: impl Into<String>) -> SessionResult<()> {
        self.send(SessionSignal::SessionExtended {
            message: message.into(),
        })
        .await
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

impl ExpirationTracker {
    /// Feed every received signal to [`handle_signal`](Self::handle_signal)
    ///
    /// Dropping the returned guard stops listening.
    pub fn listen(&self, mut rx: SignalReceiver) -> TaskGuard {
        let tracker = self.clone();
        TaskGuard::spawn("session_signals", async move {
            while let Some(signal) = rx.recv().await {
                tracker.handle_signal(signal);
            }
            tracing::debug!("All session signal senders dropped");
        })
    }
}
