//! Expiration Tracker
//!
//! Drives the session expiration warning: a once-per-second countdown that
//! the user can extend or abandon, plus the toast notifications posted for
//! "session expired" and "session extended".
//!
//! ## Lifecycle
//! - `start(T, on_continue)` enters `WarningActive(T, T)` and spawns the
//!   countdown. A second `start` overwrites the first: the old countdown is
//!   aborted and its `on_continue` dropped without being run.
//! - Each tick publishes [`TrackerEvent::Tick`]; the tick that reaches zero
//!   also publishes [`TrackerEvent::Expired`] and closes the warning.
//! - `extend()` stops the countdown, awaits `on_continue`, then returns to
//!   `Idle`. `logout()` and `stop()` return to `Idle` without running it.
//!
//! The countdown task is owned by a [`TaskGuard`], so leaving the warning by
//! any path aborts it. Each countdown also carries the epoch it was started
//! under and stops as soon as the epoch moves on, which discards a tick that
//! was already scheduled when the warning was torn down.
//!
//! Every mutating method spawns or aborts tokio tasks and must be called from
//! within a Tokio runtime.

use std::collections::HashMap;
use std::sync::{Arc, Weak};
use std::time::Duration;

use kernel::id::NotificationId;
use parking_lot::Mutex;
use platform::task::TaskGuard;
use tokio::sync::broadcast;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::application::config::SessionConfig;
use crate::domain::{
    Notification, NotificationKind, OnContinue, SessionExpirationState, SessionSignal,
    TickOutcome, TrackerEvent, WarningPhase,
};
use crate::error::{SessionError, SessionResult};

const DEFAULT_WARNING_MESSAGE: &str = "Your session is about to expire";

/// Session expiration tracker
///
/// Cheap to clone; all clones share one countdown. Dropping the last clone
/// aborts every task the tracker spawned.
#[derive(Clone)]
pub struct ExpirationTracker {
    shared: Arc<Shared>,
}

struct Shared {
    config: SessionConfig,
    inner: Mutex<Inner>,
    events: broadcast::Sender<TrackerEvent>,
}

#[derive(Default)]
struct Inner {
    phase: WarningPhase,
    message: Option<String>,
    on_continue: Option<OnContinue>,
    countdown: Option<TaskGuard>,
    epoch: u64,
    notifications: Vec<Notification>,
    removals: HashMap<NotificationId, TaskGuard>,
}

impl Inner {
    /// Leave the warning: abort the countdown, drop the callback
    fn close_warning(&mut self) {
        self.epoch = self.epoch.wrapping_add(1);
        self.countdown = None;
        self.message = None;
        self.on_continue = None;
    }
}

impl Shared {
    fn publish(&self, event: TrackerEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }

    /// Apply one countdown tick. Returns `false` once the countdown is done.
    fn on_tick(&self, epoch: u64) -> bool {
        let mut inner = self.inner.lock();
        if inner.epoch != epoch {
            return false;
        }

        match inner.phase.tick() {
            TickOutcome::Counting(seconds_remaining) => {
                tracing::debug!(seconds_remaining, "Session warning tick");
                self.publish(TrackerEvent::Tick { seconds_remaining });
                true
            }
            TickOutcome::Reached => {
                // The countdown is this task: let it finish instead of aborting.
                if let Some(countdown) = inner.countdown.take() {
                    countdown.detach();
                }
                inner.close_warning();
                tracing::info!("Session warning expired without extension");
                self.publish(TrackerEvent::Tick {
                    seconds_remaining: 0,
                });
                self.publish(TrackerEvent::Expired);
                false
            }
            TickOutcome::Ignored => false,
        }
    }

    fn remove_notification(&self, id: NotificationId) -> Option<TaskGuard> {
        let mut inner = self.inner.lock();
        let position = inner.notifications.iter().position(|n| n.id == id)?;
        inner.notifications.remove(position);
        let removal = inner.removals.remove(&id);
        tracing::debug!(%id, "Notification removed");
        self.publish(TrackerEvent::NotificationRemoved { id });
        removal
    }
}

async fn run_countdown(shared: Weak<Shared>, epoch: u64, period: Duration) {
    let mut interval = time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        interval.tick().await;
        let Some(shared) = shared.upgrade() else {
            return;
        };
        if !shared.on_tick(epoch) {
            return;
        }
    }
}

impl ExpirationTracker {
    pub fn new(config: SessionConfig) -> Self {
        let (events, _) = broadcast::channel(config.event_capacity.max(1));
        Self {
            shared: Arc::new(Shared {
                config,
                inner: Mutex::new(Inner::default()),
                events,
            }),
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.shared.config
    }

    /// Receive every event published from now on
    pub fn subscribe(&self) -> broadcast::Receiver<TrackerEvent> {
        self.shared.events.subscribe()
    }

    // ========================================================================
    // Warning
    // ========================================================================

    /// Enter `WarningActive(total_seconds, total_seconds)`
    pub fn start(&self, total_seconds: u32, on_continue: OnContinue) {
        self.start_with_message(total_seconds, DEFAULT_WARNING_MESSAGE, on_continue);
    }

    pub fn start_with_message(
        &self,
        total_seconds: u32,
        message: impl Into<String>,
        on_continue: OnContinue,
    ) {
        let message = message.into();
        let mut inner = self.shared.inner.lock();

        let replaced = inner.phase.is_active();
        inner.close_warning();
        let epoch = inner.epoch;

        inner.phase = WarningPhase::warn(total_seconds);
        inner.message = Some(message.clone());
        inner.on_continue = Some(on_continue);
        inner.countdown = Some(TaskGuard::spawn(
            "session_countdown",
            run_countdown(
                Arc::downgrade(&self.shared),
                epoch,
                self.shared.config.tick_period,
            ),
        ));

        tracing::info!(total_seconds, replaced, "Session expiration warning started");
        self.shared.publish(TrackerEvent::Started {
            total_seconds,
            message,
        });
    }

    /// Run `on_continue` and close the warning
    ///
    /// The countdown stops before the callback runs. If another warning
    /// starts while the callback is pending, that warning is left alone.
    pub async fn extend(&self) -> SessionResult<()> {
        let (on_continue, epoch) = {
            let mut inner = self.shared.inner.lock();
            if !inner.phase.is_active() {
                let err = SessionError::NoActiveWarning;
                err.log();
                return Err(err);
            }
            inner.countdown = None;
            inner.epoch = inner.epoch.wrapping_add(1);
            (inner.on_continue.take(), inner.epoch)
        };

        if let Some(on_continue) = on_continue {
            on_continue().await;
        }

        let mut inner = self.shared.inner.lock();
        if inner.epoch == epoch {
            inner.close_warning();
            inner.phase.reset();
            tracing::info!("Session extended by user");
            self.shared.publish(TrackerEvent::Extended);
        }
        Ok(())
    }

    /// Close the warning without running `on_continue`. Idempotent.
    ///
    /// Returns whether a warning was open.
    pub fn logout(&self) -> bool {
        let mut inner = self.shared.inner.lock();
        inner.close_warning();
        let was_active = inner.phase.reset();
        if was_active {
            tracing::info!("Session warning closed by logout");
            self.shared.publish(TrackerEvent::LoggedOut);
        }
        was_active
    }

    /// Tear down the warning silently. Idempotent.
    pub fn stop(&self) {
        let mut inner = self.shared.inner.lock();
        inner.close_warning();
        if inner.phase.reset() {
            tracing::debug!("Session warning stopped");
        }
    }

    // ========================================================================
    // Notifications
    // ========================================================================

    /// Post a toast that removes itself after `duration`
    pub fn notify(
        &self,
        message: impl Into<String>,
        kind: NotificationKind,
        duration: Duration,
    ) -> NotificationId {
        let notification = Notification::new(message, kind, duration);
        let id = notification.id;

        let shared = Arc::downgrade(&self.shared);
        let removal = TaskGuard::spawn("notification_removal", async move {
            time::sleep(duration).await;
            if let Some(shared) = shared.upgrade() {
                if let Some(own) = shared.remove_notification(id) {
                    own.detach();
                }
            }
        });

        let mut inner = self.shared.inner.lock();
        inner.notifications.push(notification.clone());
        inner.removals.insert(id, removal);

        tracing::debug!(%id, %kind, "Notification added");
        self.shared.publish(TrackerEvent::NotificationAdded { notification });
        id
    }

    /// Remove a toast before its timer fires
    pub fn dismiss_notification(&self, id: NotificationId) -> bool {
        // Dropping the guard aborts the pending removal.
        self.shared.remove_notification(id).is_some()
    }

    // ========================================================================
    // Signals
    // ========================================================================

    /// React to one signal from the auth layer
    pub fn handle_signal(&self, signal: SessionSignal) {
        tracing::debug!(signal = signal.code(), "Session signal received");
        match signal {
            SessionSignal::ExpirationWarning {
                message,
                time_until_expiration_secs,
                on_continue,
            } => {
                self.start_with_message(time_until_expiration_secs, message, on_continue);
            }
            SessionSignal::SessionExpired { message } => {
                self.notify(message, NotificationKind::Error, self.shared.config.expired_toast);
            }
            SessionSignal::SessionExtended { message } => {
                self.notify(
                    message,
                    NotificationKind::Success,
                    self.shared.config.extended_toast,
                );
            }
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn state(&self) -> SessionExpirationState {
        let inner = self.shared.inner.lock();
        SessionExpirationState::new(
            inner.phase,
            inner.message.clone(),
            inner.notifications.clone(),
        )
    }

    pub fn phase(&self) -> WarningPhase {
        self.shared.inner.lock().phase
    }

    pub fn is_warning_visible(&self) -> bool {
        self.phase().is_active()
    }
}

impl Default for ExpirationTracker {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

impl std::fmt::Debug for ExpirationTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.shared.inner.lock();
        f.debug_struct("ExpirationTracker")
            .field("phase", &inner.phase)
            .field("epoch", &inner.epoch)
            .field("notifications", &inner.notifications.len())
            .finish_non_exhaustive()
    }
}
