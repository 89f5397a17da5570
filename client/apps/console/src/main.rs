//! Console Entry Point
//!
//! Terminal harness for the storefront's session and form plumbing. Plays
//! the auth layer, feeds its signals to the expiration tracker, and drives a
//! login form from stdin. Uses `anyhow` for startup errors, but
//! application-level errors should use `kernel::error::AppError`.

mod auth;
mod command;
mod config;

use forms::{FieldErrors, FormController, FormValues, validators::validate_login};
use platform::clock::system_clock;
use platform::loading::{LoadingConfig, LoadingGate};
use platform::task::TaskGuard;
use session::{CountdownView, ExpirationTracker, TrackerEvent, signal_channel};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::auth::AuthSimulator;
use crate::command::{Command, HELP};
use crate::config::ConsoleConfig;

// Re-export unified error types
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

type LoginForm = FormController<fn(&FormValues) -> FieldErrors>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "console=info,forms=info,session=info,platform=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ConsoleConfig::from_env()?;
    tracing::info!(
        warning_secs = config.warning_secs,
        tick_ms = config.session.tick_period_ms(),
        max_attempts = config.form.submit_rate_limit.max_requests,
        window_ms = config.form.submit_window_ms(),
        "Configuration loaded"
    );

    let tracker = ExpirationTracker::new(config.session.clone());
    let (signals, rx) = signal_channel(config.session.signal_capacity);
    let _listener = tracker.listen(rx);
    let auth = AuthSimulator::new(signals, config.warning_secs);
    let _events = log_events(&tracker, auth.clone());

    let form: LoginForm = FormController::with_config(
        FormValues::new(),
        validate_login as fn(&FormValues) -> FieldErrors,
        config.form.clone(),
        system_clock(),
    );

    tracing::info!("{HELP}");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match Command::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                tracing::warn!("{e}");
                continue;
            }
        };
        if command == Command::Quit {
            break;
        }
        if let Err(e) = run(command, &tracker, &auth, &form).await {
            tracing::warn!(kind = %e.kind(), "{e}");
        }
    }

    tracker.stop();
    tracing::info!("Bye");
    Ok(())
}

async fn run(
    command: Command,
    tracker: &ExpirationTracker,
    auth: &AuthSimulator,
    form: &LoginForm,
) -> AppResult<()> {
    match command {
        Command::Warn(secs) => auth.warn(secs).await.map_err(|e| e.to_app_error())?,
        Command::Extend => tracker.extend().await.map_err(|e| e.to_app_error())?,
        Command::Logout => {
            if !tracker.logout() {
                tracing::info!("No expiration warning to close");
            }
        }
        Command::Expired => auth.expire().await.map_err(|e| e.to_app_error())?,
        Command::Login { email, password } => login(form, auth, &email, &password).await?,
        Command::State => {
            let state = serde_json::to_string_pretty(&tracker.state())?;
            tracing::info!("{state}");
        }
        Command::Help => tracing::info!("{HELP}"),
        Command::Quit => {}
    }
    Ok(())
}

async fn login(
    form: &LoginForm,
    auth: &AuthSimulator,
    email: &str,
    password: &str,
) -> AppResult<()> {
    form.handle_change("email", email);
    form.handle_change("password", password);
    form.handle_blur();

    let mut loading = LoadingGate::start(LoadingConfig::default());
    let result = form.submit(|values| auth.sign_in(values)).await;
    loading.finish_and_wait().await;

    match result {
        Ok(()) => {
            tracing::info!(
                warning_secs = auth.warning_secs(),
                "Signed in; expiration warning scheduled"
            );
            auth.warn(None).await.map_err(|e| e.to_app_error())
        }
        Err(e) => {
            for (field, message) in form.errors().iter() {
                tracing::warn!(field = %field, "{message}");
            }
            tracing::debug!(attempts = form.attempt_count(), "Login attempt failed");
            Err(e.to_app_error())
        }
    }
}

/// Log tracker events; on expiry, let the auth layer sign the user out
fn log_events(tracker: &ExpirationTracker, auth: AuthSimulator) -> TaskGuard {
    let mut events = tracker.subscribe();
    let tracker = tracker.clone();
    TaskGuard::spawn("event_log", async move {
        loop {
            let event = match events.recv().await {
                Ok(event) => event,
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Event log lagging");
                    continue;
                }
                Err(RecvError::Closed) => break,
            };

            match event {
                TrackerEvent::Started {
                    total_seconds,
                    message,
                } => {
                    tracing::info!(total_seconds, "{message} (type `extend` or `logout`)");
                }
                TrackerEvent::Tick { seconds_remaining } => {
                    let total = tracker.state().total_warning_window.max(seconds_remaining);
                    let view = CountdownView::new(seconds_remaining, total);
                    if view.is_critical {
                        tracing::warn!(left = %view.clock_label(), "{}", view.extend_label());
                    } else {
                        tracing::debug!(left = %view.clock_label(), percent = view.percent(), "{}", view.headline());
                    }
                }
                TrackerEvent::Extended => tracing::info!("Session continued"),
                TrackerEvent::LoggedOut => tracing::info!("Signed out from the warning"),
                TrackerEvent::Expired => {
                    if let Err(e) = auth.expire().await {
                        tracing::warn!("{}", e.to_app_error());
                    }
                }
                TrackerEvent::NotificationAdded { notification } => {
                    tracing::info!(kind = %notification.kind, "{}", notification.message);
                }
                TrackerEvent::NotificationRemoved { id } => {
                    tracing::debug!(%id, "Toast dismissed");
                }
            }
        }
    })
}
