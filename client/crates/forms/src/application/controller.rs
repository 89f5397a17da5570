//! Form Controller
//!
//! Holds a form's values and errors, sanitizes input as it is typed,
//! validates on blur and submit, and rate-limits submissions.
//!
//! ## Submit lifecycle
//! 1. Consult the controller's rate limiter; if rejected, set a single
//!    `submit` error and stop (no callback, `attempt_count` untouched)
//! 2. Re-validate; if any field fails, store the errors and stop
//! 3. Set `submitting`, await the callback with a snapshot of the values
//! 4. Success resets `attempt_count` to 0; failure stores the error message
//!    under `submit` and increments `attempt_count`
//! 5. Clear `submitting`, also when the submit future is dropped early
//!
//! The controller does not guard against overlapping submissions: callers
//! disable their trigger while [`FormController::is_submitting`] is `true`.

use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;

use kernel::FieldErrors;
use parking_lot::Mutex;
use platform::clock::{Clock, system_clock};
use platform::rate_limit::RateLimiter;
use platform::sanitize::sanitize_input;
use serde::Serialize;

use crate::application::config::FormConfig;
use crate::domain::FormValues;
use crate::error::{FormError, FormResult};

/// Snapshot of a form
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FormState {
    pub values: FormValues,
    pub errors: FieldErrors,
    pub submitting: bool,
    pub attempt_count: u32,
}

/// Generic form controller
///
/// Cloning yields another handle to the same form, so a view can read
/// [`is_submitting`](Self::is_submitting) while a submission is awaited.
///
/// ```rust
/// use forms::{FormController, FormValues, validators::validate_login};
///
/// let form = FormController::new(FormValues::new(), validate_login);
/// form.handle_change("email", "  a@b.com ");
/// assert_eq!(form.values()["email"], "a@b.com");
/// ```
pub struct FormController<V> {
    state: Arc<Mutex<FormState>>,
    validate: Arc<V>,
    limiter: Arc<RateLimiter>,
    config: Arc<FormConfig>,
}

impl<V> Clone for FormController<V> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            validate: self.validate.clone(),
            limiter: self.limiter.clone(),
            config: self.config.clone(),
        }
    }
}

impl<V> FormController<V>
where
    V: Fn(&FormValues) -> FieldErrors + Send + Sync,
{
    pub fn new(initial: FormValues, validate: V) -> Self {
        Self::with_config(initial, validate, FormConfig::default(), system_clock())
    }

    pub fn with_config(
        initial: FormValues,
        validate: V,
        config: FormConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        // One limiter for the controller's whole lifetime.
        let limiter = RateLimiter::with_clock(config.submit_rate_limit.clone(), clock);
        Self {
            state: Arc::new(Mutex::new(FormState {
                values: initial,
                ..FormState::default()
            })),
            validate: Arc::new(validate),
            limiter: Arc::new(limiter),
            config: Arc::new(config),
        }
    }

    // ========================================================================
    // Field events
    // ========================================================================

    /// Sanitize and store a field value. Does not validate.
    pub fn handle_change(&self, field: &str, raw: &str) {
        let value = sanitize_input(raw);
        tracing::trace!(field, "Field changed");
        self.state.lock().values.insert(field.to_string(), value);
    }

    /// Re-validate every field and store the result
    pub fn handle_blur(&self) -> FieldErrors {
        let mut state = self.state.lock();
        let errors = (self.validate)(&state.values);
        state.errors = errors.clone();
        errors
    }

    /// Replace all values at once (e.g. when editing an existing product)
    pub fn set_values(&self, values: FormValues) {
        let sanitized = values
            .into_iter()
            .map(|(field, raw)| {
                let value = sanitize_input(&raw);
                (field, value)
            })
            .collect();
        self.state.lock().values = sanitized;
    }

    // ========================================================================
    // Submission
    // ========================================================================

    /// Run the submit lifecycle with `on_valid`
    ///
    /// The returned error has already been stored in the form's `errors`.
    pub async fn submit<F, Fut, E>(&self, on_valid: F) -> FormResult<()>
    where
        F: FnOnce(FormValues) -> Fut,
        Fut: Future<Output = Result<(), E>>,
        E: Display,
    {
        let values = {
            let mut state = self.state.lock();

            if !self.limiter.attempt(&self.config.submit_key) {
                let err = FormError::RateLimited;
                state.errors = err.field_errors();
                err.log();
                return Err(err);
            }

            let errors = (self.validate)(&state.values);
            state.errors = errors.clone();
            if !errors.is_valid() {
                let err = FormError::Invalid(errors);
                err.log();
                return Err(err);
            }

            state.submitting = true;
            state.values.clone()
        };

        // Clears `submitting` if this future is dropped mid-await.
        let mut flag = SubmittingFlag {
            state: &self.state,
            armed: true,
        };
        let outcome = on_valid(values).await;

        let mut state = self.state.lock();
        state.submitting = false;
        flag.armed = false;
        match outcome {
            Ok(()) => {
                state.attempt_count = 0;
                tracing::info!("Form submitted");
                Ok(())
            }
            Err(e) => {
                let err = FormError::Submission(e.to_string());
                state.errors = err.field_errors();
                state.attempt_count += 1;
                err.log();
                Err(err)
            }
        }
    }

    /// Bind a callback, yielding a handler that can be invoked repeatedly
    pub fn handle_submit<F, Fut, E>(&self, on_valid: F) -> SubmitHandler<V, F>
    where
        F: Fn(FormValues) -> Fut,
        Fut: Future<Output = Result<(), E>>,
        E: Display,
    {
        SubmitHandler {
            form: self.clone(),
            on_valid,
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn state(&self) -> FormState {
        self.state.lock().clone()
    }

    pub fn values(&self) -> FormValues {
        self.state.lock().values.clone()
    }

    pub fn errors(&self) -> FieldErrors {
        self.state.lock().errors.clone()
    }

    pub fn is_submitting(&self) -> bool {
        self.state.lock().submitting
    }

    pub fn attempt_count(&self) -> u32 {
        self.state.lock().attempt_count
    }

    pub fn config(&self) -> &FormConfig {
        &self.config
    }
}

struct SubmittingFlag<'a> {
    state: &'a Mutex<FormState>,
    armed: bool,
}

impl Drop for SubmittingFlag<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.state.lock().submitting = false;
            tracing::debug!("Submission abandoned");
        }
    }
}

/// A submit callback bound to its form
pub struct SubmitHandler<V, F> {
    form: FormController<V>,
    on_valid: F,
}

impl<V, F> SubmitHandler<V, F>
where
    V: Fn(&FormValues) -> FieldErrors + Send + Sync,
{
    pub async fn invoke<Fut, E>(&self) -> FormResult<()>
    where
        F: Fn(FormValues) -> Fut,
        Fut: Future<Output = Result<(), E>>,
        E: Display,
    {
        self.form.submit(|values| (self.on_valid)(values)).await
    }

    pub fn form(&self) -> &FormController<V> {
        &self.form
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::account::validate_login;
    use platform::clock::ManualClock;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn require_email(values: &FormValues) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if values.get("email").is_none_or(|v| v.is_empty()) {
            errors.insert("email", "Email is required");
        }
        errors
    }

    fn form_with_clock<V>(validate: V) -> (FormController<V>, Arc<ManualClock>)
    where
        V: Fn(&FormValues) -> FieldErrors + Send + Sync,
    {
        let clock = Arc::new(ManualClock::new(0));
        let form =
            FormController::with_config(FormValues::new(), validate, FormConfig::default(), clock.clone());
        (form, clock)
    }

    async fn ok(_: FormValues) -> Result<(), String> {
        Ok(())
    }

    async fn fail(_: FormValues) -> Result<(), String> {
        Err("Server unavailable".to_string())
    }

    #[test]
    fn test_change_sanitizes_without_validating() {
        let form = FormController::new(FormValues::new(), require_email);
        form.handle_change("name", "  <script>x()</script>Ana ");
        assert_eq!(form.values()["name"], "Ana");
        assert!(form.errors().is_valid());
    }

    #[test]
    fn test_blur_round_trip() {
        let form = FormController::new(FormValues::new(), require_email);
        form.handle_change("email", "");
        form.handle_blur();
        assert_eq!(form.errors().get("email"), Some("Email is required"));

        form.handle_change("email", "a@b.com");
        form.handle_blur();
        assert!(!form.errors().contains("email"));
    }

    #[tokio::test]
    async fn test_invalid_submit_does_not_call_back() {
        let form = FormController::new(FormValues::new(), require_email);
        let calls = AtomicUsize::new(0);
        let result = form
            .submit(|_| async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok::<(), String>(())
            })
            .await;
        assert!(matches!(result, Err(FormError::Invalid(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(form.errors().get("email"), Some("Email is required"));
        assert_eq!(form.attempt_count(), 0);
    }

    #[tokio::test]
    async fn test_failure_increments_and_success_resets() {
        let (form, _clock) = form_with_clock(require_email);
        form.handle_change("email", "a@b.com");

        assert!(form.submit(fail).await.is_err());
        assert_eq!(form.attempt_count(), 1);
        assert_eq!(form.errors().get("submit"), Some("Server unavailable"));
        assert!(!form.is_submitting());

        assert!(form.submit(fail).await.is_err());
        assert_eq!(form.attempt_count(), 2);

        form.submit(ok).await.unwrap();
        assert_eq!(form.attempt_count(), 0);
        assert!(form.errors().is_valid());
    }

    #[tokio::test]
    async fn test_sixth_submit_is_rate_limited() {
        let (form, clock) = form_with_clock(require_email);
        form.handle_change("email", "a@b.com");

        for _ in 0..5 {
            form.submit(ok).await.unwrap();
        }

        let calls = AtomicUsize::new(0);
        let result = form
            .submit(|_| async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err::<(), _>("unreachable")
            })
            .await;
        assert!(matches!(result, Err(FormError::RateLimited)));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(form.attempt_count(), 0);
        assert_eq!(
            form.errors().get("submit"),
            Some("Too many attempts. Please wait a moment.")
        );
        assert_eq!(form.errors().len(), 1);

        clock.advance_ms(60_000);
        form.submit(ok).await.unwrap();
    }

    #[tokio::test]
    async fn test_rate_limited_keeps_attempt_count() {
        let (form, _clock) = form_with_clock(require_email);
        form.handle_change("email", "a@b.com");
        for _ in 0..5 {
            let _ = form.submit(fail).await;
        }
        assert_eq!(form.attempt_count(), 5);
        assert!(matches!(form.submit(fail).await, Err(FormError::RateLimited)));
        assert_eq!(form.attempt_count(), 5);
    }

    #[tokio::test]
    async fn test_limiter_survives_clones() {
        let (form, _clock) = form_with_clock(require_email);
        form.handle_change("email", "a@b.com");
        for _ in 0..5 {
            // Each clone stands in for a re-render holding a fresh handle.
            form.clone().submit(ok).await.unwrap();
        }
        assert!(matches!(form.clone().submit(ok).await, Err(FormError::RateLimited)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_submitting_visible_while_awaiting() {
        let form = FormController::new(FormValues::new(), require_email);
        form.handle_change("email", "a@b.com");

        let observer = form.clone();
        let pending = tokio::spawn(async move {
            observer
                .submit(|_| async {
                    tokio::time::sleep(Duration::from_secs(2)).await;
                    Ok::<(), String>(())
                })
                .await
        });

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(form.is_submitting());

        pending.await.unwrap().unwrap();
        assert!(!form.is_submitting());
    }

    #[tokio::test(start_paused = true)]
    async fn test_abandoned_submit_clears_submitting() {
        let form = FormController::new(FormValues::new(), require_email);
        form.handle_change("email", "a@b.com");

        let slow = form.submit(|_| async {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok::<(), String>(())
        });
        let result = tokio::time::timeout(Duration::from_secs(1), slow).await;
        assert!(result.is_err());

        assert!(!form.is_submitting());
        assert_eq!(form.attempt_count(), 0);
        form.submit(ok).await.unwrap();
    }

    #[tokio::test]
    async fn test_submit_handler_is_reusable() {
        let form = FormController::new(FormValues::new(), validate_login);
        form.handle_change("email", "ana@tienda.es");
        form.handle_change("password", "secreto");

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let handler = form.handle_submit(move |values: FormValues| {
            let sink = sink.clone();
            async move {
                sink.lock().push(values["email"].clone());
                Ok::<(), String>(())
            }
        });

        handler.invoke().await.unwrap();
        handler.invoke().await.unwrap();
        assert_eq!(seen.lock().as_slice(), ["ana@tienda.es", "ana@tienda.es"]);
        assert_eq!(handler.form().attempt_count(), 0);
    }

    #[tokio::test]
    async fn test_password_reaches_callback_sanitized() {
        let form = FormController::new(FormValues::new(), validate_login);
        form.handle_change("email", "ana@tienda.es");
        form.handle_change("password", " Abcdef1< ");
        assert!(form.handle_blur().is_valid());

        let seen = Arc::new(Mutex::new(String::new()));
        let sink = seen.clone();
        form.submit(move |values: FormValues| async move {
            *sink.lock() = values["password"].clone();
            Ok::<(), String>(())
        })
        .await
        .unwrap();
        assert_eq!(seen.lock().as_str(), "Abcdef1&lt;");
    }

    #[test]
    fn test_set_values_sanitizes() {
        let form = FormController::new(FormValues::new(), require_email);
        let mut values = FormValues::new();
        values.insert("title".into(), " <b>Zelda</b> ".into());
        form.set_values(values);
        assert_eq!(form.values()["title"], "Zelda");
    }
}
