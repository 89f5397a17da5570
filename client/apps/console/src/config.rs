//! Console Configuration
//!
//! Read from the environment after `.env` has been loaded.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use anyhow::Context;
use forms::FormConfig;
use session::SessionConfig;

#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    /// Countdown length of a simulated expiration warning
    pub warning_secs: u32,
    pub session: SessionConfig,
    pub form: FormConfig,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            warning_secs: 60,
            session: SessionConfig::default(),
            form: FormConfig::default(),
        }
    }
}

impl ConsoleConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build from any variable source; unset variables keep their defaults
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let warning_secs = parse_or(&lookup, "SESSION_WARNING_SECS", defaults.warning_secs)?;
        let tick_ms = parse_or(
            &lookup,
            "SESSION_TICK_MS",
            defaults.session.tick_period_ms() as u64,
        )?;
        let max_attempts = parse_or(
            &lookup,
            "FORM_MAX_ATTEMPTS",
            defaults.form.submit_rate_limit.max_requests,
        )?;
        let window_secs = parse_or(
            &lookup,
            "FORM_WINDOW_SECS",
            defaults.form.submit_rate_limit.window.as_secs(),
        )?;

        if tick_ms == 0 {
            anyhow::bail!("SESSION_TICK_MS must be greater than zero");
        }

        Ok(Self {
            warning_secs,
            session: SessionConfig::with_tick_period(Duration::from_millis(tick_ms)),
            form: FormConfig::with_rate_limit(max_attempts, Duration::from_secs(window_secs)),
        })
    }
}

fn parse_or<T, F>(lookup: &F, name: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{name} is not valid: {raw:?}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ConsoleConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.warning_secs, 60);
        assert_eq!(config.session.tick_period, Duration::from_secs(1));
        assert_eq!(config.form.submit_rate_limit.max_requests, 5);
        assert_eq!(config.form.submit_window_ms(), 60_000);
    }

    #[test]
    fn test_overrides() {
        let config = ConsoleConfig::from_lookup(lookup(&[
            ("SESSION_WARNING_SECS", "15"),
            ("SESSION_TICK_MS", "250"),
            ("FORM_MAX_ATTEMPTS", "3"),
            ("FORM_WINDOW_SECS", "10"),
        ]))
        .unwrap();
        assert_eq!(config.warning_secs, 15);
        assert_eq!(config.session.tick_period_ms(), 250);
        assert_eq!(config.form.submit_rate_limit.max_requests, 3);
        assert_eq!(config.form.submit_window_ms(), 10_000);
    }

    #[test]
    fn test_invalid_values() {
        let err = ConsoleConfig::from_lookup(lookup(&[("SESSION_WARNING_SECS", "soon")]))
            .unwrap_err();
        assert!(err.to_string().contains("SESSION_WARNING_SECS"));

        assert!(ConsoleConfig::from_lookup(lookup(&[("SESSION_TICK_MS", "0")])).is_err());
    }
}
