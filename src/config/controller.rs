//! # Controller Configuration
//!
//! Controller-level settings loaded from environment variables.

use std::time::Duration;

/// Controller-level configuration
///
/// All settings have sensible defaults and can be overridden via environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerConfig {
    /// Requeue interval used when the backoff state is unavailable (seconds)
    pub reconciliation_error_requeue_secs: u64,
    /// Requeue interval after a permanent error (seconds)
    pub permanent_error_requeue_secs: u64,
    /// Fibonacci backoff minimum (minutes)
    pub backoff_min_minutes: u64,
    /// Fibonacci backoff maximum (minutes)
    pub backoff_max_minutes: u64,
    /// Interval between observations of a converged resource (seconds)
    pub poll_interval_secs: u64,
    /// Global log level (ERROR, WARN, INFO, DEBUG, TRACE)
    pub log_level: String,
    /// Log format (json, text)
    pub log_format: String,
    /// Enable color in text format logs
    pub log_enable_color: bool,
    /// Enable metrics collection
    pub enable_metrics: bool,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        use crate::constants::{
            DEFAULT_BACKOFF_MAX_MINUTES, DEFAULT_BACKOFF_MIN_MINUTES,
            DEFAULT_PERMANENT_ERROR_REQUEUE_SECS, DEFAULT_POLL_INTERVAL_SECS,
            DEFAULT_RECONCILIATION_ERROR_REQUEUE_SECS,
        };
        Self {
            reconciliation_error_requeue_secs: DEFAULT_RECONCILIATION_ERROR_REQUEUE_SECS,
            permanent_error_requeue_secs: DEFAULT_PERMANENT_ERROR_REQUEUE_SECS,
            backoff_min_minutes: DEFAULT_BACKOFF_MIN_MINUTES,
            backoff_max_minutes: DEFAULT_BACKOFF_MAX_MINUTES,
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
            log_level: "INFO".to_string(),
            log_format: "json".to_string(),
            log_enable_color: false,
            enable_metrics: true,
        }
    }
}

impl ControllerConfig {
    /// Load configuration from environment variables with defaults
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup, falling back to defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            reconciliation_error_requeue_secs: var_or_default(
                &lookup,
                "RECONCILIATION_ERROR_REQUEUE_SECS",
                defaults.reconciliation_error_requeue_secs,
            ),
            permanent_error_requeue_secs: var_or_default(
                &lookup,
                "PERMANENT_ERROR_REQUEUE_SECS",
                defaults.permanent_error_requeue_secs,
            ),
            backoff_min_minutes: var_or_default(
                &lookup,
                "BACKOFF_MIN_MINUTES",
                defaults.backoff_min_minutes,
            ),
            backoff_max_minutes: var_or_default(
                &lookup,
                "BACKOFF_MAX_MINUTES",
                defaults.backoff_max_minutes,
            ),
            poll_interval_secs: var_or_default(
                &lookup,
                "POLL_INTERVAL_SECS",
                defaults.poll_interval_secs,
            ),
            log_level: lookup("LOG_LEVEL").unwrap_or(defaults.log_level),
            log_format: lookup("LOG_FORMAT").unwrap_or(defaults.log_format),
            log_enable_color: var_or_default_bool(
                &lookup,
                "LOG_ENABLE_COLOR",
                defaults.log_enable_color,
            ),
            enable_metrics: var_or_default_bool(&lookup, "ENABLE_METRICS", defaults.enable_metrics),
        }
    }

    /// Get reconciliation error requeue duration
    #[must_use]
    pub fn reconciliation_error_requeue_duration(&self) -> Duration {
        Duration::from_secs(self.reconciliation_error_requeue_secs)
    }

    /// Get permanent error requeue duration
    #[must_use]
    pub fn permanent_error_requeue_duration(&self) -> Duration {
        Duration::from_secs(self.permanent_error_requeue_secs)
    }

    /// Get poll interval duration
    #[must_use]
    pub fn poll_interval_duration(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }
}

/// Read a variable and parse it, or return the default
fn var_or_default<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> T {
    lookup(key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// Read a variable as boolean or return the default
fn var_or_default_bool(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: bool) -> bool {
    lookup(key)
        .map(|v| {
            let v_lower = v.to_lowercase();
            v_lower == "true" || v_lower == "1" || v_lower == "yes" || v_lower == "on"
        })
        .unwrap_or(default)
}
