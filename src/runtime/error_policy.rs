//! # Error Policy
//!
//! Turns the outcome of a reconcile into a requeue `Action`. Permanent
//! errors wait for the configured permanent interval; transient errors back
//! off per resource along the Fibonacci sequence until the next success.

use crate::config::ControllerConfig;
use crate::error::Error;
use crate::runtime::backoff::FibonacciBackoff;
use kube_runtime::controller::Action;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Requeue action for the given delay
#[must_use]
pub fn requeue_after(delay: Duration) -> Action {
    Action::requeue(delay)
}

fn resource_key(kind: &str, name: &str) -> String {
    format!("{kind}/{name}")
}

/// Backoff state for a single resource
#[derive(Debug, Clone)]
struct BackoffState {
    backoff: FibonacciBackoff,
    error_count: u32,
}

/// Per-resource requeue decisions shared by every controller
#[derive(Debug)]
pub struct ErrorPolicy {
    config: ControllerConfig,
    states: Mutex<HashMap<String, BackoffState>>,
}

impl ErrorPolicy {
    #[must_use]
    pub fn new(config: ControllerConfig) -> Self {
        Self {
            config,
            states: Mutex::new(HashMap::new()),
        }
    }

    /// Decides when a failed resource is retried.
    pub fn on_error(&self, kind: &str, name: &str, err: &Error) -> Action {
        if err.is_permanent() {
            warn!(
                resource.kind = kind,
                resource.name = name,
                error = %err,
                "Permanent error, waiting for the resource to change"
            );
            return requeue_after(self.config.permanent_error_requeue_duration());
        }

        let key = resource_key(kind, name);
        let Ok(mut states) = self.states.lock() else {
            warn!(resource = %key, "Backoff state unavailable, using default requeue");
            return requeue_after(self.config.reconciliation_error_requeue_duration());
        };
        let state = states.entry(key.clone()).or_insert_with(|| BackoffState {
            backoff: FibonacciBackoff::new(
                self.config.backoff_min_minutes,
                self.config.backoff_max_minutes,
            ),
            error_count: 0,
        });
        state.error_count = state.error_count.saturating_add(1);
        let delay = state.backoff.next_backoff();

        warn!(
            resource = %key,
            error_count = state.error_count,
            error = %err,
            "Reconcile failed"
        );
        info!(resource = %key, delay_secs = delay.as_secs(), "Retrying with Fibonacci backoff");
        requeue_after(delay)
    }

    /// Clears any backoff for the resource and schedules the next poll.
    pub fn on_success(&self, kind: &str, name: &str) -> Action {
        if let Ok(mut states) = self.states.lock() {
            states.remove(&resource_key(kind, name));
        }
        requeue_after(self.config.poll_interval_duration())
    }

    /// Drops the backoff state of a resource that no longer exists.
    ///
    /// Called once the finalizer of a deleted resource has run.
    pub fn forget(&self, kind: &str, name: &str) {
        if let Ok(mut states) = self.states.lock() {
            if states.remove(&resource_key(kind, name)).is_some() {
                debug!(resource = %resource_key(kind, name), "Dropped backoff state");
            }
        }
    }

    /// Resources currently backing off
    #[must_use]
    pub fn tracked_resources(&self) -> usize {
        self.states.lock().map(|states| states.len()).unwrap_or_default()
    }

    /// Consecutive failures recorded for the resource
    #[must_use]
    pub fn error_count(&self, kind: &str, name: &str) -> u32 {
        self.states
            .lock()
            .ok()
            .and_then(|states| states.get(&resource_key(kind, name)).map(|s| s.error_count))
            .unwrap_or_default()
    }
}
