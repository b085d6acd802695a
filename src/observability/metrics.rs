//! # Metrics
//!
//! Prometheus metrics for the GitHub provider.
//!
//! ## Metrics Exposed
//!
//! - `provider_github_external_operations_total` - External operations by resource kind and operation
//! - `provider_github_external_operation_errors_total` - Failed external operations by kind, operation and reason
//! - `provider_github_external_operation_duration_seconds` - Duration of external operations
//! - `provider_github_late_initializations_total` - Resources whose spec was filled from GitHub
//! - `provider_github_drift_detected_total` - Observations that found GitHub out of sync
//!
//! Recording is skipped while `ENABLE_METRICS` is off; see [`configure_metrics`].

use crate::config::ControllerConfig;
use anyhow::Result;
use prometheus::{Encoder, HistogramVec, IntCounterVec, Registry, TextEncoder};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::LazyLock;

pub(crate) static REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);

static METRICS_ENABLED: AtomicBool = AtomicBool::new(true);

static EXTERNAL_OPERATIONS_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        prometheus::Opts::new(
            "provider_github_external_operations_total",
            "Total number of external operations by resource kind and operation",
        ),
        &["kind", "operation"],
    )
    .expect("Failed to create EXTERNAL_OPERATIONS_TOTAL metric - this should never happen")
});

static EXTERNAL_OPERATION_ERRORS_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        prometheus::Opts::new(
            "provider_github_external_operation_errors_total",
            "Total number of failed external operations by resource kind, operation and reason",
        ),
        &["kind", "operation", "reason"],
    )
    .expect("Failed to create EXTERNAL_OPERATION_ERRORS_TOTAL metric - this should never happen")
});

static EXTERNAL_OPERATION_DURATION: LazyLock<HistogramVec> = LazyLock::new(|| {
    HistogramVec::new(
        prometheus::HistogramOpts::new(
            "provider_github_external_operation_duration_seconds",
            "Duration of external operations in seconds",
        )
        .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.0, 5.0, 10.0]),
        &["kind", "operation"],
    )
    .expect("Failed to create EXTERNAL_OPERATION_DURATION metric - this should never happen")
});

static LATE_INITIALIZATIONS_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        prometheus::Opts::new(
            "provider_github_late_initializations_total",
            "Total number of specs late-initialized from GitHub",
        ),
        &["kind"],
    )
    .expect("Failed to create LATE_INITIALIZATIONS_TOTAL metric - this should never happen")
});

static DRIFT_DETECTED_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        prometheus::Opts::new(
            "provider_github_drift_detected_total",
            "Total number of observations where GitHub differed from the desired state",
        ),
        &["kind"],
    )
    .expect("Failed to create DRIFT_DETECTED_TOTAL metric - this should never happen")
});

#[allow(
    clippy::missing_errors_doc,
    reason = "Error documentation is provided in doc comments"
)]
/// Registers every collector with the crate registry.
///
/// Fails if called twice, since prometheus rejects duplicate collectors.
pub fn register_metrics() -> Result<()> {
    REGISTRY.register(Box::new(EXTERNAL_OPERATIONS_TOTAL.clone()))?;
    REGISTRY.register(Box::new(EXTERNAL_OPERATION_ERRORS_TOTAL.clone()))?;
    REGISTRY.register(Box::new(EXTERNAL_OPERATION_DURATION.clone()))?;
    REGISTRY.register(Box::new(LATE_INITIALIZATIONS_TOTAL.clone()))?;
    REGISTRY.register(Box::new(DRIFT_DETECTED_TOTAL.clone()))?;

    Ok(())
}

/// Applies the `enable_metrics` switch to every recording function.
pub fn configure_metrics(config: &ControllerConfig) {
    METRICS_ENABLED.store(config.enable_metrics, Ordering::Relaxed);
}

#[must_use]
pub fn metrics_enabled() -> bool {
    METRICS_ENABLED.load(Ordering::Relaxed)
}

/// Renders the registry in the Prometheus text exposition format
#[allow(
    clippy::missing_errors_doc,
    reason = "Error documentation is provided in doc comments"
)]
pub fn gather_metrics() -> Result<String> {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    encoder.encode(&REGISTRY.gather(), &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}

pub fn record_external_operation(kind: &str, operation: &str, duration: f64) {
    if !metrics_enabled() {
        return;
    }
    EXTERNAL_OPERATIONS_TOTAL
        .with_label_values(&[kind, operation])
        .inc();
    EXTERNAL_OPERATION_DURATION
        .with_label_values(&[kind, operation])
        .observe(duration);
}

pub fn increment_external_operation_errors(kind: &str, operation: &str, reason: &str) {
    if !metrics_enabled() {
        return;
    }
    EXTERNAL_OPERATION_ERRORS_TOTAL
        .with_label_values(&[kind, operation, reason])
        .inc();
}

pub fn increment_late_initializations(kind: &str) {
    if !metrics_enabled() {
        return;
    }
    LATE_INITIALIZATIONS_TOTAL.with_label_values(&[kind]).inc();
}

pub fn increment_drift_detected(kind: &str) {
    if !metrics_enabled() {
        return;
    }
    DRIFT_DETECTED_TOTAL.with_label_values(&[kind]).inc();
}
