//! # Controller
//!
//! External clients reconciling each managed resource kind against GitHub.
//!
//! - `managed`: resource handle, outcomes and the `ExternalClient` trait
//! - `store`: Kubernetes-backed persistence and secret extraction
//! - `repository`: repositories, including drift detection and late initialization
//! - `secrets`: Actions secrets sealed with the repository public key
//! - `membership`: organization memberships
//! - `content`: files in a repository

pub mod content;
pub mod managed;
pub mod membership;
pub mod repository;
pub mod secrets;
pub mod store;

use crate::error::Result;
use crate::observability::metrics;
use std::future::Future;
use std::time::Instant;
use tracing::{info_span, warn, Instrument};

/// Runs one external operation inside a span and records its metrics.
pub(crate) async fn instrumented<T>(
    kind: &'static str,
    operation: &'static str,
    name: &str,
    operation_future: impl Future<Output = Result<T>>,
) -> Result<T> {
    let span = info_span!(
        "external",
        resource.kind = kind,
        resource.name = %name,
        operation = operation
    );
    let start = Instant::now();
    let result = operation_future.instrument(span.clone()).await;
    metrics::record_external_operation(kind, operation, start.elapsed().as_secs_f64());

    if let Err(err) = &result {
        span.in_scope(|| warn!(error = %err, permanent = err.is_permanent(), "External operation failed"));
        metrics::increment_external_operation_errors(kind, operation, err.reason());
    }
    result
}
