//! # Constants
//!
//! Shared constants used throughout the provider.
//!
//! These values represent reasonable defaults and can be overridden via
//! configuration or environment variables where applicable.

/// Default requeue interval for transient reconciliation errors (seconds)
pub const DEFAULT_RECONCILIATION_ERROR_REQUEUE_SECS: u64 = 60;

/// Default requeue interval for permanent errors (seconds)
/// The resource must be edited before a retry can succeed, so retry rarely
pub const DEFAULT_PERMANENT_ERROR_REQUEUE_SECS: u64 = 600;

/// Default Fibonacci backoff minimum (minutes)
pub const DEFAULT_BACKOFF_MIN_MINUTES: u64 = 1;

/// Default Fibonacci backoff maximum (minutes)
pub const DEFAULT_BACKOFF_MAX_MINUTES: u64 = 10;

/// Default interval between successful observations of a resource (seconds)
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 60;

/// Annotation holding the name of the resource in GitHub
pub const EXTERNAL_NAME_ANNOTATION: &str = "crossplane.io/external-name";

/// Membership state of a user who accepted the invitation
pub const MEMBERSHIP_STATE_ACTIVE: &str = "active";
