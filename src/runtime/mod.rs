//! # Runtime
//!
//! Requeue scheduling for reconcile loops.
//!
//! - `backoff`: Fibonacci retry delays
//! - `error_policy`: per-resource requeue decisions

pub mod backoff;
pub mod error_policy;

pub use backoff::FibonacciBackoff;
pub use error_policy::{requeue_after, ErrorPolicy};
