//! GitHub Provider Library
//!
//! Reconciles GitHub repositories, Actions secrets, organization memberships
//! and repository files declared as Kubernetes managed resources.
//!
//! ## Quick Start
//!
//! ```rust
//! use provider_github::prelude::*;
//! ```
//!
//! This brings commonly used types and traits into scope. For more specific imports,
//! use the individual modules.

pub mod config;
pub mod constants;
pub mod controller;
pub mod crd;
pub mod error;
pub mod observability;
pub mod prelude;
pub mod provider;
pub mod runtime;
