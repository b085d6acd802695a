//! # Configuration
//!
//! Controller configuration loaded from the environment.

pub mod controller;

pub use controller::ControllerConfig;
