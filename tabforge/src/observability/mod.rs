//! Observability module
//!
//! Logging infrastructure for `tabforge`. Logs always go to stderr so that
//! stdout carries nothing but the generated script.

pub mod logging;

pub use logging::{LogFormat, init_logging};
