//! Command-line interface
//!
//! Argument definitions, command handlers, and the clap-to-model bridge
//! used for self-completion.

pub mod args;
pub mod commands;
pub mod introspect;
