//! `tabforge` core: command-tree model and description-file schema
//!
//! This crate provides the read-only command tree consumed by
//! `tabforge-script` (completion script generation) and the YAML schema and
//! error types shared with `tabforge` (CLI).

pub mod config;
pub mod error;
pub mod model;

pub use model::{
    ArgArity, Argument, Command, CommandOption, CompletionCandidate, CustomGenerator, ShellKind,
};
