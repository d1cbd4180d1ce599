//! `tabforge` - shell completion script generator
//!
//! Reads a YAML description of a command tree and turns it into a bash, zsh
//! or fish completion script. The model lives in `tabforge-core` and the
//! generators in `tabforge-script`; this crate holds the description loader,
//! the validator and the command-line front end.

pub mod cli;
pub mod config;
pub mod error;
pub mod observability;
