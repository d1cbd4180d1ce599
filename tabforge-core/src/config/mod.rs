//! Command-tree description file schema.

pub mod schema;

pub use schema::{ArgumentSpec, CandidateSpec, CommandSpec, CustomSnippets, OptionSpec};
