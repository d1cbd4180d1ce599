//! CLI command dispatch and handlers
//!
//! Routes parsed CLI arguments to the appropriate command handler.

pub mod completions;
pub mod generate;
pub mod validate;
pub mod version;

use std::io::Write;

use crate::cli::args::{Cli, Commands};
use crate::error::TabforgeError;

/// Dispatch a parsed CLI invocation to the appropriate command handler.
///
/// # Errors
///
/// Returns an error if the dispatched command handler fails.
pub fn dispatch(cli: Cli) -> Result<(), TabforgeError> {
    match cli.command {
        Commands::Generate(args) => generate::run(&args),
        Commands::Validate(args) => validate::run(&args),
        Commands::Completions(args) => completions::run(&args),
        Commands::Version(args) => version::run(&args),
    }
}

/// Writes `text` to stdout and flushes it.
fn write_stdout(text: &str) -> Result<(), TabforgeError> {
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(text.as_bytes())?;
    stdout.flush()?;
    Ok(())
}
