//! Shell completion generation for tabforge itself
//!
//! Converts the CLI definition into the completion model and runs it through
//! the same generators used for description files.

use clap::CommandFactory;
use tabforge_core::{Command, ShellKind};

use crate::cli::args::{Cli, CompletionsArgs};
use crate::cli::introspect::command_from_clap;
use crate::error::TabforgeError;

use super::write_stdout;

/// Generate and print a completion script for `tabforge` to stdout.
///
/// # Errors
///
/// Returns an error if stdout cannot be written.
pub fn run(args: &CompletionsArgs) -> Result<(), TabforgeError> {
    let script = render(args.shell);
    tracing::debug!(shell = %args.shell, bytes = script.len(), "generated self-completion script");
    write_stdout(&script)
}

/// The completion model of the `tabforge` CLI.
#[must_use]
pub fn cli_model() -> Command {
    let mut cmd = Cli::command();
    cmd.build();
    command_from_clap(&cmd)
}

fn render(shell: ShellKind) -> String {
    tabforge_script::generate(shell, &cli_model())
}
