//! Version information display
//!
//! Prints the package name and version in human or JSON format.

use crate::cli::args::{OutputFormat, VersionArgs};
use crate::error::TabforgeError;

use super::write_stdout;

/// Print version information.
///
/// # Errors
///
/// Returns an error if stdout cannot be written.
pub fn run(args: &VersionArgs) -> Result<(), TabforgeError> {
    write_stdout(&render(args.format)?)
}

fn render(format: OutputFormat) -> Result<String, TabforgeError> {
    let name = env!("CARGO_PKG_NAME");
    let version = env!("CARGO_PKG_VERSION");

    Ok(match format {
        OutputFormat::Human => format!("{name} {version}\n"),
        OutputFormat::Json => {
            let json = serde_json::json!({ "name": name, "version": version });
            format!("{}\n", serde_json::to_string(&json)?)
        }
    })
}
