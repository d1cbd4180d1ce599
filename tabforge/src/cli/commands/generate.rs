//! Completion script generation from a description file.

use std::fs;
use std::path::Path;

use crate::cli::args::GenerateArgs;
use crate::config::{ConfigLoader, LoaderOptions};
use crate::error::TabforgeError;

use super::write_stdout;

/// Execute `generate`.
///
/// Loads and validates the description, generates the script for the
/// requested shell, and prints it or writes it to `--output`.
///
/// # Errors
///
/// Returns an error if the description cannot be read or fails validation,
/// or if the script cannot be written.
pub fn run(args: &GenerateArgs) -> Result<(), TabforgeError> {
    if !args.spec.exists() {
        return Err(TabforgeError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("file not found: {}", args.spec.display()),
        )));
    }
    tracing::info!(file = %args.spec.display(), shell = %args.shell, "generating completion script");

    let loader = ConfigLoader::new(LoaderOptions {
        strict: args.strict,
        ..LoaderOptions::default()
    });
    let loaded = loader.load(&args.spec)?;

    for warning in &loaded.warnings {
        tracing::warn!(
            location = warning.location.as_deref().unwrap_or("<unknown>"),
            "{}",
            warning.message
        );
    }

    let script = tabforge_script::generate(args.shell, &loaded.command);
    if script.is_empty() {
        tracing::warn!(
            command = loaded.command.name(),
            shell = %args.shell,
            "nothing to complete, the script is empty"
        );
    }

    match &args.output {
        Some(path) => write_script(path, &script),
        None => write_stdout(&script),
    }
}

fn write_script(path: &Path, script: &str) -> Result<(), TabforgeError> {
    if path.is_dir() {
        return Err(TabforgeError::Usage(format!(
            "--output must be a file path, but {} is a directory",
            path.display()
        )));
    }

    fs::write(path, script).map_err(|e| {
        TabforgeError::Io(std::io::Error::new(
            e.kind(),
            format!("failed to write {}: {e}", path.display()),
        ))
    })?;

    tracing::info!(path = %path.display(), bytes = script.len(), "completion script written");
    Ok(())
}
