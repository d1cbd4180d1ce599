//! Description file validation.
//!
//! Every file is checked even when an earlier one fails, and the report
//! covers all of them.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tabforge_core::error::ConfigError;

use crate::cli::args::{OutputFormat, ValidateArgs};
use crate::config::{ConfigLoader, LoaderOptions};
use crate::error::TabforgeError;

use super::write_stdout;

/// Validation outcome for one file.
#[derive(Debug, Serialize)]
struct FileReport {
    file: PathBuf,
    valid: bool,
    errors: Vec<String>,
    warnings: Vec<String>,
}

/// Execute `validate`.
///
/// # Errors
///
/// Returns [`ConfigError::ValidationFailed`] if any file fails, or an I/O
/// error if the report cannot be written.
pub fn run(args: &ValidateArgs) -> Result<(), TabforgeError> {
    let loader = ConfigLoader::new(LoaderOptions {
        strict: args.strict,
        ..LoaderOptions::default()
    });

    let reports: Vec<FileReport> = args
        .files
        .iter()
        .map(|path| check_file(&loader, path))
        .collect();

    let output = match args.format {
        OutputFormat::Human => render_human(&reports),
        OutputFormat::Json => format!("{}\n", serde_json::to_string_pretty(&reports)?),
    };
    write_stdout(&output)?;

    let failed = reports.iter().filter(|report| !report.valid).count();
    if failed > 0 {
        return Err(ConfigError::ValidationFailed { count: failed }.into());
    }
    Ok(())
}

fn check_file(loader: &ConfigLoader, path: &Path) -> FileReport {
    tracing::info!(file = %path.display(), "validating command description");

    match loader.load(path) {
        Ok(loaded) => FileReport {
            file: path.to_path_buf(),
            valid: true,
            errors: Vec::new(),
            warnings: loaded.warnings.iter().map(ToString::to_string).collect(),
        },
        Err(ConfigError::ValidationError { errors, .. }) => FileReport {
            file: path.to_path_buf(),
            valid: false,
            errors: errors.iter().map(|issue| located(&issue.message, &issue.path)).collect(),
            warnings: Vec::new(),
        },
        Err(e) => FileReport {
            file: path.to_path_buf(),
            valid: false,
            errors: vec![e.to_string()],
            warnings: Vec::new(),
        },
    }
}

fn located(message: &str, path: &str) -> String {
    if path.is_empty() {
        message.to_string()
    } else {
        format!("{message} at {path}")
    }
}

fn render_human(reports: &[FileReport]) -> String {
    let mut lines = Vec::new();
    for report in reports {
        let status = if report.valid { "ok" } else { "FAILED" };
        lines.push(format!("{}: {status}", report.file.display()));
        lines.extend(report.errors.iter().map(|e| format!("  error: {e}")));
        lines.extend(report.warnings.iter().map(|w| format!("  warning: {w}")));
    }

    let failed = reports.iter().filter(|report| !report.valid).count();
    lines.push(String::new());
    if failed == 0 {
        lines.push(format!("{} file(s) valid", reports.len()));
    } else {
        lines.push(format!("{failed} of {} file(s) failed validation", reports.len()));
    }

    let mut text = lines.join("\n");
    text.push('\n');
    text
}
