//! Shared integration-test harness for running the `tabforge` binary.

#![allow(dead_code)]

use std::path::PathBuf;
use std::process::{Command, Output};

/// Runs `tabforge` with the given arguments and waits for it to exit.
///
/// Logging is silenced and environment overrides are cleared so the host
/// environment cannot leak into assertions.
#[allow(clippy::missing_panics_doc)]
#[must_use]
pub fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_tabforge"))
        .args(args)
        .env_remove("TABFORGE_SPEC")
        .env_remove("TABFORGE_LOG_LEVEL")
        .env_remove("TABFORGE_MAX_CONFIG_SIZE")
        .env_remove("TABFORGE_MAX_DEPTH")
        .env_remove("TABFORGE_MAX_SUBCOMMANDS")
        .env("TABFORGE_COLOR", "never")
        .output()
        .expect("failed to run tabforge")
}

/// Returns the path to a test fixture.
#[must_use]
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

/// Fixture path as a `&str`-compatible owned string.
#[must_use]
pub fn fixture(name: &str) -> String {
    fixture_path(name).display().to_string()
}

#[must_use]
pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[must_use]
pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}
