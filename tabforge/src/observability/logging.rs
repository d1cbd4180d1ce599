//! Logging setup for `tabforge`.
//!
//! Logs always go to stderr so stdout carries nothing but the generated
//! script. `-v` flags raise the level of tabforge's own crates only;
//! dependencies stay at `warn` unless `TABFORGE_LOG_LEVEL` says otherwise.

use std::io::IsTerminal;

use clap::ValueEnum;
use tracing_subscriber::EnvFilter;

use crate::cli::args::ColorChoice;

/// Crates whose level follows `-v`.
const OWN_CRATES: [&str; 3] = ["tabforge", "tabforge_core", "tabforge_script"];

/// Log line rendering on stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    /// Plain text, colored when enabled.
    #[default]
    Human,
    /// One JSON object per line.
    Json,
}

/// Level name for a `-v` count (0 warn, 1 info, 2 debug, 3+ trace).
#[must_use]
pub const fn verbosity_to_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Filter directive string for a `-v` count, e.g.
/// `warn,tabforge=debug,tabforge_core=debug,tabforge_script=debug`.
#[must_use]
pub fn default_directives(verbosity: u8) -> String {
    let level = verbosity_to_directive(verbosity);
    let mut directives = vec!["warn".to_string()];
    directives.extend(OWN_CRATES.iter().map(|krate| format!("{krate}={level}")));
    directives.join(",")
}

/// Whether ANSI colors should be used.
///
/// `auto` needs a terminal on stderr and no `NO_COLOR` in the environment.
#[must_use]
pub const fn ansi_enabled(color: ColorChoice, stderr_is_terminal: bool, no_color_set: bool) -> bool {
    match color {
        ColorChoice::Auto => stderr_is_terminal && !no_color_set,
        ColorChoice::Always => true,
        ColorChoice::Never => false,
    }
}

/// Installs the global tracing subscriber.
///
/// A valid `TABFORGE_LOG_LEVEL` filter replaces the verbosity-derived one.
/// Calling this again is a no-op.
pub fn init_logging(format: LogFormat, verbosity: u8, color: ColorChoice) {
    let filter = EnvFilter::try_from_env("TABFORGE_LOG_LEVEL")
        .unwrap_or_else(|_| EnvFilter::new(default_directives(verbosity)));

    // Targets only help once there is enough output to need them.
    let show_target = verbosity >= 2;

    let result = match format {
        LogFormat::Human => {
            let ansi = ansi_enabled(
                color,
                std::io::stderr().is_terminal(),
                std::env::var_os("NO_COLOR").is_some(),
            );
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(ansi)
                .with_target(show_target)
                .with_writer(std::io::stderr)
                .try_init()
        }
        LogFormat::Json => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .with_target(show_target)
            .with_writer(std::io::stderr)
            .try_init(),
    };

    if result.is_err() {
        tracing::trace!("logging already initialized");
    }
}
