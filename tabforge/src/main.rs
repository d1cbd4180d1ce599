//! `tabforge` - shell completion script generator

use clap::Parser;

use tabforge::cli::args::Cli;
use tabforge::cli::commands;
use tabforge::error::ExitCode;
use tabforge::observability::init_logging;

fn main() {
    let cli = Cli::parse();

    if !cli.quiet {
        init_logging(cli.log_format, cli.verbose, cli.color);
    }

    match commands::dispatch(cli) {
        Ok(()) => std::process::exit(ExitCode::SUCCESS),
        Err(e) => {
            eprintln!("error: {e}");
            for issue in e.issues() {
                eprintln!("  {issue}");
            }
            std::process::exit(e.exit_code());
        }
    }
}
