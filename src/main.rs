//! `syw` entry point
//!
//! Parses the command line, runs the selected command and turns errors into
//! colored messages with suggestions.

use clap::Parser;
use showyourwork::cli::Cli;
use showyourwork::core::user_friendly_error;

fn main() {
    let cli = Cli::parse();

    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    if let Err(e) = cli.execute() {
        let error_ctx = user_friendly_error(e);
        error_ctx.display();
        std::process::exit(1);
    }
}
