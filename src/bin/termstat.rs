//! termstat CLI binary.

use std::process;

use clap::Parser;
use termstat::cli::{args::*, commands::*};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() {
    let args = TermStatArgs::parse();

    // RUST_LOG wins over the command line verbosity.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(args.log_filter())))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = execute_command(args) {
        if e.is_persistence() {
            // Growth data that was asked for and not saved fails the run.
            eprintln!("Error: vocabulary growth data was not saved: {e}");
        } else {
            eprintln!("Error: {e}");
        }
        process::exit(1);
    }
}
