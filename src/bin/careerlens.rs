//! CareerLens CLI binary.

use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use careerlens::cli::args::*;
use careerlens::cli::commands::*;

fn main() {
    // Parse command line arguments using clap
    let args = CareerLensArgs::parse();

    // RUST_LOG wins over the verbosity flags
    let level = match args.verbosity() {
        0 => "error",
        1 => "warn",
        2 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("careerlens={level},tower_http={level}")));

    // stdout carries line-mode responses, so logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    // Execute the command
    if let Err(e) = execute_command(args) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
