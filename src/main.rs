use std::{io, process};

use clap::Parser;
use tracing_subscriber::EnvFilter;

use marvelstats::{app, cli::Args};

fn main() {
    // Logs go to stderr so the report on stdout stays clean.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let stdout = io::stdout();

    if let Err(e) = app::run(&args, &mut stdout.lock()) {
        eprintln!("ERROR: {e:#}");
        process::exit(1);
    }
}
