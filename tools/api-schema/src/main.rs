//! ruby-schema - inspect ruby identifiers, wire output and API schema.
//!
//! Builds the codec registry once at startup, then runs one command against
//! it. An incomplete registry stops the process before any command runs.

use anyhow::Result;
use clap::Parser;

mod commands;
mod logging;

use commands::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(&cli.log_level, cli.log_json);

    if let Err(e) = cli.run() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }

    Ok(())
}
