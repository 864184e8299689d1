//! Zipcheck CLI - Command-line utility for verifying the CRC-32 integrity of
//! ZIP archives.

mod cli;
mod commands;
mod error;
mod logging;
mod output;
mod progress;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    logging::init(cli.verbose);

    let formatter = output::create_formatter(cli.json, cli.verbose, cli.quiet);

    match &cli.command {
        cli::Commands::Verify(args) => {
            commands::verify::execute(args, &*formatter, !cli.quiet && !cli.json)
        }
        cli::Commands::List(args) => commands::list::execute(args, &*formatter),
    }
}
