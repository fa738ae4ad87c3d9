//! arff-csv CLI - convert between CSV and ARFF.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Csv2arff(args) => commands::csv2arff::run(args, cli.verbose),

        Commands::Arff2csv {
            input,
            output,
            missing,
            missing_text,
            delimiter,
            include_index,
        } => commands::arff2csv::run(
            input,
            output,
            missing,
            missing_text,
            delimiter,
            include_index,
            cli.verbose,
        ),

        Commands::Info {
            input,
            missing,
            json,
        } => commands::info::run(input, missing, json, cli.verbose),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
