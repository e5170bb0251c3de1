//! Drug interaction checker CLI.
//!
//! Usage:
//!   drug-interactions drugs
//!   drug-interactions check Warfarin Aspirin --age 40
//!   drug-interactions add --drug1 A --drug2 B --interaction ... --severity mild --age 30 \
//!       --dosage ... --alternative ...
//!   drug-interactions extract "Take Amoxicillin 500mg and Ibuprofen 200mg" [--model]

mod cli;
mod commands;
mod config;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::Cli;
use config::AppConfig;

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = AppConfig::load(&cli)?;
    commands::run(cli, config)
}
