mod cli;
mod commands;
mod config;
mod error;
mod export;
mod logging;
mod utils;

use crate::cli::{Cli, Commands};
use crate::error::Result;
use clap::Parser;
use tracing::{debug, error, info};

fn main() {
    if let Err(e) = run_app() {
        eprintln!("\n❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn run_app() -> Result<()> {
    let cli = Cli::parse();
    logging::setup_logging(cli.verbose, cli.quiet, cli.log_file.clone())?;

    info!("Cygnus CLI v{} starting up.", env!("CARGO_PKG_VERSION"));
    debug!("Full CLI arguments parsed: {:?}", &cli);

    let command_result = match cli.command {
        Commands::Pes(args) => {
            info!("Dispatching to 'pes' command.");
            commands::pes::run(args)
        }
        Commands::Rmsf(args) => {
            info!("Dispatching to 'rmsf' command.");
            commands::rmsf::run(args)
        }
        Commands::Pmf(args) => {
            info!("Dispatching to 'pmf' command.");
            commands::pmf::run(args)
        }
        Commands::Distances(args) => {
            info!("Dispatching to 'distances' command.");
            commands::distances::run(args)
        }
        Commands::Pairwise(args) => {
            info!("Dispatching to 'pairwise' command.");
            commands::pairwise::run(args)
        }
    };

    match &command_result {
        Ok(_) => info!("✅ Command completed successfully."),
        Err(e) => error!("❌ Command failed: {}", e),
    }

    command_result
}
