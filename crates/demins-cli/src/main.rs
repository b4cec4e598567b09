mod cli;
mod commands;
mod config;
mod error;
mod logging;
mod utils;

use crate::cli::{Cli, Commands};
use crate::error::{CliError, Result};
use clap::Parser;
use tracing::{debug, error, info};

fn main() {
    if let Err(e) = run_app() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run_app() -> Result<()> {
    let cli = Cli::parse();
    logging::setup_logging(cli.verbose, cli.quiet, cli.log_file.as_deref())?;

    let (panic_hook, eyre_hook) = color_eyre::config::HookBuilder::default().into_hooks();
    eyre_hook.install().map_err(|e| CliError::Other(e.into()))?;
    std::panic::set_hook(Box::new(move |pi| {
        error!("{}", panic_hook.panic_report(pi));
    }));

    info!("demins CLI v{} starting up.", env!("CARGO_PKG_VERSION"));
    debug!("Full CLI arguments parsed: {:?}", &cli);

    let command_result = match cli.command {
        Commands::Status(args) => {
            info!("Dispatching to 'status' command.");
            commands::status::run(args)
        }
        Commands::Report(args) => {
            info!("Dispatching to 'report' command.");
            commands::report::run(args)
        }
        Commands::Units => {
            info!("Dispatching to 'units' command.");
            commands::units::run()
        }
    };

    match &command_result {
        Ok(_) => info!("Command completed successfully."),
        Err(e) => error!("Command failed: {}", e),
    }
    command_result
}
