use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "demins - Estimate resin exhaustion in demineralizer vessels from the species they remove.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the one-line exhaustion status of each installed bed.
    Status(AssessArgs),
    /// Print a detailed per-bed report, optionally with per-species rates.
    Report(ReportArgs),
    /// List the concentration unit tags a species may be given in.
    Units,
}

/// Arguments shared by every command that evaluates a vessel.
#[derive(Args, Debug, Clone)]
pub struct AssessArgs {
    // --- Core Arguments ---
    /// Path to the vessel description file in TOML format.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub config: PathBuf,

    /// CSV species table replacing the species listed in the vessel file.
    #[arg(long, value_name = "PATH")]
    pub species: Option<PathBuf>,

    /// TOML file with additional unit definitions.
    #[arg(long = "units", value_name = "PATH")]
    pub unit_definitions: Option<PathBuf>,

    // --- Overrides ---
    /// Override the service start date (e.g. 2024-01-15 or 2024-01-15T08:30:00Z).
    #[arg(long, value_name = "DATETIME")]
    pub start_date: Option<String>,

    /// Evaluate at this instant instead of the current time.
    #[arg(long, value_name = "DATETIME")]
    pub at: Option<String>,

    /// Override the exhaustion fraction used for forecasts.
    #[arg(short = 't', long, value_name = "FLOAT")]
    pub target_fraction: Option<f64>,

    /// Override the fluid density, in g/gal.
    #[arg(long, value_name = "FLOAT")]
    pub density: Option<f64>,

    /// Set a specific configuration value, overriding the vessel file.
    /// Can be used multiple times. Example: -S cation.penalty=0.1
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `report` subcommand.
#[derive(Args, Debug, Clone)]
pub struct ReportArgs {
    #[command(flatten)]
    pub assess: AssessArgs,

    /// Include the equivalent flow and uptake rate of every species.
    #[arg(long)]
    pub species_rates: bool,
}
