//! LHP CLI - Tranche Pricing under the Large Homogeneous Portfolio Limit
//!
//! This is the operational entry point for the LHP tranche model.
//!
//! # Commands
//!
//! - `lhp tranches` - Survival probability and expected loss per tranche
//! - `lhp cdf --k <K>` - Portfolio loss CDF
//! - `lhp density --k <K> --method <fd|analytical|base-corr>` - Loss density
//! - `lhp grid` - Expected loss, CDF and density on a loss grid
//! - `lhp check` - Validate configuration and show the aggregated portfolio
//!
//! # Configuration
//!
//! Settings come from an optional TOML file, then `LHP_LOG_LEVEL` and
//! `LHP_BETA`, then command line flags. `RUST_LOG` overrides the log level.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod config;
mod error;

use commands::density::DensityMethod;
use commands::OutputFormat;
use config::{build_config, CliArgs};
pub use error::{CliError, Result};

/// LHP Gaussian copula tranche model CLI
#[derive(Parser)]
#[command(name = "lhp")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    /// Flat factor loading override
    #[arg(short, long, global = true, allow_negative_numbers = true)]
    beta: Option<f64>,

    /// Log level override (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Price every configured tranche
    Tranches,

    /// Evaluate the portfolio loss CDF
    Cdf {
        /// Loss level as a fraction of portfolio notional
        #[arg(short, long)]
        k: f64,
    },

    /// Evaluate the portfolio loss density
    Density {
        /// Loss level as a fraction of portfolio notional
        #[arg(short, long)]
        k: f64,

        /// Density method
        #[arg(short, long, value_enum, default_value_t = DensityMethod::Analytical)]
        method: DensityMethod,

        /// Base correlation skew slope, for the base-corr method
        #[arg(long, allow_negative_numbers = true)]
        dbeta_dk: Option<f64>,
    },

    /// Evaluate expected loss, CDF and density on the configured grid
    Grid,

    /// Check configuration and show the aggregated portfolio
    Check,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let args = CliArgs {
        config_file: cli.config.clone(),
        log_level: cli.log_level.clone(),
        beta: cli.beta,
        verbose: cli.verbose,
    };
    let config = build_config(&args)?;

    // Initialise tracing
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_filter_str()));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    if cli.verbose {
        info!("Verbose mode enabled");
    }
    debug!(?config, "Configuration loaded");

    match cli.command {
        Commands::Tranches => commands::tranches::run(&config, cli.format),
        Commands::Cdf { k } => commands::cdf::run(&config, k, cli.format),
        Commands::Density {
            k,
            method,
            dbeta_dk,
        } => commands::density::run(&config, k, method, dbeta_dk, cli.format),
        Commands::Grid => commands::grid::run(&config, cli.format),
        Commands::Check => commands::check::run(&config, cli.format),
    }
}
