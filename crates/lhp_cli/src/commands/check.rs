//! Check command implementation
//!
//! Validates the configuration and prints the aggregated portfolio.

use serde::Serialize;
use tracing::info;

use super::{cell, render, summary, OutputFormat};
use crate::config::CliConfig;
use crate::Result;

/// Aggregated view of the configuration
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckReport {
    /// Number of credits
    pub num_credits: usize,
    /// Average default probability
    pub default_probability: f64,
    /// Average expected loss fraction
    pub expected_loss: f64,
    /// Implied recovery, absent for a default-free portfolio
    pub recovery: Option<f64>,
    /// Flat correlation
    pub beta: f64,
    /// Number of configured tranches
    pub tranches: usize,
    /// Number of grid points
    pub grid_points: usize,
    /// Whether a base correlation curve is configured
    pub base_correlation: bool,
    /// Active log level
    pub log_level: String,
}

/// Summarise the configuration.
pub fn evaluate(config: &CliConfig) -> Result<CheckReport> {
    config.validate()?;
    let summary = summary(config)?;

    Ok(CheckReport {
        num_credits: summary.num_credits(),
        default_probability: summary.default_probability(),
        expected_loss: summary.expected_loss(),
        recovery: summary.recovery(),
        beta: config.beta,
        tranches: config.tranches.len(),
        grid_points: config.grid.steps + 1,
        base_correlation: config.base_correlation.is_some(),
        log_level: config.log_level.to_string(),
    })
}

/// Run the check command
pub fn run(config: &CliConfig, format: OutputFormat) -> Result<()> {
    info!("Checking configuration...");
    let report = evaluate(config)?;

    render(format, &report, |r| {
        println!("Configuration OK");
        println!("  Credits:             {}", r.num_credits);
        println!("  Default probability: {}", cell(Some(r.default_probability)));
        println!("  Expected loss:       {}", cell(Some(r.expected_loss)));
        println!("  Recovery:            {}", cell(r.recovery));
        println!("  Beta:                {}", r.beta);
        println!("  Tranches:            {}", r.tranches);
        println!("  Grid points:         {}", r.grid_points);
        println!("  Base correlation:    {}", r.base_correlation);
        println!("  Log level:           {}", r.log_level);
    })
}
