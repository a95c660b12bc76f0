//! CLI command implementations
//!
//! Each submodule implements a specific CLI command. Commands split into an
//! `evaluate` step returning a serialisable report and a `run` step that
//! renders it.

pub mod cdf;
pub mod check;
pub mod density;
pub mod grid;
pub mod tranches;

use clap::ValueEnum;
use lhp_models::copula::{GaussianCopulaLhp, PortfolioSummary, TrancheBatch};
use serde::Serialize;

use crate::config::CliConfig;
use crate::Result;

/// Output format shared by all commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// Pretty-printed JSON
    Json,
}

/// Print `report` as JSON, or through `table` for the table format.
pub(crate) fn render<T, F>(format: OutputFormat, report: &T, table: F) -> Result<()>
where
    T: Serialize,
    F: FnOnce(&T),
{
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(report)?),
        OutputFormat::Table => table(report),
    }
    Ok(())
}

/// Aggregate the configured portfolio.
pub(crate) fn summary(config: &CliConfig) -> Result<PortfolioSummary> {
    let survs = config.portfolio.survival_vector();
    let recs = config.portfolio.recovery_vector();
    Ok(PortfolioSummary::aggregate(
        config.portfolio.num_credits,
        &survs,
        &recs,
    )?)
}

/// Batch evaluator over the configured portfolio and flat correlation.
pub(crate) fn batch(config: &CliConfig) -> Result<TrancheBatch> {
    Ok(TrancheBatch::from_summary(
        GaussianCopulaLhp::reference(),
        summary(config)?,
        config.beta,
    ))
}

/// Format an optional number for table output.
pub(crate) fn cell(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{:.10}", v))
}
