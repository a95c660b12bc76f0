//! CDF command implementation
//!
//! Portfolio loss CDF at a single loss level.

use lhp_models::copula::GaussianCopulaLhp;
use serde::Serialize;
use tracing::{info, warn};

use super::{cell, render, OutputFormat};
use crate::config::CliConfig;
use crate::Result;

/// Loss CDF at one level
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CdfReport {
    /// Loss level
    pub k: f64,
    /// Flat correlation
    pub beta: f64,
    /// `P(L <= k)`, absent when the model returned a sentinel
    pub probability: Option<f64>,
    /// Raw model output
    pub raw: f64,
}

/// Evaluate the loss CDF at `k`.
pub fn evaluate(config: &CliConfig, k: f64) -> Result<CdfReport> {
    let outcome = GaussianCopulaLhp::reference().portfolio_cdf(
        k,
        config.portfolio.num_credits,
        &config.portfolio.survival_vector(),
        &config.portfolio.recovery_vector(),
        config.beta,
    )?;
    if outcome.is_sentinel() {
        warn!("Loss CDF at k = {} is a sentinel", k);
    }

    Ok(CdfReport {
        k,
        beta: config.beta,
        probability: outcome.value(),
        raw: outcome.raw(),
    })
}

/// Run the cdf command
pub fn run(config: &CliConfig, k: f64, format: OutputFormat) -> Result<()> {
    info!("Evaluating loss CDF at k = {}", k);
    let report = evaluate(config, k)?;

    render(format, &report, |r| {
        println!("P(L <= {}) = {}  (beta = {})", r.k, cell(r.probability), r.beta);
    })
}
