//! Density command implementation
//!
//! Portfolio loss density at a single loss level by one of three methods.

use clap::ValueEnum;
use lhp_models::copula::{BaseCorrelationCurve, Evaluation, GaussianCopulaLhp};
use serde::Serialize;
use tracing::{info, warn};

use super::{cell, render, summary, OutputFormat};
use crate::config::CliConfig;
use crate::{CliError, Result};

/// Density evaluation method
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DensityMethod {
    /// Forward finite difference of the CDF
    Fd,
    /// Closed form at constant correlation
    Analytical,
    /// Closed form along a base correlation skew
    BaseCorr,
}

/// Loss density at one level
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DensityReport {
    /// Loss level
    pub k: f64,
    /// Method used
    pub method: DensityMethod,
    /// Correlation at `k`
    pub beta: f64,
    /// Skew slope, for the base correlation method
    pub dbeta_dk: Option<f64>,
    /// Density, absent when the model returned a sentinel
    pub density: Option<f64>,
    /// Raw model output
    pub raw: f64,
}

/// Evaluate the loss density at `k`.
///
/// For the base correlation method an explicit `dbeta_dk` is used with the
/// flat correlation; otherwise the configured curve supplies both, and
/// without a curve the slope is zero.
pub fn evaluate(
    config: &CliConfig,
    k: f64,
    method: DensityMethod,
    dbeta_dk: Option<f64>,
) -> Result<DensityReport> {
    let summary = summary(config)?;
    let (p, r) = match summary.recovery() {
        Some(r) => (summary.default_probability(), r),
        None => {
            return Err(CliError::InvalidArgument(
                "loss density is undefined for a portfolio without expected defaults".to_string(),
            ))
        }
    };
    let model = GaussianCopulaLhp::reference();

    let (beta, slope, outcome) = match method {
        DensityMethod::Fd => (config.beta, None, model.density_fd(k, p, r, config.beta)),
        DensityMethod::Analytical => {
            let density = model.density_analytical(k, p, r, config.beta)?;
            (config.beta, None, Evaluation::Value(density))
        }
        DensityMethod::BaseCorr => {
            let (beta, slope) = match (dbeta_dk, &config.base_correlation) {
                (Some(slope), _) => (config.beta, slope),
                (None, Some(curve)) => {
                    let curve = BaseCorrelationCurve::new(&curve.detachments, &curve.betas)?;
                    (curve.beta_at(k), curve.dbeta_dk(k))
                }
                (None, None) => (config.beta, 0.0),
            };
            (
                beta,
                Some(slope),
                model.density_base_corr(k, p, r, beta, slope),
            )
        }
    };
    if outcome.is_sentinel() {
        warn!("Loss density at k = {} is a sentinel ({})", k, outcome.raw());
    }

    Ok(DensityReport {
        k,
        method,
        beta,
        dbeta_dk: slope,
        density: outcome.value(),
        raw: outcome.raw(),
    })
}

/// Run the density command
pub fn run(
    config: &CliConfig,
    k: f64,
    method: DensityMethod,
    dbeta_dk: Option<f64>,
    format: OutputFormat,
) -> Result<()> {
    info!("Evaluating loss density at k = {} ({:?})", k, method);
    let report = evaluate(config, k, method, dbeta_dk)?;

    render(format, &report, |r| {
        println!(
            "density({}) = {}  (method = {:?}, beta = {}, dbeta/dk = {})",
            r.k,
            cell(r.density),
            r.method,
            r.beta,
            cell(r.dbeta_dk)
        );
    })
}
