//! Batch evaluation of tranche strips and loss grids.
//!
//! Every LHP function is pure, so a strip of tranches or a grid of loss
//! levels can be evaluated against one aggregated portfolio without any
//! synchronisation. With the `parallel` feature the points are distributed
//! across Rayon's thread pool; otherwise they are evaluated sequentially.
//! Output order always matches input order.

use lhp_core::traits::{DoublePrecisionNormal, NormalDistribution};
use lhp_core::types::LhpError;

use super::lhp::GaussianCopulaLhp;
use super::outcome::Evaluation;
use super::portfolio::PortfolioSummary;

/// Portfolio, correlation and model shared by a batch of evaluations.
///
/// # Examples
/// ```
/// use lhp_models::copula::{GaussianCopulaLhp, TrancheBatch};
///
/// let batch = TrancheBatch::new(
///     GaussianCopulaLhp::reference(),
///     125,
///     &vec![0.98; 125],
///     &vec![0.4; 125],
///     0.3,
/// )
/// .unwrap();
///
/// let strip = batch.tranche_survivals(&[(0.0, 0.03), (0.03, 0.07)]);
/// assert_eq!(strip.len(), 2);
/// assert!(strip[0].as_ref().unwrap() < strip[1].as_ref().unwrap());
/// ```
#[derive(Debug, Clone)]
pub struct TrancheBatch<D: NormalDistribution = DoublePrecisionNormal> {
    model: GaussianCopulaLhp<D>,
    summary: PortfolioSummary,
    beta: f64,
}

impl<D: NormalDistribution> TrancheBatch<D> {
    /// Aggregate the portfolio once for all subsequent evaluations.
    ///
    /// # Errors
    ///
    /// [`LhpError::EmptyPortfolio`] / [`LhpError::LengthMismatch`] from aggregation.
    pub fn new(
        model: GaussianCopulaLhp<D>,
        num_credits: usize,
        survival_probabilities: &[f64],
        recovery_rates: &[f64],
        beta: f64,
    ) -> Result<Self, LhpError> {
        let summary =
            PortfolioSummary::aggregate(num_credits, survival_probabilities, recovery_rates)?;
        Ok(Self::from_summary(model, summary, beta))
    }

    /// Batch over an already aggregated portfolio.
    pub fn from_summary(model: GaussianCopulaLhp<D>, summary: PortfolioSummary, beta: f64) -> Self {
        Self {
            model,
            summary,
            beta,
        }
    }

    /// The aggregated portfolio.
    pub fn summary(&self) -> &PortfolioSummary {
        &self.summary
    }

    /// The flat correlation used for every point.
    pub fn beta(&self) -> f64 {
        self.beta
    }

    /// Tranche survival probability for each `(k1, k2)` pair.
    pub fn tranche_survivals(&self, tranches: &[(f64, f64)]) -> Vec<Result<f64, LhpError>> {
        evaluate_all(tranches, |&(k1, k2)| {
            self.model.tranche_survival_for(k1, k2, &self.summary, self.beta)
        })
    }

    /// `E[min(L, k)]` at each loss level, using the aggregated `p` and recovery.
    pub fn expected_min_losses(&self, ks: &[f64]) -> Vec<Evaluation> {
        let p = self.summary.default_probability();
        let recovery = self.summary.recovery();
        evaluate_all(ks, |&k| match recovery {
            Some(r) => self.model.exp_min_lk(k, p, r, 1.0, self.beta),
            None => Evaluation::Value(0.0),
        })
    }

    /// Portfolio loss CDF at each loss level.
    pub fn loss_cdf_grid(&self, ks: &[f64]) -> Vec<Evaluation> {
        evaluate_all(ks, |&k| self.model.loss_cdf_for(k, &self.summary, self.beta))
    }

    /// Closed-form loss density at each loss level.
    ///
    /// A default-free portfolio has no loss density and yields zeros.
    pub fn loss_density_grid(&self, ks: &[f64]) -> Vec<Result<f64, LhpError>> {
        let p = self.summary.default_probability();
        let recovery = self.summary.recovery();
        evaluate_all(ks, |&k| match recovery {
            Some(r) => self.model.density_analytical(k, p, r, self.beta),
            None => Ok(0.0),
        })
    }
}

#[cfg(feature = "parallel")]
fn evaluate_all<I, O, F>(inputs: &[I], f: F) -> Vec<O>
where
    I: Sync,
    O: Send,
    F: Fn(&I) -> O + Sync + Send,
{
    use rayon::prelude::*;

    inputs.par_iter().map(f).collect()
}

#[cfg(not(feature = "parallel"))]
fn evaluate_all<I, O, F>(inputs: &[I], f: F) -> Vec<O>
where
    I: Sync,
    O: Send,
    F: Fn(&I) -> O + Sync + Send,
{
    inputs.iter().map(f).collect()
}
