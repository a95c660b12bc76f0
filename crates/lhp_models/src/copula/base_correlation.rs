//! Base correlation skew `β(k)` over tranche detachment points.
//!
//! Base correlations are quoted per detachment point, each one being the
//! flat loading that reprices the equity tranche `[0, k]`. Between pillars
//! the curve is linear and outside them it is flat. The curve feeds both the
//! skew-aware density and base-correlation tranche pricing, where the two
//! tranche edges are evaluated at their own correlations.

use lhp_core::math::interpolators::{Interpolator, LinearInterpolator};
use lhp_core::traits::NormalDistribution;
use lhp_core::types::LhpError;
use tracing::debug;

use super::lhp::GaussianCopulaLhp;
use super::outcome::Evaluation;
use super::portfolio::PortfolioSummary;

/// Piecewise-linear base correlation curve.
///
/// # Examples
/// ```
/// use lhp_models::copula::BaseCorrelationCurve;
///
/// let curve = BaseCorrelationCurve::new(&[0.03, 0.07, 0.10], &[0.20, 0.28, 0.34]).unwrap();
/// assert!((curve.beta_at(0.05) - 0.24).abs() < 1e-12);
/// assert!((curve.dbeta_dk(0.05) - 2.0).abs() < 1e-12);
/// assert_eq!(curve.beta_at(0.5), 0.34);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct BaseCorrelationCurve {
    curve: LinearInterpolator<f64>,
}

impl BaseCorrelationCurve {
    /// Build a curve from detachment points and base correlations.
    ///
    /// # Errors
    ///
    /// [`LhpError::InvalidInput`] for fewer than two pillars, unequal lengths,
    /// repeated or non-finite detachments, or a correlation outside `[-1, 1]`.
    pub fn new(detachments: &[f64], betas: &[f64]) -> Result<Self, LhpError> {
        if let Some(&beta) = betas.iter().find(|b| !(-1.0..=1.0).contains(*b)) {
            return Err(LhpError::InvalidInput(format!(
                "base correlation {beta} outside [-1, 1]"
            )));
        }
        let curve = LinearInterpolator::new(detachments, betas)?;
        Ok(Self { curve })
    }

    /// Flat curve with a single correlation.
    pub fn flat(beta: f64) -> Result<Self, LhpError> {
        Self::new(&[0.0, 1.0], &[beta, beta])
    }

    /// Sorted detachment points.
    pub fn detachments(&self) -> &[f64] {
        self.curve.xs()
    }

    /// Base correlations at the detachment points.
    pub fn betas(&self) -> &[f64] {
        self.curve.ys()
    }

    /// Base correlation at `k`, flat beyond the outermost pillars.
    #[inline]
    pub fn beta_at(&self, k: f64) -> f64 {
        match self.curve.interpolate(k) {
            Ok(beta) => beta,
            Err(_) => self.curve.value_flat(k),
        }
    }

    /// Skew slope `dβ/dk` at `k`; zero outside the pillar range.
    #[inline]
    pub fn dbeta_dk(&self, k: f64) -> f64 {
        self.curve.slope(k)
    }

    /// Loss density at `k` accounting for the skew.
    ///
    /// Equivalent to
    /// [`density_base_corr`](GaussianCopulaLhp::density_base_corr) with
    /// `β(k)` and `dβ/dk(k)` read off the curve.
    pub fn density_at<D: NormalDistribution>(
        &self,
        model: &GaussianCopulaLhp<D>,
        k: f64,
        p: f64,
        r: f64,
    ) -> Evaluation {
        model.density_base_corr(k, p, r, self.beta_at(k), self.dbeta_dk(k))
    }

    /// Tranche survival probability with each edge at its own base correlation.
    ///
    /// `1 − (EL(k2; β(k2)) − EL(k1; β(k1)))/(k2 − k1)`. Degenerate cases and
    /// errors follow [`GaussianCopulaLhp::tranche_survival`].
    pub fn tranche_survival<D: NormalDistribution>(
        &self,
        model: &GaussianCopulaLhp<D>,
        k1: f64,
        k2: f64,
        num_credits: usize,
        survival_probabilities: &[f64],
        recovery_rates: &[f64],
    ) -> Result<f64, LhpError> {
        if k1 == 0.0 && k2 == 0.0 {
            return Ok(0.0);
        }
        if k1 >= k2 {
            return Err(LhpError::InvalidTranche {
                attachment: k1,
                detachment: k2,
            });
        }

        let summary =
            PortfolioSummary::aggregate(num_credits, survival_probabilities, recovery_rates)?;
        let Some(recovery) = summary.recovery() else {
            debug!("base correlation tranche: default-free portfolio, returning 1");
            return Ok(1.0);
        };
        let p = summary.default_probability();

        let el1 = model.exp_min_lk(k1, p, recovery, 1.0, self.beta_at(k1)).raw();
        let el2 = model.exp_min_lk(k2, p, recovery, 1.0, self.beta_at(k2)).raw();
        Ok(1.0 - (el2 - el1) / (k2 - k1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::copula::lhp::{exp_min_lk, lhp_analytical_density_base_corr, tr_surv_prob_lhp};
    use approx::assert_relative_eq;

    fn skew() -> BaseCorrelationCurve {
        BaseCorrelationCurve::new(&[0.03, 0.07, 0.10, 0.15], &[0.20, 0.28, 0.34, 0.49]).unwrap()
    }

    fn portfolio() -> (Vec<f64>, Vec<f64>) {
        (vec![0.98; 125], vec![0.4; 125])
    }

    #[test]
    fn test_curve_lookup() {
        let curve = skew();
        assert_relative_eq!(curve.beta_at(0.085), 0.31, epsilon = 1e-12);
        assert_relative_eq!(curve.beta_at(0.125), 0.415, epsilon = 1e-12);
        assert_eq!(curve.beta_at(0.01), 0.20);
        assert_eq!(curve.beta_at(0.5), 0.49);
    }

    #[test]
    fn test_curve_lookup_at_pillars() {
        let curve = skew();
        for (&k, &beta) in curve.detachments().iter().zip(curve.betas()) {
            assert_relative_eq!(curve.beta_at(k), beta, epsilon = 1e-15);
        }
        assert_eq!(curve.beta_at(0.03 - 1e-12), 0.20);
        assert_eq!(curve.beta_at(0.15 + 1e-12), 0.49);
    }

    #[test]
    fn test_skew_slope() {
        let curve = skew();
        assert_relative_eq!(curve.dbeta_dk(0.05), 2.0, epsilon = 1e-12);
        assert_relative_eq!(curve.dbeta_dk(0.12), 3.0, epsilon = 1e-12);
        assert_eq!(curve.dbeta_dk(0.01), 0.0);
        assert_eq!(curve.dbeta_dk(0.2), 0.0);
    }

    #[test]
    fn test_rejects_invalid_curves() {
        assert!(BaseCorrelationCurve::new(&[0.03], &[0.2]).is_err());
        assert!(BaseCorrelationCurve::new(&[0.03, 0.07], &[0.2]).is_err());
        assert!(BaseCorrelationCurve::new(&[0.03, 0.03], &[0.2, 0.3]).is_err());
        let err = BaseCorrelationCurve::new(&[0.03, 0.07], &[0.2, 1.2]).unwrap_err();
        assert!(matches!(err, LhpError::InvalidInput(_)));
    }

    #[test]
    fn test_density_reads_curve() {
        let curve = skew();
        let model = GaussianCopulaLhp::reference();
        let k = 0.05;
        let expected =
            lhp_analytical_density_base_corr(k, 0.02, 0.4, curve.beta_at(k), curve.dbeta_dk(k));
        assert_eq!(curve.density_at(&model, k, 0.02, 0.4), expected);
    }

    #[test]
    fn test_flat_curve_matches_constant_correlation() {
        let curve = BaseCorrelationCurve::flat(0.3).unwrap();
        let model = GaussianCopulaLhp::reference();
        let (s, r) = portfolio();
        for (k1, k2) in [(0.0, 0.03), (0.03, 0.07), (0.07, 0.10)] {
            let skewed = curve.tranche_survival(&model, k1, k2, 125, &s, &r).unwrap();
            let flat = tr_surv_prob_lhp(k1, k2, 125, &s, &r, 0.3).unwrap();
            assert_eq!(skewed, flat);
        }
    }

    #[test]
    fn test_equity_tranche_uses_detachment_correlation() {
        let curve = skew();
        let model = GaussianCopulaLhp::reference();
        let (s, r) = portfolio();
        let skewed = curve.tranche_survival(&model, 0.0, 0.07, 125, &s, &r).unwrap();
        let flat = tr_surv_prob_lhp(0.0, 0.07, 125, &s, &r, 0.28).unwrap();
        assert_relative_eq!(skewed, flat, epsilon = 1e-15);
    }

    #[test]
    fn test_mezzanine_tranche_mixes_correlations() {
        let curve = skew();
        let model = GaussianCopulaLhp::reference();
        let (s, r) = portfolio();
        let summary = PortfolioSummary::aggregate(125, &s, &r).unwrap();
        let p = summary.default_probability();
        let rec = summary.recovery().unwrap();

        let el1 = exp_min_lk(0.03, p, rec, 1.0, 0.20).raw();
        let el2 = exp_min_lk(0.07, p, rec, 1.0, 0.28).raw();
        let q = curve.tranche_survival(&model, 0.03, 0.07, 125, &s, &r).unwrap();
        assert_relative_eq!(q, 1.0 - (el2 - el1) / 0.04, epsilon = 1e-15);
    }

    #[test]
    fn test_tranche_policy() {
        let curve = skew();
        let model = GaussianCopulaLhp::reference();
        let (s, r) = portfolio();
        assert_eq!(curve.tranche_survival(&model, 0.0, 0.0, 0, &[], &[]), Ok(0.0));
        assert!(curve.tranche_survival(&model, 0.07, 0.03, 125, &s, &r).is_err());
        assert_eq!(
            curve.tranche_survival(&model, 0.03, 0.07, 3, &[1.0; 3], &[0.4; 3]),
            Ok(1.0)
        );
    }
}
