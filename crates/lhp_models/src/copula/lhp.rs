//! One-factor Gaussian copula in the large homogeneous portfolio limit.
//!
//! Conditional on the systemic factor `Z`, every name defaults with
//! probability `Φ((c − β·Z)/sqrt(1 − β²))`, `c = Φ⁻¹(p)`. With infinitely many
//! identical names the loss fraction becomes a deterministic function of `Z`,
//! so the loss distribution, tranche expected losses and loss density all
//! reduce to closed forms in the threshold `a` of
//! [`conditional_threshold`](super::threshold::conditional_threshold).
//!
//! # Guard policies
//!
//! Invalid correlations are handled differently per function and each
//! policy is kept as is:
//!
//! | Function | `|β|` guard | Outcome |
//! |---|---|---|
//! | [`exp_min_lk`] | `> 1` | `Sentinel(0.0)` |
//! | [`portfolio_cdf_lhp`] | `> 1` | `Sentinel(0.0)` |
//! | [`lhp_density`] | `> 0.99999` | `Sentinel(999.0)` |
//! | [`lhp_analytical_density`] | `> 0.99999` | `Err(InvalidCorrelation)` |
//! | [`lhp_analytical_density_base_corr`] | `> 0.99999` | `Sentinel(99.0)` |
//!
//! A zero loading is replaced by
//! [`ZERO_BETA_FLOOR`](super::threshold::ZERO_BETA_FLOOR) everywhere.

use lhp_core::traits::{DoublePrecisionNormal, NormalDistribution};
use lhp_core::types::LhpError;
use tracing::{debug, warn};

use super::outcome::Evaluation;
use super::portfolio::PortfolioSummary;
use super::threshold::{clamp_beta, conditional_threshold, ANALYTIC_BETA_LIMIT, DENSITY_BUMP};

/// Sentinel returned by [`lhp_density`] for an invalid correlation.
pub const FD_DENSITY_SENTINEL: f64 = 999.0;

/// Sentinel returned by [`lhp_analytical_density_base_corr`] for an invalid correlation.
pub const BASE_CORR_DENSITY_SENTINEL: f64 = 99.0;

/// LHP tranche model over a pluggable normal-distribution backend.
///
/// # Examples
/// ```
/// use lhp_models::copula::GaussianCopulaLhp;
///
/// let model = GaussianCopulaLhp::reference();
/// let survs = vec![0.98; 125];
/// let recs = vec![0.4; 125];
///
/// let equity = model.tranche_survival(0.0, 0.03, 125, &survs, &recs, 0.3).unwrap();
/// assert!(equity > 0.0 && equity < 1.0);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct GaussianCopulaLhp<D: NormalDistribution = DoublePrecisionNormal> {
    normal: D,
}

const REFERENCE: GaussianCopulaLhp = GaussianCopulaLhp::reference();

impl GaussianCopulaLhp {
    /// Model on the reference [`DoublePrecisionNormal`] backend.
    pub const fn reference() -> Self {
        Self {
            normal: DoublePrecisionNormal,
        }
    }
}

impl<D: NormalDistribution> GaussianCopulaLhp<D> {
    /// Create a model on top of `normal`.
    pub fn new(normal: D) -> Self {
        Self { normal }
    }

    /// The special-function backend.
    #[inline]
    pub fn normal(&self) -> &D {
        &self.normal
    }

    /// Expected value of `min(L, k)` for the portfolio loss `L`.
    ///
    /// `E[min(L, k)] = (1 − r)·M(c, −a, −β) + k·N(a)` with the loss argument
    /// `k/(1 − r)/n`. `n` rescales the loss argument and is `1.0` for tranche
    /// pricing.
    ///
    /// Returns `Sentinel(0.0)` when `|β| > 1`, `Value(0.0)` when `p == 0` or
    /// `k == 0`, and the saturated `Value(p·(1 − r))` when `k ≥ 1 − r`.
    pub fn exp_min_lk(&self, k: f64, p: f64, r: f64, n: f64, beta: f64) -> Evaluation {
        let beta = clamp_beta(beta);

        if beta.abs() > 1.0 {
            warn!(beta, "exp_min_lk: |beta| > 1, returning sentinel 0");
            return Evaluation::Sentinel(0.0);
        }
        if p == 0.0 || k == 0.0 {
            return Evaluation::Value(0.0);
        }
        if k >= 1.0 - r {
            return Evaluation::Value(p * (1.0 - r));
        }

        let c = self.normal.inv_cdf(p);
        let x = self.normal.inv_cdf(k / (1.0 - r) / n);
        let a = conditional_threshold(c, x, beta);

        Evaluation::Value(
            (1.0 - r) * self.normal.bivariate_cdf(c, -a, -beta) + k * self.normal.cdf(a),
        )
    }

    /// Tranche survival probability for the tranche `[k1, k2]`.
    ///
    /// `1 − (EL(k2) − EL(k1))/(k2 − k1)` with `EL` from
    /// [`exp_min_lk`](Self::exp_min_lk) at the aggregated `p` and recovery.
    ///
    /// `k1 == k2 == 0` returns `0.0` before anything else is checked. A
    /// default-free portfolio returns `1.0`. With `|β| > 1` both expected
    /// losses are the zero sentinel, so the result is `1.0`.
    ///
    /// # Errors
    ///
    /// - [`LhpError::InvalidTranche`] when `k1 >= k2`
    /// - [`LhpError::EmptyPortfolio`] / [`LhpError::LengthMismatch`] from aggregation
    pub fn tranche_survival(
        &self,
        k1: f64,
        k2: f64,
        num_credits: usize,
        survival_probabilities: &[f64],
        recovery_rates: &[f64],
        beta: f64,
    ) -> Result<f64, LhpError> {
        if k1 == 0.0 && k2 == 0.0 {
            debug!("tranche_survival: zero-width equity tranche, returning 0");
            return Ok(0.0);
        }
        check_tranche(k1, k2)?;

        let summary =
            PortfolioSummary::aggregate(num_credits, survival_probabilities, recovery_rates)?;
        self.tranche_survival_for(k1, k2, &summary, beta)
    }

    /// [`tranche_survival`](Self::tranche_survival) on a pre-aggregated portfolio.
    pub fn tranche_survival_for(
        &self,
        k1: f64,
        k2: f64,
        summary: &PortfolioSummary,
        beta: f64,
    ) -> Result<f64, LhpError> {
        if k1 == 0.0 && k2 == 0.0 {
            return Ok(0.0);
        }
        check_tranche(k1, k2)?;

        let recovery = match summary.recovery() {
            Some(r) => r,
            None => {
                debug!("tranche_survival: default-free portfolio, returning 1");
                return Ok(1.0);
            }
        };
        let p = summary.default_probability();

        let el1 = self.exp_min_lk(k1, p, recovery, 1.0, beta);
        let el2 = self.exp_min_lk(k2, p, recovery, 1.0, beta);
        if el1.is_sentinel() || el2.is_sentinel() {
            warn!(
                k1,
                k2,
                beta,
                "tranche_survival: invalid correlation, expected losses are sentinels"
            );
        }

        Ok(1.0 - (el2.raw() - el1.raw()) / (k2 - k1))
    }

    /// Portfolio loss CDF `P(L ≤ k) = N(−a)`.
    ///
    /// `qvector` holds the values fed to the aggregator; the default
    /// probability used is `p = mean(1 − q)`.
    ///
    /// Returns `Value(0.0)` for a default-free portfolio, `Value(1.0)` when
    /// `k ≥ 1 − recovery` and `Sentinel(0.0)` when `|β| > 1`. The saturation
    /// check runs before the correlation check.
    ///
    /// # Errors
    ///
    /// [`LhpError::EmptyPortfolio`] / [`LhpError::LengthMismatch`] from aggregation.
    pub fn portfolio_cdf(
        &self,
        k: f64,
        num_credits: usize,
        qvector: &[f64],
        recovery_rates: &[f64],
        beta: f64,
    ) -> Result<Evaluation, LhpError> {
        let summary = PortfolioSummary::aggregate(num_credits, qvector, recovery_rates)?;
        Ok(self.loss_cdf_for(k, &summary, beta))
    }

    /// [`portfolio_cdf`](Self::portfolio_cdf) on a pre-aggregated portfolio.
    pub fn loss_cdf_for(&self, k: f64, summary: &PortfolioSummary, beta: f64) -> Evaluation {
        match summary.recovery() {
            Some(recovery) => self.loss_cdf(k, summary.default_probability(), recovery, beta),
            None => {
                debug!("portfolio_cdf: default-free portfolio, returning 0");
                Evaluation::Value(0.0)
            }
        }
    }

    /// Loss CDF for scalar `p` and recovery `r`.
    pub fn loss_cdf(&self, k: f64, p: f64, r: f64, beta: f64) -> Evaluation {
        if p == 0.0 {
            return Evaluation::Value(0.0);
        }
        let beta = clamp_beta(beta);
        if k >= 1.0 - r {
            return Evaluation::Value(1.0);
        }
        if beta.abs() > 1.0 {
            warn!(beta, "portfolio_cdf: |beta| > 1, returning sentinel 0");
            return Evaluation::Sentinel(0.0);
        }

        let c = self.normal.inv_cdf(p);
        let x = self.normal.inv_cdf(k / (1.0 - r));
        Evaluation::Value(self.normal.cdf(-conditional_threshold(c, x, beta)))
    }

    /// Loss density at `k` by forward difference of `N(a(k))` with step [`DENSITY_BUMP`].
    ///
    /// Returns `Sentinel(999.0)` when `|β| > 0.99999` and `Value(0.0)` when
    /// `k == 0` or `k ≥ 1 − r`. No guard protects `k + dk ≥ 1 − r`; just
    /// below the maximum loss the result is not finite.
    pub fn density_fd(&self, k: f64, p: f64, r: f64, beta: f64) -> Evaluation {
        let beta = clamp_beta(beta);

        if beta.abs() > ANALYTIC_BETA_LIMIT {
            warn!(beta, "lhp_density: |beta| > {ANALYTIC_BETA_LIMIT}, returning sentinel");
            return Evaluation::Sentinel(FD_DENSITY_SENTINEL);
        }
        if k == 0.0 || k >= 1.0 - r {
            return Evaluation::Value(0.0);
        }

        let c = self.normal.inv_cdf(p);
        let term1 = self
            .normal
            .cdf(conditional_threshold(c, self.normal.inv_cdf(k / (1.0 - r)), beta));
        let term2 = self.normal.cdf(conditional_threshold(
            c,
            self.normal.inv_cdf((k + DENSITY_BUMP) / (1.0 - r)),
            beta,
        ));

        Evaluation::Value(-(term2 - term1) / DENSITY_BUMP)
    }

    /// Closed-form loss density at constant correlation.
    ///
    /// `ρ(k) = −φ(a)·da/dk` with `da/dk = −sqrt(1 − β²)/β / φ(x) / (1 − r)`.
    /// Returns `0.0` when `k == 0` or `k ≥ 1 − r`.
    ///
    /// # Errors
    ///
    /// [`LhpError::InvalidCorrelation`] when `|β| > 0.99999`.
    pub fn density_analytical(&self, k: f64, p: f64, r: f64, beta: f64) -> Result<f64, LhpError> {
        let beta = clamp_beta(beta);

        if beta.abs() > ANALYTIC_BETA_LIMIT {
            warn!(beta, "lhp_analytical_density: rejecting correlation");
            return Err(LhpError::InvalidCorrelation {
                beta,
                limit: ANALYTIC_BETA_LIMIT,
            });
        }
        if k == 0.0 || k >= 1.0 - r {
            return Ok(0.0);
        }

        let c = self.normal.inv_cdf(p);
        let x = self.normal.inv_cdf(k / (1.0 - r));
        let a = conditional_threshold(c, x, beta);
        let da_dk = -(1.0 - beta * beta).sqrt() / beta / self.normal.pdf(x) / (1.0 - r);

        Ok(-self.normal.pdf(a) * da_dk)
    }

    /// Closed-form loss density when the correlation follows a skew `β(k)`.
    ///
    /// Adds the terms of `a` that move with `β` to the constant-correlation
    /// derivative, with `s = sqrt(1 − β²)`:
    ///
    /// ```text
    /// da/dk = −c/β²·β' + (1/s + s/β²)·β'·x − s/β / φ(x) / (1 − r)
    /// ```
    ///
    /// Returns `Sentinel(99.0)` when `|β| > 0.99999` and `Value(0.0)` when
    /// `k == 0` or `k ≥ 1 − r`. With `dbeta_dk == 0` this equals
    /// [`density_analytical`](Self::density_analytical).
    pub fn density_base_corr(
        &self,
        k: f64,
        p: f64,
        r: f64,
        beta: f64,
        dbeta_dk: f64,
    ) -> Evaluation {
        let beta = clamp_beta(beta);

        if beta.abs() > ANALYTIC_BETA_LIMIT {
            warn!(
                beta,
                "lhp_analytical_density_base_corr: |beta| > {ANALYTIC_BETA_LIMIT}, returning sentinel"
            );
            return Evaluation::Sentinel(BASE_CORR_DENSITY_SENTINEL);
        }
        if k == 0.0 || k >= 1.0 - r {
            return Evaluation::Value(0.0);
        }

        let c = self.normal.inv_cdf(p);
        let x = self.normal.inv_cdf(k / (1.0 - r));
        let s = (1.0 - beta * beta).sqrt();
        let a = conditional_threshold(c, x, beta);

        let mut da_dk = -c / beta / beta * dbeta_dk;
        da_dk += (1.0 / s + s / beta / beta) * dbeta_dk * x;
        da_dk -= s / beta / self.normal.pdf(x) / (1.0 - r);

        Evaluation::Value(-self.normal.pdf(a) * da_dk)
    }

    /// Tail probability `1 − N(a)` at loss level `big_k`.
    ///
    /// Unlike its siblings this function builds `c` and the loss argument
    /// with the normal *density* `φ(P)` and `φ(K/(1 − R))` instead of `Φ⁻¹`.
    /// The result is therefore not `1 − P(L ≤ K)`; that quantity is
    /// `1 − loss_cdf(K, P, R, β)`. The behaviour is kept unchanged pending a
    /// decision from the model owner.
    ///
    /// `β = 0` is floored like everywhere else. There is no correlation
    /// guard, so `|β| > 1` yields NaN.
    pub fn prob_loss_exceeds(&self, big_k: f64, big_p: f64, big_r: f64, beta: f64) -> f64 {
        let beta = clamp_beta(beta);
        let c = self.normal.pdf(big_p);
        let x = self.normal.pdf(big_k / (1.0 - big_r));
        1.0 - self.normal.cdf(conditional_threshold(c, x, beta))
    }
}

fn check_tranche(k1: f64, k2: f64) -> Result<(), LhpError> {
    if k1 >= k2 {
        warn!(k1, k2, "rejecting tranche with K1 >= K2");
        return Err(LhpError::InvalidTranche {
            attachment: k1,
            detachment: k2,
        });
    }
    Ok(())
}

// ===== Flat function interface =====

/// Tranche survival probability on the reference backend.
///
/// See [`GaussianCopulaLhp::tranche_survival`].
pub fn tr_surv_prob_lhp(
    k1: f64,
    k2: f64,
    num_credits: usize,
    survival_probabilities: &[f64],
    recovery_rates: &[f64],
    beta: f64,
) -> Result<f64, LhpError> {
    REFERENCE.tranche_survival(k1, k2, num_credits, survival_probabilities, recovery_rates, beta)
}

/// Portfolio loss CDF on the reference backend.
///
/// `num_points` is accepted for interface parity with quadrature-based
/// implementations and is unused. See [`GaussianCopulaLhp::portfolio_cdf`].
pub fn portfolio_cdf_lhp(
    k: f64,
    num_credits: usize,
    qvector: &[f64],
    recovery_rates: &[f64],
    beta: f64,
    _num_points: usize,
) -> Result<Evaluation, LhpError> {
    REFERENCE.portfolio_cdf(k, num_credits, qvector, recovery_rates, beta)
}

/// `E[min(L, k)]` on the reference backend. See [`GaussianCopulaLhp::exp_min_lk`].
pub fn exp_min_lk(k: f64, p: f64, r: f64, n: f64, beta: f64) -> Evaluation {
    REFERENCE.exp_min_lk(k, p, r, n, beta)
}

/// Finite-difference loss density. See [`GaussianCopulaLhp::density_fd`].
pub fn lhp_density(k: f64, p: f64, r: f64, beta: f64) -> Evaluation {
    REFERENCE.density_fd(k, p, r, beta)
}

/// Closed-form loss density. See [`GaussianCopulaLhp::density_analytical`].
pub fn lhp_analytical_density(k: f64, p: f64, r: f64, beta: f64) -> Result<f64, LhpError> {
    REFERENCE.density_analytical(k, p, r, beta)
}

/// Closed-form base-correlation loss density. See [`GaussianCopulaLhp::density_base_corr`].
pub fn lhp_analytical_density_base_corr(
    k: f64,
    p: f64,
    r: f64,
    beta: f64,
    dbeta_dk: f64,
) -> Evaluation {
    REFERENCE.density_base_corr(k, p, r, beta, dbeta_dk)
}

/// Tail probability with the density-based threshold.
/// See [`GaussianCopulaLhp::prob_loss_exceeds`].
#[allow(non_snake_case)]
pub fn prob_l_greater_than_k(K: f64, P: f64, R: f64, beta: f64) -> f64 {
    REFERENCE.prob_loss_exceeds(K, P, R, beta)
}
