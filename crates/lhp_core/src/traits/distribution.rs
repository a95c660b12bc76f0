//! Special-function interface for Gaussian copula models.
//!
//! The LHP kernel needs exactly four pure functions of the standard normal
//! law. Collecting them behind one trait lets the kernel run against the
//! reference [`DoublePrecisionNormal`] in production and against alternative
//! or instrumented implementations in tests.

use crate::math::distributions::{bivariate_norm_cdf, norm_cdf, norm_inv_cdf, norm_pdf};

/// The four standard normal functions used by the copula kernel.
///
/// # Contract
///
/// | Method | Meaning | Domain |
/// |---|---|---|
/// | `cdf(x)` | Φ(x) = P(X ≤ x) | all reals |
/// | `pdf(x)` | φ(x) | all reals |
/// | `inv_cdf(p)` | Φ⁻¹(p) | (0, 1); ±inf at 0 and 1, NaN outside |
/// | `bivariate_cdf(x, y, ρ)` | P(X ≤ x, Y ≤ y) with corr(X, Y) = ρ | ρ in [-1, 1] |
///
/// Implementations must be pure and thread-safe: the batch evaluator shares
/// one instance across worker threads.
pub trait NormalDistribution: Send + Sync {
    /// Standard normal CDF `N(x)`.
    fn cdf(&self, x: f64) -> f64;

    /// Standard normal PDF `normpdf(x)`.
    fn pdf(&self, x: f64) -> f64;

    /// Inverse standard normal CDF `norminvcdf(p)`.
    fn inv_cdf(&self, p: f64) -> f64;

    /// Standard bivariate normal CDF `M(x, y, rho)`.
    fn bivariate_cdf(&self, x: f64, y: f64, rho: f64) -> f64;
}

/// Reference double-precision implementation backed by
/// [`crate::math::distributions`].
///
/// # Examples
/// ```
/// use lhp_core::traits::{DoublePrecisionNormal, NormalDistribution};
///
/// let normal = DoublePrecisionNormal;
/// let x = normal.inv_cdf(0.3);
/// assert!((normal.cdf(x) - 0.3).abs() < 1e-14);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DoublePrecisionNormal;

impl NormalDistribution for DoublePrecisionNormal {
    #[inline]
    fn cdf(&self, x: f64) -> f64 {
        norm_cdf(x)
    }

    #[inline]
    fn pdf(&self, x: f64) -> f64 {
        norm_pdf(x)
    }

    #[inline]
    fn inv_cdf(&self, p: f64) -> f64 {
        norm_inv_cdf(p)
    }

    #[inline]
    fn bivariate_cdf(&self, x: f64, y: f64, rho: f64) -> f64 {
        bivariate_norm_cdf(x, y, rho)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_reference_delegates_to_math() {
        let normal = DoublePrecisionNormal;
        assert_eq!(normal.cdf(0.7), norm_cdf(0.7));
        assert_eq!(normal.pdf(-1.3), norm_pdf(-1.3));
        assert_eq!(normal.inv_cdf(0.02), norm_inv_cdf(0.02));
        assert_eq!(
            normal.bivariate_cdf(-2.0, 0.4, -0.3),
            bivariate_norm_cdf(-2.0, 0.4, -0.3)
        );
    }

    #[test]
    fn test_generic_usage() {
        fn vasicek_quantile<D: NormalDistribution>(d: &D, p: f64, rho: f64, q: f64) -> f64 {
            d.cdf((d.inv_cdf(p) + rho.sqrt() * d.inv_cdf(q)) / (1.0 - rho).sqrt())
        }
        // Median conditional default rate sits below the unconditional rate
        let median = vasicek_quantile(&DoublePrecisionNormal, 0.02, 0.09, 0.5);
        assert!(median < 0.02);
        assert!(median > 0.0);
    }

    #[test]
    fn test_thread_safe_bound() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<DoublePrecisionNormal>();
    }

    #[test]
    fn test_bivariate_zero_correlation_factorises() {
        let normal = DoublePrecisionNormal;
        assert_abs_diff_eq!(
            normal.bivariate_cdf(0.5, -0.25, 0.0),
            normal.cdf(0.5) * normal.cdf(-0.25),
            epsilon = 1e-15
        );
    }
}
