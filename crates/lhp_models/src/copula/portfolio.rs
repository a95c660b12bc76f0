//! Reduction of per-name credit data to LHP portfolio scalars.

use lhp_core::types::LhpError;

/// Portfolio-level averages seen by the LHP model.
///
/// Built from per-name probabilities and recovery rates:
///
/// ```text
/// p           = (1/n) Σ (1 − s_i)
/// portfolioEL = (1/n) Σ (1 − s_i)(1 − R_i)
/// recovery    = 1 − portfolioEL / p
/// ```
///
/// `s_i` are survival probabilities for tranche pricing. The loss CDF feeds
/// its `qvector` through the same formula.
///
/// # Examples
/// ```
/// use lhp_models::copula::PortfolioSummary;
///
/// let survs = vec![0.98; 125];
/// let recs = vec![0.4; 125];
/// let summary = PortfolioSummary::aggregate(125, &survs, &recs).unwrap();
/// assert!((summary.default_probability() - 0.02).abs() < 1e-15);
/// assert!((summary.recovery().unwrap() - 0.4).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PortfolioSummary {
    num_credits: usize,
    default_probability: f64,
    expected_loss: f64,
}

impl PortfolioSummary {
    /// Aggregate the first `num_credits` entries of both slices.
    ///
    /// # Errors
    ///
    /// - [`LhpError::EmptyPortfolio`] when `num_credits == 0`
    /// - [`LhpError::LengthMismatch`] when either slice is shorter than `num_credits`
    pub fn aggregate(
        num_credits: usize,
        values: &[f64],
        recovery_rates: &[f64],
    ) -> Result<Self, LhpError> {
        if num_credits == 0 {
            return Err(LhpError::EmptyPortfolio);
        }
        if values.len() < num_credits || recovery_rates.len() < num_credits {
            return Err(LhpError::LengthMismatch {
                num_credits,
                survival: values.len(),
                recovery: recovery_rates.len(),
            });
        }

        let (p_sum, el_sum) = values[..num_credits]
            .iter()
            .zip(&recovery_rates[..num_credits])
            .fold((0.0, 0.0), |(p, el), (&s, &r)| {
                let pd = 1.0 - s;
                (p + pd, el + pd * (1.0 - r))
            });

        let n = num_credits as f64;
        Ok(Self {
            num_credits,
            default_probability: p_sum / n,
            expected_loss: el_sum / n,
        })
    }

    /// Number of credits aggregated.
    #[inline]
    pub fn num_credits(&self) -> usize {
        self.num_credits
    }

    /// Average default probability `p`.
    #[inline]
    pub fn default_probability(&self) -> f64 {
        self.default_probability
    }

    /// Average expected-loss fraction `portfolioEL`.
    #[inline]
    pub fn expected_loss(&self) -> f64 {
        self.expected_loss
    }

    /// Implied average recovery, undefined when no defaults are expected.
    #[inline]
    pub fn recovery(&self) -> Option<f64> {
        if self.is_default_free() {
            None
        } else {
            Some(1.0 - self.expected_loss / self.default_probability)
        }
    }

    /// Whether the average default probability is exactly zero.
    #[inline]
    pub fn is_default_free(&self) -> bool {
        self.default_probability == 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_homogeneous_portfolio() {
        let summary = PortfolioSummary::aggregate(125, &[0.98; 125], &[0.4; 125]).unwrap();
        assert_eq!(summary.num_credits(), 125);
        assert_relative_eq!(summary.default_probability(), 0.02, epsilon = 1e-15);
        assert_relative_eq!(summary.expected_loss(), 0.012, epsilon = 1e-15);
        assert_relative_eq!(summary.recovery().unwrap(), 0.4, epsilon = 1e-12);
    }

    #[test]
    fn test_heterogeneous_portfolio() {
        let survs = [0.99, 0.95, 0.90, 1.0];
        let recs = [0.4, 0.25, 0.6, 0.4];
        let summary = PortfolioSummary::aggregate(4, &survs, &recs).unwrap();

        let p = (0.01 + 0.05 + 0.10 + 0.0) / 4.0;
        let el = (0.01 * 0.6 + 0.05 * 0.75 + 0.10 * 0.4) / 4.0;
        assert_relative_eq!(summary.default_probability(), p, epsilon = 1e-15);
        assert_relative_eq!(summary.expected_loss(), el, epsilon = 1e-15);
        assert_relative_eq!(summary.recovery().unwrap(), 1.0 - el / p, epsilon = 1e-14);
    }

    #[test]
    fn test_default_free_portfolio_has_no_recovery() {
        let summary = PortfolioSummary::aggregate(3, &[1.0; 3], &[0.4; 3]).unwrap();
        assert!(summary.is_default_free());
        assert_eq!(summary.recovery(), None);
    }

    #[test]
    fn test_extra_entries_are_ignored() {
        let survs = [0.9, 0.9, 0.0];
        let recs = [0.5, 0.5, 0.0];
        let summary = PortfolioSummary::aggregate(2, &survs, &recs).unwrap();
        assert_relative_eq!(summary.default_probability(), 0.1, epsilon = 1e-15);
    }

    #[test]
    fn test_empty_portfolio_rejected() {
        let err = PortfolioSummary::aggregate(0, &[], &[]).unwrap_err();
        assert_eq!(err, LhpError::EmptyPortfolio);
    }

    #[test]
    fn test_short_arrays_rejected() {
        let err = PortfolioSummary::aggregate(3, &[0.98; 3], &[0.4; 2]).unwrap_err();
        assert_eq!(
            err,
            LhpError::LengthMismatch {
                num_credits: 3,
                survival: 3,
                recovery: 2
            }
        );
    }
}
