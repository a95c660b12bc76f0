//! One-factor Gaussian copula under the large homogeneous portfolio limit.
//!
//! This module provides:
//! - Portfolio aggregation to `(p, portfolioEL, recovery)`
//! - The shared conditional default threshold
//! - Expected tranche loss, tranche survival and loss CDF
//! - Finite-difference and closed-form loss densities
//! - Base correlation curves and batch evaluation
//!
//! ## Design Principles
//!
//! - **One threshold helper**: every function derives `a` through
//!   [`threshold::conditional_threshold`] with the same zero-loading floor
//! - **Tagged sentinels**: reserved numbers are [`Evaluation::Sentinel`],
//!   hard failures are [`LhpError`](lhp_core::types::LhpError)
//! - **Pluggable special functions**: the model is generic over
//!   [`NormalDistribution`](lhp_core::traits::NormalDistribution)

pub mod base_correlation;
pub mod batch;
pub mod lhp;
pub mod outcome;
pub mod portfolio;
pub mod threshold;

// Re-export main types at module level
pub use base_correlation::BaseCorrelationCurve;
pub use batch::TrancheBatch;
pub use lhp::{
    exp_min_lk, lhp_analytical_density, lhp_analytical_density_base_corr, lhp_density,
    portfolio_cdf_lhp, prob_l_greater_than_k, tr_surv_prob_lhp, GaussianCopulaLhp,
};
pub use outcome::Evaluation;
pub use portfolio::PortfolioSummary;
