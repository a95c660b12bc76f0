//! Conditional default threshold of the one-factor Gaussian copula.
//!
//! Every LHP function inverts the conditional default probability through
//! the same threshold
//!
//! ```text
//! a = (c − sqrt(1 − β²)·x) / β,   c = Φ⁻¹(p),  x = Φ⁻¹(loss argument)
//! ```
//!
//! with the same treatment of a zero loading.

/// Replacement for a zero factor loading.
pub const ZERO_BETA_FLOOR: f64 = 1e-8;

/// Largest |β| accepted by the density functions.
pub const ANALYTIC_BETA_LIMIT: f64 = 0.99999;

/// Forward-difference step of the finite-difference density.
pub const DENSITY_BUMP: f64 = 1e-7;

/// Map `β = 0` to [`ZERO_BETA_FLOOR`], leaving every other value untouched.
///
/// # Examples
/// ```
/// use lhp_models::copula::threshold::{clamp_beta, ZERO_BETA_FLOOR};
///
/// assert_eq!(clamp_beta(0.0), ZERO_BETA_FLOOR);
/// assert_eq!(clamp_beta(-0.3), -0.3);
/// ```
#[inline]
pub fn clamp_beta(beta: f64) -> f64 {
    if beta == 0.0 {
        ZERO_BETA_FLOOR
    } else {
        beta
    }
}

/// Threshold `a = (c − sqrt(1 − β²)·x)/β`.
///
/// `c` and `x` are already transformed by the caller; `beta` must be clamped.
#[inline]
pub fn conditional_threshold(c: f64, x: f64, beta: f64) -> f64 {
    (c - (1.0 - beta * beta).sqrt() * x) / beta
}
