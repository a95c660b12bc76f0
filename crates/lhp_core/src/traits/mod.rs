//! Core traits for the copula kernel.
//!
//! This module defines:
//! - Generic floating-point operations (`Float` trait)
//! - The special-function interface consumed by the LHP model
//!   (`NormalDistribution` trait)
//!
//! The model crate is generic over [`NormalDistribution`] and dispatches
//! statically. Use a concrete type parameter, not `Box<dyn NormalDistribution>`.

/// Generic floating-point trait for numeric computations.
///
/// # Examples
/// ```
/// use lhp_core::traits::Float;
///
/// fn expected_loss<T: Float>(pd: T, recovery: T) -> T {
///     pd * (T::one() - recovery)
/// }
///
/// let el: f64 = expected_loss(0.02, 0.4);
/// assert!((el - 0.012).abs() < 1e-15);
/// ```
pub use num_traits::Float;

pub mod distribution;

pub use distribution::{DoublePrecisionNormal, NormalDistribution};
