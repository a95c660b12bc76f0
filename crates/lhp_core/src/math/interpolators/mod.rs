//! Interpolation methods used to build correlation term structures.
//!
//! ## Available Interpolators
//!
//! - [`LinearInterpolator`]: Piecewise linear interpolation with segment slopes
//!   and flat extrapolation
//!
//! ## Example
//!
//! ```
//! use lhp_core::math::interpolators::{Interpolator, LinearInterpolator};
//!
//! let interp = LinearInterpolator::<f64>::new(&[0.03, 0.07, 0.10], &[0.20, 0.30, 0.36]).unwrap();
//! assert_eq!(interp.domain(), (0.03, 0.10));
//!
//! let y = interp.interpolate(0.05).unwrap();
//! assert!((y - 0.25).abs() < 1e-12);
//! ```

mod linear;

pub use linear::LinearInterpolator;

use crate::types::InterpolationError;
use num_traits::Float;

/// One-dimensional interpolation over a bounded domain.
pub trait Interpolator<T: Float> {
    /// Interpolate at `x`, failing with `OutOfBounds` outside [`domain`](Self::domain).
    fn interpolate(&self, x: T) -> Result<T, InterpolationError>;

    /// Valid interpolation range `(x_min, x_max)`.
    fn domain(&self) -> (T, T);

    /// Whether `x` lies inside the domain, knots included.
    fn contains(&self, x: T) -> bool {
        let (lo, hi) = self.domain();
        x >= lo && x <= hi
    }
}
