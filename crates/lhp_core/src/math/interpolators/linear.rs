//! Linear interpolation implementation.

use super::Interpolator;
use crate::types::InterpolationError;
use num_traits::Float;

/// Piecewise linear interpolator.
///
/// Stores sorted (x, y) knots and interpolates linearly between neighbours.
/// Besides the bounded [`Interpolator::interpolate`], it offers flat
/// extrapolation ([`value_flat`](Self::value_flat)) and the slope of the
/// active segment ([`slope`](Self::slope)), which is what a correlation
/// skew needs for chain-rule derivatives.
///
/// # Construction
///
/// Knots are sorted by x during construction. At least 2 knots with
/// distinct x-coordinates are required.
///
/// # Example
///
/// ```
/// use lhp_core::math::interpolators::LinearInterpolator;
///
/// let interp = LinearInterpolator::new(&[0.0, 1.0, 3.0], &[0.0, 2.0, 3.0]).unwrap();
/// assert_eq!(interp.slope(0.5), 2.0);
/// assert_eq!(interp.slope(2.0), 0.5);
/// assert_eq!(interp.value_flat(5.0), 3.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LinearInterpolator<T: Float> {
    xs: Vec<T>,
    ys: Vec<T>,
}

impl<T: Float> LinearInterpolator<T> {
    /// Construct a linear interpolator from x and y data points.
    ///
    /// # Returns
    ///
    /// * `Ok(LinearInterpolator)` - Successfully constructed interpolator
    /// * `Err(InterpolationError::InvalidInput)` - Mismatched lengths or non-finite knots
    /// * `Err(InterpolationError::InsufficientData)` - Fewer than 2 knots
    /// * `Err(InterpolationError::NonMonotonicData)` - Repeated x-coordinate
    pub fn new(xs: &[T], ys: &[T]) -> Result<Self, InterpolationError> {
        if xs.len() != ys.len() {
            return Err(InterpolationError::InvalidInput(format!(
                "xs and ys must have same length: got {} and {}",
                xs.len(),
                ys.len()
            )));
        }
        if xs.len() < 2 {
            return Err(InterpolationError::InsufficientData {
                got: xs.len(),
                need: 2,
            });
        }
        if xs.iter().chain(ys).any(|v| !v.is_finite()) {
            return Err(InterpolationError::InvalidInput(
                "knots must be finite".to_string(),
            ));
        }

        let mut pairs: Vec<(T, T)> = xs.iter().copied().zip(ys.iter().copied()).collect();
        pairs.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

        if let Some(index) = pairs.windows(2).position(|w| w[0].0 == w[1].0) {
            return Err(InterpolationError::NonMonotonicData { index: index + 1 });
        }

        let (xs, ys): (Vec<T>, Vec<T>) = pairs.into_iter().unzip();
        Ok(Self { xs, ys })
    }

    /// Sorted x-coordinates.
    #[inline]
    pub fn xs(&self) -> &[T] {
        &self.xs
    }

    /// y-values in sorted x order.
    #[inline]
    pub fn ys(&self) -> &[T] {
        &self.ys
    }

    /// Number of knots.
    #[inline]
    pub fn len(&self) -> usize {
        self.xs.len()
    }

    /// Always false for a constructed interpolator.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }

    /// Index `i` with `xs[i] <= x < xs[i+1]`, clamped to [0, n-2].
    #[inline]
    fn find_segment(&self, x: T) -> usize {
        let pos = self.xs.partition_point(|&xi| xi <= x);
        if pos == 0 {
            0
        } else if pos >= self.xs.len() {
            self.xs.len() - 2
        } else {
            pos - 1
        }
    }

    #[inline]
    fn segment_value(&self, i: usize, x: T) -> T {
        let (x0, x1) = (self.xs[i], self.xs[i + 1]);
        let (y0, y1) = (self.ys[i], self.ys[i + 1]);
        y0 + (y1 - y0) * (x - x0) / (x1 - x0)
    }

    /// Value at `x` with flat extrapolation beyond the first and last knot.
    pub fn value_flat(&self, x: T) -> T {
        let last = self.xs.len() - 1;
        if x <= self.xs[0] {
            self.ys[0]
        } else if x >= self.xs[last] {
            self.ys[last]
        } else {
            self.segment_value(self.find_segment(x), x)
        }
    }

    /// Slope of the segment containing `x`; zero outside the knot range.
    ///
    /// At an interior knot the slope of the segment to the right is used.
    pub fn slope(&self, x: T) -> T {
        let last = self.xs.len() - 1;
        if x < self.xs[0] || x >= self.xs[last] {
            return T::zero();
        }
        let i = self.find_segment(x);
        (self.ys[i + 1] - self.ys[i]) / (self.xs[i + 1] - self.xs[i])
    }
}

impl<T: Float> Interpolator<T> for LinearInterpolator<T> {
    fn interpolate(&self, x: T) -> Result<T, InterpolationError> {
        let (x_min, x_max) = self.domain();
        if x < x_min || x > x_max {
            return Err(InterpolationError::OutOfBounds {
                x: x.to_f64().unwrap_or(f64::NAN),
                min: x_min.to_f64().unwrap_or(f64::NAN),
                max: x_max.to_f64().unwrap_or(f64::NAN),
            });
        }
        Ok(self.segment_value(self.find_segment(x), x))
    }

    #[inline]
    fn domain(&self) -> (T, T) {
        (self.xs[0], self.xs[self.xs.len() - 1])
    }
}
