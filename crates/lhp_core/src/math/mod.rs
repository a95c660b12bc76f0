//! Mathematical building blocks.
//!
//! - [`distributions`]: standard normal PDF, CDF, inverse CDF and bivariate CDF
//! - [`interpolators`]: piecewise linear interpolation with segment slopes

pub mod distributions;
pub mod interpolators;
