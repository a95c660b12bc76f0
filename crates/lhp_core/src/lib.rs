//! # lhp_core: Numerical Foundation for LHP Tranche Pricing
//!
//! ## Layer 1 (Foundation) Role
//!
//! lhp_core is the bottom layer of the workspace and provides:
//! - Standard normal special functions (`math::distributions`)
//! - Piecewise linear interpolation (`math::interpolators`)
//! - The narrow special-function interface used by the copula kernel (`traits`)
//! - Error types: `LhpError`, `InterpolationError` (`types::error`)
//!
//! ## Minimal Dependencies
//!
//! Layer 1 has no dependencies on other lhp_* crates:
//! - num-traits: Traits for generic numerical computation
//! - thiserror: Error derivation
//! - serde: Serialisation support (optional)
//!
//! ## Usage Examples
//!
//! ```rust
//! use lhp_core::math::distributions::{bivariate_norm_cdf, norm_cdf, norm_inv_cdf};
//!
//! let x = norm_inv_cdf(0.975);
//! assert!((x - 1.959963984540054).abs() < 1e-9);
//! assert!((norm_cdf(x) - 0.975).abs() < 1e-12);
//!
//! // P(X <= 0, Y <= 0) = 1/4 + asin(rho) / (2 pi)
//! let m = bivariate_norm_cdf(0.0, 0.0, 0.5);
//! assert!((m - 1.0 / 3.0).abs() < 1e-12);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialisation for error types

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod math;
pub mod traits;
pub mod types;
