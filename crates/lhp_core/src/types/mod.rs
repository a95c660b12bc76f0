//! Core error types.
//!
//! This module provides:
//! - `error`: Structured error types for tranche pricing and interpolation
//!
//! # Re-exports
//!
//! [`LhpError`], [`ErrorKind`] and [`InterpolationError`] are re-exported at
//! this module level.

pub mod error;

pub use error::{ErrorKind, InterpolationError, LhpError};
