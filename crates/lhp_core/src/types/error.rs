//! Error types for structured error handling.
//!
//! This module provides:
//! - `LhpError`: Explicit failures of the LHP tranche model
//! - `ErrorKind`: Coarse classification of an `LhpError`
//! - `InterpolationError`: Errors from interpolation operations

use thiserror::Error;

/// Coarse classification of an [`LhpError`].
///
/// # Variants
/// - `InvalidArgument`: A numeric argument violates the function contract
/// - `PreconditionViolation`: The caller broke a structural precondition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorKind {
    /// A numeric argument violates the function contract.
    InvalidArgument,
    /// The caller broke a structural precondition (empty or ragged portfolio).
    PreconditionViolation,
}

/// Explicit failures of the LHP tranche model.
///
/// Only a few conditions fail outright. Out-of-range correlations in the
/// expected-loss, CDF and finite-difference density paths are reported
/// through sentinel values instead.
///
/// # Variants
/// - `InvalidTranche`: Attachment is not below detachment
/// - `InvalidCorrelation`: |β| above the analytical density limit
/// - `EmptyPortfolio`: Zero credits
/// - `LengthMismatch`: Per-name arrays shorter than the credit count
/// - `InvalidInput`: Any other invalid parameter
///
/// # Examples
/// ```
/// use lhp_core::types::{ErrorKind, LhpError};
///
/// let err = LhpError::InvalidTranche { attachment: 0.10, detachment: 0.05 };
/// assert_eq!(err.kind(), ErrorKind::InvalidArgument);
/// assert_eq!(format!("{}", err), "Invalid tranche: K1 = 0.1 >= K2 = 0.05");
/// ```
#[derive(Debug, Clone, Error, PartialEq)]
pub enum LhpError {
    /// Attachment point is not strictly below the detachment point.
    #[error("Invalid tranche: K1 = {attachment} >= K2 = {detachment}")]
    InvalidTranche {
        /// Attachment point K1
        attachment: f64,
        /// Detachment point K2
        detachment: f64,
    },

    /// Correlation magnitude above the allowed limit.
    #[error("Invalid correlation: |beta| = {} is greater than {limit}", .beta.abs())]
    InvalidCorrelation {
        /// The rejected factor loading
        beta: f64,
        /// The limit that was exceeded
        limit: f64,
    },

    /// Portfolio with no credits.
    #[error("Empty portfolio: at least one credit is required")]
    EmptyPortfolio,

    /// Per-name arrays hold fewer entries than the declared credit count.
    #[error(
        "Portfolio length mismatch: {num_credits} credits but {survival} probabilities and {recovery} recovery rates"
    )]
    LengthMismatch {
        /// Declared number of credits
        num_credits: usize,
        /// Length of the probability array
        survival: usize,
        /// Length of the recovery-rate array
        recovery: usize,
    },

    /// Invalid input data or parameters.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl LhpError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            LhpError::InvalidTranche { .. }
            | LhpError::InvalidCorrelation { .. }
            | LhpError::InvalidInput(_) => ErrorKind::InvalidArgument,
            LhpError::EmptyPortfolio | LhpError::LengthMismatch { .. } => {
                ErrorKind::PreconditionViolation
            }
        }
    }
}

/// Interpolation-related errors.
///
/// # Variants
/// - `OutOfBounds`: Query point outside valid interpolation domain
/// - `InsufficientData`: Not enough data points for interpolation
/// - `NonMonotonicData`: Repeated x-coordinate
/// - `InvalidInput`: General invalid input error
///
/// # Examples
/// ```
/// use lhp_core::types::InterpolationError;
///
/// let err = InterpolationError::OutOfBounds { x: 0.5, min: 0.03, max: 0.3 };
/// assert!(format!("{}", err).contains("outside valid domain"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InterpolationError {
    /// Query point outside valid interpolation domain.
    #[error("Query point {x} outside valid domain [{min}, {max}]")]
    OutOfBounds {
        /// The query point that was out of bounds
        x: f64,
        /// Minimum valid value
        min: f64,
        /// Maximum valid value
        max: f64,
    },

    /// Insufficient data points for interpolation.
    #[error("Insufficient data points: got {got}, need at least {need}")]
    InsufficientData {
        /// Number of points provided
        got: usize,
        /// Minimum number of points required
        need: usize,
    },

    /// Repeated x-coordinate after sorting.
    #[error("Data is not strictly monotonic at index {index}")]
    NonMonotonicData {
        /// Index of the repeated knot
        index: usize,
    },

    /// Invalid input data or parameters.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<InterpolationError> for LhpError {
    fn from(err: InterpolationError) -> Self {
        LhpError::InvalidInput(err.to_string())
    }
}
