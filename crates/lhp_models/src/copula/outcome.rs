//! Tagged results for functions that report reserved numbers.
//!
//! Several LHP functions answer an invalid correlation with a fixed number
//! instead of an error. [`Evaluation`] keeps that number available for
//! callers that expect it while letting typed call sites tell it apart from
//! a computed value. Hard failures travel separately as
//! [`LhpError`](lhp_core::types::LhpError).

/// Outcome of an evaluation that may emit a sentinel.
///
/// # Examples
/// ```
/// use lhp_models::copula::Evaluation;
///
/// let ok = Evaluation::Value(0.25);
/// assert_eq!(ok.value(), Some(0.25));
///
/// let flagged = Evaluation::Sentinel(999.0);
/// assert!(flagged.is_sentinel());
/// assert_eq!(flagged.value(), None);
/// assert_eq!(flagged.raw(), 999.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Evaluation {
    /// A computed result, including closed-form degenerate answers.
    Value(f64),
    /// A reserved number signalling invalid input.
    Sentinel(f64),
}

impl Evaluation {
    /// The number exactly as the flat function interface returns it.
    #[inline]
    pub fn raw(self) -> f64 {
        match self {
            Evaluation::Value(v) | Evaluation::Sentinel(v) => v,
        }
    }

    /// The computed value, or `None` for a sentinel.
    #[inline]
    pub fn value(self) -> Option<f64> {
        match self {
            Evaluation::Value(v) => Some(v),
            Evaluation::Sentinel(_) => None,
        }
    }

    /// Whether this outcome is a sentinel.
    #[inline]
    pub fn is_sentinel(self) -> bool {
        matches!(self, Evaluation::Sentinel(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_accessors() {
        let e = Evaluation::Value(0.0);
        assert!(!e.is_sentinel());
        assert_eq!(e.value(), Some(0.0));
        assert_eq!(e.raw(), 0.0);
    }

    #[test]
    fn test_sentinel_accessors() {
        let e = Evaluation::Sentinel(99.0);
        assert!(e.is_sentinel());
        assert_eq!(e.value(), None);
        assert_eq!(e.raw(), 99.0);
    }

    #[test]
    fn test_zero_sentinel_differs_from_zero_value() {
        assert_ne!(Evaluation::Sentinel(0.0), Evaluation::Value(0.0));
        assert_eq!(Evaluation::Sentinel(0.0).raw(), Evaluation::Value(0.0).raw());
    }
}
