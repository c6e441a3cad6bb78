use num_bigint::{BigInt, BigUint};
use num_traits::One;

use crate::error::CollatzError;

/// Validated half-open range `[lower, upper)` with `lower >= 1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interval {
    lower: BigUint,
    upper: BigUint,
}

impl Interval {
    pub fn new(lower: BigInt, upper: BigInt) -> Result<Self, CollatzError> {
        if lower < BigInt::one() {
            return Err(CollatzError::LowerBoundNotPositive(lower));
        }
        if lower >= upper {
            return Err(CollatzError::EmptyInterval { lower, upper });
        }

        // Both bounds are positive past the checks above.
        match (lower.to_biguint(), upper.to_biguint()) {
            (Some(lower), Some(upper)) => Ok(Self { lower, upper }),
            _ => Err(CollatzError::Other("bounds must be non-negative".to_string())),
        }
    }

    /// The interval holding only `n`.
    pub fn single(n: BigInt) -> Result<Self, CollatzError> {
        let upper = &n + 1u32;
        Self::new(n, upper)
    }

    pub fn from_u64(lower: u64, upper: u64) -> Result<Self, CollatzError> {
        Self::new(BigInt::from(lower), BigInt::from(upper))
    }

    pub fn lower(&self) -> &BigUint {
        &self.lower
    }

    pub fn upper(&self) -> &BigUint {
        &self.upper
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_interval() {
        let interval = Interval::from_u64(1, 100).unwrap();
        assert_eq!(interval.lower(), &BigUint::from(1u32));
        assert_eq!(interval.upper(), &BigUint::from(100u32));
    }

    #[test]
    fn test_equal_bounds_rejected() {
        let err = Interval::from_u64(1, 1).unwrap_err();
        assert!(matches!(err, CollatzError::EmptyInterval { .. }));
    }

    #[test]
    fn test_reversed_bounds_rejected() {
        let err = Interval::from_u64(10, 5).unwrap_err();
        assert!(matches!(err, CollatzError::EmptyInterval { .. }));
    }

    #[test]
    fn test_non_positive_lower_rejected() {
        let err = Interval::from_u64(0, 10).unwrap_err();
        assert!(matches!(err, CollatzError::LowerBoundNotPositive(_)));

        let err = Interval::new(BigInt::from(-5), BigInt::from(10)).unwrap_err();
        assert!(matches!(err, CollatzError::LowerBoundNotPositive(_)));
    }

    #[test]
    fn test_single_interval_has_one_element() {
        let interval = Interval::single(BigInt::from(27)).unwrap();
        assert_eq!(interval.lower(), &BigUint::from(27u32));
        assert_eq!(interval.upper(), &BigUint::from(28u32));
    }
}
