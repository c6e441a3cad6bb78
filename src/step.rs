use num_bigint::BigUint;
use num_integer::Integer;

/// One transition of a sequence, applied in place.
///
/// Implementations must be shareable across worker threads; the run engine hands the same
/// step to every worker by reference.
pub trait Step: Sync {
    fn advance(&self, n: &mut BigUint);
}

/// The Collatz map with the odd case merged into the halving that always follows it:
/// `n / 2` for even `n`, `(3n + 1) / 2` for odd `n`.
///
/// `n` must be positive.
#[derive(Debug, Clone, Copy, Default)]
pub struct CollatzStep;

impl Step for CollatzStep {
    fn advance(&self, n: &mut BigUint) {
        if n.is_odd() {
            *n *= 3u32;
            *n += 1u32;
        }
        *n >>= 1u32;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(n: u64) -> BigUint {
        let mut value = BigUint::from(n);
        CollatzStep.advance(&mut value);
        value
    }

    #[test]
    fn test_even_values_are_halved() {
        assert_eq!(step(2), BigUint::from(1u32));
        assert_eq!(step(10), BigUint::from(5u32));
        assert_eq!(step(1024), BigUint::from(512u32));
    }

    #[test]
    fn test_odd_values_take_merged_step() {
        // 3 -> 10 -> 5
        assert_eq!(step(3), BigUint::from(5u32));
        // 27 -> 82 -> 41
        assert_eq!(step(27), BigUint::from(41u32));
        // 1 -> 4 -> 2
        assert_eq!(step(1), BigUint::from(2u32));
    }

    #[test]
    fn test_values_beyond_machine_words() {
        let mut value = BigUint::from(u64::MAX);
        CollatzStep.advance(&mut value);

        let expected = (BigUint::from(u64::MAX) * 3u32 + 1u32) / 2u32;
        assert_eq!(value, expected);
        assert!(value > BigUint::from(u64::MAX));
    }
}
