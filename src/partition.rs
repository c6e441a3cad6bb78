use num_bigint::BigUint;

use crate::error::CollatzError;
use crate::interval::Interval;

/// Every `stride`-th integer of an interval, starting at `lower + index`.
#[derive(Debug, Clone)]
pub struct Stripe {
    index: usize,
    stride: u64,
    next: BigUint,
    upper: BigUint,
}

impl Stripe {
    pub fn new(interval: &Interval, index: usize, stride: usize) -> Self {
        Self {
            index,
            stride: stride as u64,
            next: interval.lower() + index as u64,
            upper: interval.upper().clone(),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn stride(&self) -> u64 {
        self.stride
    }
}

impl Iterator for Stripe {
    type Item = BigUint;

    fn next(&mut self) -> Option<BigUint> {
        if self.next >= self.upper {
            return None;
        }
        let candidate = self.next.clone();
        self.next += self.stride;
        Some(candidate)
    }
}

/// Splits `interval` into `workers` interleaved stripes.
///
/// Stripe `i` holds `lower + i, lower + i + workers, ...`; together the stripes cover the
/// interval exactly once. Stripes past the end of a short interval are empty.
pub fn partition(interval: &Interval, workers: usize) -> Result<Vec<Stripe>, CollatzError> {
    if workers == 0 {
        return Err(CollatzError::InvalidWorkerCount(workers));
    }
    Ok((0..workers).map(|index| Stripe::new(interval, index, workers)).collect())
}
