use num_bigint::BigUint;
use num_traits::One;
use serde::Serialize;

use crate::step::{CollatzStep, Step};

/// Result of iterating one candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The candidate reached 1, or fell below its starting value under [`Strategy::Known`].
    Converged { steps: u64 },
    /// The iteration budget ran out first.
    LimitExceeded,
}

impl Outcome {
    pub fn is_converged(&self) -> bool {
        matches!(self, Outcome::Converged { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Iterate every candidate all the way down to 1.
    #[default]
    Unknown,
    /// Stop as soon as the running value drops below the starting value.
    ///
    /// Only sound when every positive integer below the candidate is already known to
    /// converge. The caller asserts this; it is never checked here.
    Known,
}

/// Bounded iteration of a [`Step`] until convergence.
#[derive(Debug, Clone)]
pub struct ConvergenceChecker<S = CollatzStep> {
    step: S,
    max_steps: u64,
}

impl ConvergenceChecker<CollatzStep> {
    pub fn new(max_steps: u64) -> Self {
        Self::with_step(CollatzStep, max_steps)
    }
}

impl<S: Step> ConvergenceChecker<S> {
    pub fn with_step(step: S, max_steps: u64) -> Self {
        Self { step, max_steps }
    }

    pub fn max_steps(&self) -> u64 {
        self.max_steps
    }

    /// Iterates `start` using `scratch` as the working value.
    ///
    /// `scratch` is overwritten; passing the same buffer for every candidate lets a worker
    /// reuse its allocation. `start` itself is left untouched for reporting.
    pub fn check(&self, start: &BigUint, scratch: &mut BigUint, strategy: Strategy) -> Outcome {
        scratch.clone_from(start);
        match strategy {
            Strategy::Unknown => self.iterate(scratch, |_| false),
            Strategy::Known => self.iterate(scratch, |value| value < start),
        }
    }

    pub fn check_unknown(&self, start: &BigUint) -> Outcome {
        let mut scratch = BigUint::default();
        self.check(start, &mut scratch, Strategy::Unknown)
    }

    pub fn check_known(&self, start: &BigUint) -> Outcome {
        let mut scratch = BigUint::default();
        self.check(start, &mut scratch, Strategy::Known)
    }

    fn iterate(&self, value: &mut BigUint, below_verified: impl Fn(&BigUint) -> bool) -> Outcome {
        let one = BigUint::one();
        let mut steps = 0u64;

        while *value > one {
            if steps == self.max_steps {
                return Outcome::LimitExceeded;
            }
            self.step.advance(value);
            steps += 1;

            if below_verified(value) {
                return Outcome::Converged { steps };
            }
        }

        Outcome::Converged { steps }
    }
}
