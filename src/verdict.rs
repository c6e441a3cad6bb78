use std::time::Duration;

use itertools::Itertools;
use num_bigint::BigUint;

use crate::worker::{RunContext, StopReason, Violation, WorkerSummary};

/// Combined outcome of every worker in a run.
#[derive(Debug, Clone)]
pub struct Verdict {
    pub violations: Vec<Violation>,
    pub workers: Vec<WorkerSummary>,
    pub elapsed: Duration,
}

impl Verdict {
    /// Builds the verdict once every worker has been joined.
    pub fn collect(ctx: &RunContext, mut workers: Vec<WorkerSummary>, elapsed: Duration) -> Self {
        workers.sort_by_key(|w| w.worker_id);
        let violations = ctx.drain_violations();

        if !violations.is_empty() {
            tracing::info!(
                "violations: {}",
                violations.iter().map(|v| format!("{}@{}", v.value, v.worker_id)).join(", ")
            );
        }

        Self {
            violations,
            workers,
            elapsed,
        }
    }

    pub fn all_passed(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn first_violation(&self) -> Option<&BigUint> {
        self.violations.first().map(|v| &v.value)
    }

    pub fn candidates_checked(&self) -> u64 {
        self.workers.iter().map(|w| w.checked).sum()
    }

    pub fn stopped_early(&self) -> usize {
        self.workers
            .iter()
            .filter(|w| w.stop_reason == StopReason::Signaled)
            .count()
    }
}
