use std::sync::atomic::{AtomicBool, Ordering};

use crossbeam_channel::{Receiver, Sender};
use num_bigint::BigUint;

use crate::convergence::{ConvergenceChecker, Outcome, Strategy};
use crate::partition::Stripe;
use crate::step::Step;

/// A candidate that ran out of iteration budget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub worker_id: usize,
    pub value: BigUint,
}

/// State shared by all workers of one run.
///
/// The stop flag is read with relaxed ordering: a worker may finish one more candidate after
/// another worker raised it, which only delays shutdown.
pub struct RunContext {
    stop: AtomicBool,
    violations_tx: Sender<Violation>,
    violations_rx: Receiver<Violation>,
}

impl RunContext {
    pub fn new() -> Self {
        let (violations_tx, violations_rx) = crossbeam_channel::unbounded();
        Self {
            stop: AtomicBool::new(false),
            violations_tx,
            violations_rx,
        }
    }

    pub fn should_stop(&self) -> bool {
        self.stop.load(Ordering::Relaxed)
    }

    pub fn signal_stop(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }

    pub fn report_violation(&self, violation: Violation) {
        tracing::warn!(
            worker = violation.worker_id,
            value = %violation.value,
            "iteration limit exceeded"
        );
        // The receiver lives as long as the context, so the send cannot fail.
        let _ = self.violations_tx.send(violation);
        self.signal_stop();
    }

    /// Violations in the order workers reported them. Call after every worker has been joined.
    pub fn drain_violations(&self) -> Vec<Violation> {
        self.violations_rx.try_iter().collect()
    }
}

impl Default for RunContext {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Every candidate of the stripe converged.
    Exhausted,
    /// Another worker raised the stop flag.
    Signaled,
    /// This worker found a candidate that exceeded the budget.
    Violation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    Running,
    Stopped(StopReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerSummary {
    pub worker_id: usize,
    pub checked: u64,
    pub stop_reason: StopReason,
}

/// Drives the convergence checker over one stripe.
pub struct Worker<'a, S: Step> {
    stripe: Stripe,
    checker: &'a ConvergenceChecker<S>,
    strategy: Strategy,
    ctx: &'a RunContext,
    state: WorkerState,
    checked: u64,
    scratch: BigUint,
}

impl<'a, S: Step> Worker<'a, S> {
    pub fn new(
        stripe: Stripe,
        checker: &'a ConvergenceChecker<S>,
        strategy: Strategy,
        ctx: &'a RunContext,
    ) -> Self {
        Self {
            stripe,
            checker,
            strategy,
            ctx,
            state: WorkerState::Running,
            checked: 0,
            scratch: BigUint::default(),
        }
    }

    pub fn id(&self) -> usize {
        self.stripe.index()
    }

    /// Processes at most one candidate.
    pub fn tick(&mut self) -> WorkerState {
        if self.state != WorkerState::Running {
            return self.state;
        }
        if self.ctx.should_stop() {
            self.state = WorkerState::Stopped(StopReason::Signaled);
            return self.state;
        }
        let Some(candidate) = self.stripe.next() else {
            self.state = WorkerState::Stopped(StopReason::Exhausted);
            return self.state;
        };

        let outcome = self.checker.check(&candidate, &mut self.scratch, self.strategy);
        self.checked += 1;

        if outcome == Outcome::LimitExceeded {
            println!("Thread {}: {} exceeded iteration limit", self.id(), candidate);
            self.ctx.report_violation(Violation {
                worker_id: self.id(),
                value: candidate,
            });
            self.state = WorkerState::Stopped(StopReason::Violation);
        }
        self.state
    }

    pub fn run(mut self) -> WorkerSummary {
        tracing::debug!(worker = self.id(), stride = self.stripe.stride(), "worker started");

        let stop_reason = loop {
            if let WorkerState::Stopped(reason) = self.tick() {
                break reason;
            }
        };

        tracing::debug!(
            worker = self.id(),
            checked = self.checked,
            reason = ?stop_reason,
            "worker stopped"
        );
        WorkerSummary {
            worker_id: self.id(),
            checked: self.checked,
            stop_reason,
        }
    }
}
