use std::io;
use std::thread;
use std::time::Instant;

use num_bigint::BigUint;

use crate::config::RunConfig;
use crate::convergence::{ConvergenceChecker, Outcome};
use crate::error::CollatzError;
use crate::interval::Interval;
use crate::partition::partition;
use crate::step::Step;
use crate::verdict::Verdict;
use crate::worker::{RunContext, Worker, WorkerSummary};

/// Checks every integer of `interval` with the Collatz step and the budget from `config`.
pub fn verify(interval: &Interval, config: &RunConfig) -> Result<Verdict, CollatzError> {
    let checker = ConvergenceChecker::new(config.max_steps);
    verify_with(interval, config, &checker)
}

/// Runs one worker thread per stripe of `interval` and joins them all.
///
/// With [`Strategy::Known`](crate::Strategy::Known) the caller asserts that every integer
/// below `interval.lower()` converges.
pub fn verify_with<S: Step>(
    interval: &Interval,
    config: &RunConfig,
    checker: &ConvergenceChecker<S>,
) -> Result<Verdict, CollatzError> {
    verify_with_builder(interval, config, checker, |id| {
        Ok(thread::Builder::new().name(format!("collatz-worker-{}", id)))
    })
}

/// `thread_builder` supplies the builder for each worker id; an `Err` is treated like a
/// failed spawn.
fn verify_with_builder<S, B>(
    interval: &Interval,
    config: &RunConfig,
    checker: &ConvergenceChecker<S>,
    thread_builder: B,
) -> Result<Verdict, CollatzError>
where
    S: Step,
    B: Fn(usize) -> io::Result<thread::Builder>,
{
    config.validate()?;
    let stripes = partition(interval, config.workers)?;
    let ctx = RunContext::new();
    let started = Instant::now();

    tracing::info!(
        lower = %interval.lower(),
        upper = %interval.upper(),
        workers = config.workers,
        max_steps = checker.max_steps(),
        strategy = ?config.strategy,
        "starting interval run"
    );

    let summaries = thread::scope(|scope| -> Result<Vec<WorkerSummary>, CollatzError> {
        let mut handles = Vec::with_capacity(stripes.len());

        for stripe in stripes {
            let worker = Worker::new(stripe, checker, config.strategy, &ctx);
            let spawned = thread_builder(worker.id())
                .and_then(|builder| builder.spawn_scoped(scope, move || worker.run()));

            match spawned {
                Ok(handle) => handles.push(handle),
                Err(e) => {
                    tracing::error!(started = handles.len(), error = %e, "failed to spawn worker");
                    ctx.signal_stop();
                    for (id, handle) in handles.into_iter().enumerate() {
                        if handle.join().is_err() {
                            tracing::error!(worker = id, "worker panicked during shutdown");
                        }
                    }
                    return Err(CollatzError::ThreadSpawn(e));
                }
            }
        }

        let mut summaries = Vec::with_capacity(handles.len());
        let mut panicked = None;
        for (id, handle) in handles.into_iter().enumerate() {
            match handle.join() {
                Ok(summary) => summaries.push(summary),
                Err(_) => {
                    tracing::error!(worker = id, "worker panicked");
                    ctx.signal_stop();
                    panicked.get_or_insert(id);
                }
            }
        }

        match panicked {
            Some(id) => Err(CollatzError::WorkerPanicked(id)),
            None => Ok(summaries),
        }
    })?;

    let verdict = Verdict::collect(&ctx, summaries, started.elapsed());
    tracing::info!(
        passed = verdict.all_passed(),
        checked = verdict.candidates_checked(),
        stopped_early = verdict.stopped_early(),
        elapsed_ms = verdict.elapsed.as_millis() as u64,
        "interval run finished"
    );
    Ok(verdict)
}

/// Single-threaded check of one number with the plain strategy.
pub fn check_number(n: &BigUint, max_steps: u64) -> Outcome {
    let outcome = ConvergenceChecker::new(max_steps).check_unknown(n);
    if let Outcome::Converged { steps } = outcome {
        tracing::info!(number = %n, steps, "converged");
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convergence::Strategy;
    use crate::step::CollatzStep;
    use crate::worker::StopReason;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::time::Duration;

    struct Oscillate;

    impl Step for Oscillate {
        fn advance(&self, n: &mut BigUint) {
            *n = if *n == BigUint::from(2u32) {
                BigUint::from(3u32)
            } else {
                BigUint::from(2u32)
            };
        }
    }

    /// Collatz step that counts every call and panics inside the named worker thread.
    struct Tripwire {
        calls: Arc<AtomicU64>,
        panic_in: Option<&'static str>,
    }

    impl Step for Tripwire {
        fn advance(&self, n: &mut BigUint) {
            if self.panic_in.is_some() && thread::current().name() == self.panic_in {
                panic!("tripwire");
            }
            self.calls.fetch_add(1, Ordering::SeqCst);
            thread::sleep(Duration::from_micros(50));
            CollatzStep.advance(n);
        }
    }

    #[test]
    fn test_small_interval_passes() {
        let interval = Interval::from_u64(1, 100).unwrap();
        let config = RunConfig::default_config().with_workers(4).with_max_steps(10_000);

        let verdict = verify(&interval, &config).unwrap();
        assert!(verdict.all_passed());
        assert_eq!(verdict.candidates_checked(), 99);
        assert_eq!(verdict.workers.len(), 4);
        assert!(verdict.workers.iter().all(|w| w.stop_reason == StopReason::Exhausted));
    }

    #[test]
    fn test_size_one_interval_checks_one_candidate() {
        let interval = Interval::from_u64(27, 28).unwrap();
        let config = RunConfig::default_config().with_workers(3).with_max_steps(10_000);

        let verdict = verify(&interval, &config).unwrap();
        assert!(verdict.all_passed());
        assert_eq!(verdict.candidates_checked(), 1);
    }

    #[test]
    fn test_non_converging_step_fails_run() {
        // Every start except 1 oscillates between 2 and 3 under this step.
        let interval = Interval::from_u64(2, 10_000).unwrap();
        let config = RunConfig::default_config().with_workers(2);
        let checker = ConvergenceChecker::with_step(Oscillate, 5);

        let verdict = verify_with(&interval, &config, &checker).unwrap();
        assert!(!verdict.all_passed());
        assert!(verdict.first_violation().is_some());
        // Each worker stops after at most one more candidate once the flag is raised.
        assert!(verdict.candidates_checked() <= 4);
    }

    #[test]
    fn test_known_strategy_agrees() {
        let interval = Interval::from_u64(1, 500).unwrap();
        let unknown = RunConfig::default_config().with_workers(3).with_max_steps(10_000);
        let known = unknown.clone().with_strategy(Strategy::Known);

        assert!(verify(&interval, &unknown).unwrap().all_passed());
        assert!(verify(&interval, &known).unwrap().all_passed());
    }

    #[test]
    fn test_zero_workers_rejected() {
        let interval = Interval::from_u64(1, 10).unwrap();
        let config = RunConfig::default_config().with_workers(0);
        assert!(matches!(verify(&interval, &config), Err(CollatzError::InvalidWorkerCount(0))));
    }

    #[test]
    fn test_check_number() {
        assert_eq!(check_number(&BigUint::from(27u32), 1_000), Outcome::Converged { steps: 70 });
        assert_eq!(check_number(&BigUint::from(27u32), 10), Outcome::LimitExceeded);
    }

    #[test]
    fn test_panicked_worker_fails_run_after_join() {
        let interval = Interval::from_u64(2, 100).unwrap();
        let config = RunConfig::default_config().with_workers(3).with_max_steps(10_000);
        let calls = Arc::new(AtomicU64::new(0));
        let step = Tripwire { calls: calls.clone(), panic_in: Some("collatz-worker-1") };
        let checker = ConvergenceChecker::with_step(step, 10_000);

        let result = verify_with(&interval, &config, &checker);
        assert!(matches!(result, Err(CollatzError::WorkerPanicked(1))), "got {:?}", result.err());

        // Every other worker has been joined: nothing advances after the call returns.
        let settled = calls.load(Ordering::SeqCst);
        assert!(settled > 0);
        thread::sleep(Duration::from_millis(20));
        assert_eq!(calls.load(Ordering::SeqCst), settled);
    }

    #[test]
    fn test_spawn_failure_stops_and_joins_started_workers() {
        let interval = Interval::from_u64(2, 1_000_000).unwrap();
        let config = RunConfig::default_config().with_workers(4).with_max_steps(10_000);
        let calls = Arc::new(AtomicU64::new(0));
        let step = Tripwire { calls: calls.clone(), panic_in: None };
        let checker = ConvergenceChecker::with_step(step, 10_000);

        let result = verify_with_builder(&interval, &config, &checker, |id| {
            if id == 2 {
                Err(io::Error::new(io::ErrorKind::Other, "thread limit reached"))
            } else {
                Ok(thread::Builder::new().name(format!("collatz-worker-{}", id)))
            }
        });
        assert!(matches!(result, Err(CollatzError::ThreadSpawn(_))), "got {:?}", result.err());

        // Workers 0 and 1 saw the stop flag and were joined long before the interval ran out.
        let settled = calls.load(Ordering::SeqCst);
        thread::sleep(Duration::from_millis(20));
        assert_eq!(calls.load(Ordering::SeqCst), settled);
        assert!(settled < 1_000_000);
    }
}
