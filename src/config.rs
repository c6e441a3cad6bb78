use sysinfo::System;

use crate::convergence::Strategy;
use crate::error::CollatzError;

/// Steps a single candidate may take before it is reported.
pub const DEFAULT_MAX_STEPS: u64 = 100_000_000_000;

/// Configuration for one interval run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub workers: usize,
    pub max_steps: u64,
    pub strategy: Strategy,
}

impl RunConfig {
    /// One worker per processing unit on this host.
    pub fn detect() -> Self {
        Self {
            workers: available_processing_units(),
            max_steps: DEFAULT_MAX_STEPS,
            strategy: Strategy::Unknown,
        }
    }

    /// Single worker, default budget. Deterministic regardless of the host.
    pub fn default_config() -> Self {
        Self {
            workers: 1,
            max_steps: DEFAULT_MAX_STEPS,
            strategy: Strategy::Unknown,
        }
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_max_steps(mut self, max_steps: u64) -> Self {
        self.max_steps = max_steps;
        self
    }

    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn validate(&self) -> Result<(), CollatzError> {
        if self.workers == 0 {
            return Err(CollatzError::InvalidWorkerCount(self.workers));
        }
        Ok(())
    }
}

/// Number of logical CPUs, falling back to the standard library's estimate and then to 1.
pub fn available_processing_units() -> usize {
    let mut sys = System::new();
    sys.refresh_cpu();

    let cpus = sys.cpus().len();
    if cpus > 0 {
        return cpus;
    }

    tracing::debug!("sysinfo reported no CPUs, falling back to available_parallelism");
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}
