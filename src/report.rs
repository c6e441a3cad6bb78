use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::config::RunConfig;
use crate::convergence::Strategy;
use crate::error::CollatzError;
use crate::interval::Interval;
use crate::verdict::Verdict;

/// JSON summary of a finished run. Big integers are written as decimal strings.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub lower: String,
    pub upper: String,
    pub workers: usize,
    pub max_steps: u64,
    pub strategy: Strategy,
    pub all_passed: bool,
    pub first_violation: Option<String>,
    pub violations: Vec<ReportedViolation>,
    pub candidates_checked: u64,
    pub elapsed_ms: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportedViolation {
    pub worker_id: usize,
    pub value: String,
}

impl RunReport {
    pub fn new(interval: &Interval, config: &RunConfig, verdict: &Verdict) -> Self {
        Self {
            lower: interval.lower().to_string(),
            upper: interval.upper().to_string(),
            workers: config.workers,
            max_steps: config.max_steps,
            strategy: config.strategy,
            all_passed: verdict.all_passed(),
            first_violation: verdict.first_violation().map(|v| v.to_string()),
            violations: verdict
                .violations
                .iter()
                .map(|v| ReportedViolation {
                    worker_id: v.worker_id,
                    value: v.value.to_string(),
                })
                .collect(),
            candidates_checked: verdict.candidates_checked(),
            elapsed_ms: verdict.elapsed.as_millis() as u64,
        }
    }

    pub fn to_json(&self) -> Result<String, CollatzError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn write_to(&self, path: &Path) -> Result<(), CollatzError> {
        fs::write(path, self.to_json()?)?;
        tracing::info!(path = %path.display(), "report written");
        Ok(())
    }
}
