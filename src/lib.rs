pub mod config;
pub mod convergence;
pub mod engine;
pub mod error;
pub mod interval;
pub mod partition;
pub mod report;
pub mod step;
pub mod verdict;
pub mod worker;

pub use config::*;
pub use convergence::{ConvergenceChecker, Outcome, Strategy};
pub use engine::{check_number, verify, verify_with};
pub use error::*;
pub use interval::Interval;
pub use step::{CollatzStep, Step};
pub use verdict::Verdict;

use tracing_subscriber::EnvFilter;

/// Installs the stderr log subscriber for a binary. `RUST_LOG` overrides the default `warn`.
pub fn init_tracing(service: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();

    if installed.is_ok() {
        tracing::debug!(service, "tracing initialised");
    }
}
