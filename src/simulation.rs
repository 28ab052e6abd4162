pub mod counters;
pub mod reporter;
pub mod sampler;
pub mod worker;

use crate::error::Result;
use crate::sim_config::global_config::GlobalSimConfig;
use crate::sim_config::parallel_launch::{parallel_work, OsThreads};
use crate::util::harness_utils::available_cores;
use counters::Estimate;
use std::io::Write;
use std::time::Duration;
use tracing::{info, warn};

/// Result of a completed run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub total: u64,
    pub inside: u64,
    /// Every estimate the reporter emitted, in order
    pub estimates: Vec<Estimate>,
    /// Samples contributed by each worker, indexed by worker id
    pub per_worker: Vec<u64>,
    pub elapsed: Duration,
}

impl RunSummary {
    pub fn final_estimate(&self) -> Option<Estimate> {
        self.estimates.last().copied()
    }

    /// Final counters as an estimate, whether or not it was emitted.
    pub fn estimate(&self) -> Estimate {
        Estimate {
            total: self.total,
            inside: self.inside,
        }
    }
}

/// A Monte-Carlo pi estimation over `config.workers` threads.
pub struct Simulation {
    config: GlobalSimConfig,
}

impl Simulation {
    pub fn new(config: GlobalSimConfig) -> Self {
        Simulation { config }
    }

    /// Run to completion, writing one approximation line per report to `out`.
    pub fn run<W: Write + Send + 'static>(self, out: W) -> Result<RunSummary> {
        let cores = available_cores();
        if self.config.workers > cores {
            warn!(
                workers = self.config.workers,
                cores, "More workers than cores, workers will time-share"
            );
        }
        info!(
            workers = self.config.workers,
            samples = self.config.target,
            report_interval = self.config.report_interval,
            sampler = ?self.config.sampler,
            seed = self.config.seed,
            "Starting simulation"
        );

        let summary = parallel_work(&self.config, out, &mut OsThreads)?;

        let approximation = summary.estimate().approximation();
        info!(
            total = summary.total,
            inside = summary.inside,
            approximation,
            error = std::f64::consts::PI - approximation,
            reports = summary.estimates.len(),
            elapsed_ms = summary.elapsed.as_millis() as u64,
            "Simulation complete"
        );
        Ok(summary)
    }
}
