//! Run-wide configuration
//!
//! `CliArgs` is what clap parses; `GlobalSimConfig` is the validated, read-only
//! configuration every thread of a run shares.

use crate::error::ConfigError;
use crate::sim_config::local_config::LocalSimConfig;
use crate::util::harness_utils::{clock_seed, thread_seed};
use clap::{Parser, ValueEnum};

/// Upper bound on worker threads
pub const MAX_WORKERS: usize = 1000;

/// Samples between two intermediate reports
pub const DEFAULT_REPORT_INTERVAL: u64 = 1_000_000;

/// How workers obtain random numbers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SamplerMode {
    /// Independent generator per worker, no contention
    #[default]
    PerWorker,
    /// One generator behind a mutex shared by all workers
    Shared,
}

/// Estimate pi by Monte-Carlo sampling on parallel worker threads
#[derive(Parser, Debug, Clone)]
#[command(
    name = "monte-pi",
    version,
    about = "Estimate pi by Monte-Carlo sampling on parallel worker threads",
    after_help = "EXAMPLES:\n    \
        monte-pi 8 10000000\n    \
        monte-pi 4 3500000 --sampler shared\n    \
        monte-pi 16 50000000 --seed 42 -v"
)]
pub struct CliArgs {
    /// Number of worker threads (1 to 1000)
    #[arg(value_name = "WORKERS")]
    pub workers: usize,

    /// Total number of samples to draw
    #[arg(value_name = "SAMPLES")]
    pub samples: u64,

    /// Emit an approximation every N samples
    #[arg(long, default_value_t = DEFAULT_REPORT_INTERVAL, value_name = "N")]
    pub report_interval: u64,

    /// Random number generator layout
    #[arg(long, value_enum, default_value_t = SamplerMode::PerWorker)]
    pub sampler: SamplerMode,

    /// Base seed (defaults to the current time)
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u64>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Validated configuration of a single run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalSimConfig {
    /// Number of worker threads
    pub workers: usize,

    /// Samples after which the run terminates
    pub target: u64,

    /// Samples between intermediate reports
    pub report_interval: u64,

    /// Random number generator layout
    pub sampler: SamplerMode,

    /// Base seed from which per-thread seeds are derived
    pub seed: u64,
}

impl GlobalSimConfig {
    /// Configuration with default interval and sampler, seeded from the clock.
    pub fn new(workers: usize, target: u64) -> Result<Self, ConfigError> {
        let config = GlobalSimConfig {
            workers,
            target,
            report_interval: DEFAULT_REPORT_INTERVAL,
            sampler: SamplerMode::default(),
            seed: clock_seed(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate parsed command-line arguments.
    pub fn from_args(args: CliArgs) -> Result<Self, ConfigError> {
        let config = GlobalSimConfig {
            workers: args.workers,
            target: args.samples,
            report_interval: args.report_interval,
            sampler: args.sampler,
            seed: args.seed.unwrap_or_else(clock_seed),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn with_report_interval(mut self, interval: u64) -> Result<Self, ConfigError> {
        self.report_interval = interval;
        self.validate()?;
        Ok(self)
    }

    pub fn with_sampler(mut self, sampler: SamplerMode) -> Self {
        self.sampler = sampler;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Per-thread view for worker `tid`.
    pub fn local(&self, tid: usize) -> LocalSimConfig {
        LocalSimConfig::new(tid, thread_seed(self.seed, tid))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.workers == 0 || self.workers > MAX_WORKERS {
            return Err(ConfigError::InvalidWorkerCount {
                count: self.workers,
                max: MAX_WORKERS,
            });
        }
        if self.target == 0 {
            return Err(ConfigError::InvalidTarget);
        }
        if self.report_interval == 0 {
            return Err(ConfigError::InvalidReportInterval);
        }
        Ok(())
    }
}
