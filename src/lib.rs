//! monte-pi: estimate pi by Monte-Carlo sampling on parallel threads
//!
//! Worker threads draw points in the unit square and count them into shared
//! counters; a reporter thread prints the running approximation every
//! `report_interval` samples and once more when the target is reached.

pub mod error;
pub mod sim_config;
pub mod simulation;
pub mod util;

pub use error::{ConfigError, LaunchError, ReportError, SimError};
pub use sim_config::global_config::{CliArgs, GlobalSimConfig, SamplerMode, MAX_WORKERS};
pub use simulation::counters::Estimate;
pub use simulation::{RunSummary, Simulation};
