//! Error types for monte-pi
//!
//! Configuration problems are caught before any thread starts, launch
//! problems while threads are being created or joined, and report problems
//! when the reporter cannot write an approximation.

use std::io;
use thiserror::Error;

/// Top-level error returned by a simulation run
#[derive(Error, Debug)]
pub enum SimError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Thread creation / join errors
    #[error("Launch error: {0}")]
    Launch(#[from] LaunchError),

    /// Output errors raised by the reporter
    #[error("Report error: {0}")]
    Report(#[from] ReportError),
}

/// Configuration and CLI errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Worker count outside 1..=max
    #[error("Invalid worker count {count}: must be between 1 and {max}")]
    InvalidWorkerCount { count: usize, max: usize },

    /// Zero samples requested
    #[error("Invalid sample target: must be a positive integer")]
    InvalidTarget,

    /// Zero report interval
    #[error("Invalid report interval: must be a positive integer")]
    InvalidReportInterval,
}

/// Errors raised while starting or joining the simulation threads
#[derive(Error, Debug)]
pub enum LaunchError {
    /// The OS refused to create a thread
    #[error("Error creating thread {task}: {source}")]
    Spawn {
        task: String,
        #[source]
        source: io::Error,
    },

    /// A thread panicked before finishing
    #[error("Thread {task} panicked")]
    Panicked { task: String },
}

/// Errors raised while emitting an approximation
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("failed to emit approximation: {0}")]
    Io(#[from] io::Error),
}

/// Result type alias for SimError
pub type Result<T> = std::result::Result<T, SimError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_worker_count_message() {
        let err = ConfigError::InvalidWorkerCount { count: 1001, max: 1000 };
        assert_eq!(
            err.to_string(),
            "Invalid worker count 1001: must be between 1 and 1000"
        );
    }

    #[test]
    fn test_error_conversion() {
        let sim_err: SimError = ConfigError::InvalidTarget.into();
        assert!(matches!(sim_err, SimError::Config(ConfigError::InvalidTarget)));

        let io_err = io::Error::new(io::ErrorKind::BrokenPipe, "closed");
        let sim_err: SimError = ReportError::from(io_err).into();
        assert!(matches!(sim_err, SimError::Report(_)));
    }

    #[test]
    fn test_spawn_error_names_task() {
        let err = LaunchError::Spawn {
            task: "worker-7".into(),
            source: io::Error::new(io::ErrorKind::WouldBlock, "no threads left"),
        };
        assert!(err.to_string().contains("worker-7"));
    }
}
