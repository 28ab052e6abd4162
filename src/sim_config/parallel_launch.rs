//! Thread launch and join for one simulation run
//!
//! The reporter is spawned first so it is already parked on the counters'
//! condition variable when the workers begin. Workers wait on a start gate
//! until every thread exists; a spawn failure cancels the gate and aborts the
//! counters, so the threads already started leave without sampling.

use crate::error::{LaunchError, SimError};
use crate::sim_config::global_config::GlobalSimConfig;
use crate::simulation::counters::{SampleCounters, WorkerTallies};
use crate::simulation::reporter::Reporter;
use crate::simulation::sampler::SamplerFactory;
use crate::simulation::worker::Worker;
use crate::simulation::RunSummary;
use crate::util::concurrent_primitives::StartGate;
use std::io::{self, Write};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;
use tracing::{debug, error};

const REPORTER_NAME: &str = "reporter";

/// Creates the OS threads of a run.
pub trait Spawner {
    fn spawn<F, T>(&mut self, name: String, body: F) -> io::Result<JoinHandle<T>>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static;
}

/// Named threads from `std::thread::Builder`.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsThreads;

impl Spawner for OsThreads {
    fn spawn<F, T>(&mut self, name: String, body: F) -> io::Result<JoinHandle<T>>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        thread::Builder::new().name(name).spawn(body)
    }
}

/// Run one simulation to completion: one reporter plus `config.workers`
/// workers, all joined before returning.
pub fn parallel_work<W, P>(
    config: &GlobalSimConfig,
    out: W,
    spawner: &mut P,
) -> Result<RunSummary, SimError>
where
    W: Write + Send + 'static,
    P: Spawner,
{
    let counters = Arc::new(SampleCounters::new(config.target, config.report_interval));
    let tallies = Arc::new(WorkerTallies::new(config.workers));
    let gate = Arc::new(StartGate::new());
    let samplers = SamplerFactory::new(config);

    let reporter = Reporter::new(Arc::clone(&counters), Arc::clone(&tallies), out);
    let reporter_handle = spawner
        .spawn(REPORTER_NAME.to_string(), move || reporter.run())
        .map_err(|source| {
            error!(task = REPORTER_NAME, error = %source, "Error creating thread");
            LaunchError::Spawn {
                task: REPORTER_NAME.to_string(),
                source,
            }
        })?;

    // one handle per worker, plus the reporter's above
    let mut handles = Vec::with_capacity(config.workers);
    for tid in 0..config.workers {
        let local = config.local(tid);
        let worker = Worker::new(
            local,
            samplers.for_worker(&local),
            Arc::clone(&counters),
            Arc::clone(&tallies),
            Arc::clone(&gate),
        );

        match spawner.spawn(local.thread_name(), move || worker.run()) {
            Ok(handle) => handles.push(handle),
            Err(source) => {
                error!(tid, started = handles.len(), error = %source, "Error creating thread, aborting run");
                gate.cancel();
                counters.abort();
                // the started threads exit on their own now
                for (started, handle) in handles.into_iter().enumerate() {
                    if handle.join().is_err() {
                        debug!(tid = started, "Worker panicked during aborted launch");
                    }
                }
                match reporter_handle.join() {
                    Ok(Ok(emitted)) => {
                        debug!(emitted = emitted.len(), "Reporter stopped after aborted launch")
                    }
                    Ok(Err(e)) => debug!(error = %e, "Reporter failed during aborted launch"),
                    Err(_) => debug!("Reporter panicked during aborted launch"),
                }
                return Err(LaunchError::Spawn {
                    task: local.thread_name(),
                    source,
                }
                .into());
            }
        }
    }

    let start = Instant::now();
    gate.open();
    debug!(workers = handles.len(), "Workers released");

    let mut panicked = None;
    for (tid, handle) in handles.into_iter().enumerate() {
        if handle.join().is_err() {
            error!(tid, "Worker panicked");
            panicked.get_or_insert_with(|| format!("worker-{tid}"));
        }
    }
    if panicked.is_some() {
        // the target may now be unreachable, release the reporter
        counters.abort();
    }

    let estimates = match reporter_handle.join() {
        Ok(result) => result?,
        Err(_) => {
            return Err(LaunchError::Panicked {
                task: REPORTER_NAME.to_string(),
            }
            .into())
        }
    };
    if let Some(task) = panicked {
        return Err(LaunchError::Panicked { task }.into());
    }

    let totals = counters.snapshot();
    Ok(RunSummary {
        total: totals.total,
        inside: totals.inside,
        estimates,
        per_worker: tallies.values(),
        elapsed: start.elapsed(),
    })
}
