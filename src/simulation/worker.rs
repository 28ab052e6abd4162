use crate::sim_config::local_config::LocalSimConfig;
use crate::simulation::counters::{Recorded, SampleCounters, WorkerTallies};
use crate::simulation::sampler::RandomSampler;
use crate::util::concurrent_primitives::StartGate;
use std::sync::Arc;
use tracing::{debug, trace};

const CENTER: f64 = 0.5;
const RADIUS_SQUARED: f64 = 0.25;

/// Whether `(x, y)` lies in the circle of radius 0.5 around (0.5, 0.5).
/// Points on the boundary count as inside.
pub fn is_inside(x: f64, y: f64) -> bool {
    let dx = x - CENTER;
    let dy = y - CENTER;
    dx * dx + dy * dy <= RADIUS_SQUARED
}

/// A sampling thread's state.
pub struct Worker<S> {
    local: LocalSimConfig,
    sampler: S,
    counters: Arc<SampleCounters>,
    tallies: Arc<WorkerTallies>,
    gate: Arc<StartGate>,
}

impl<S: RandomSampler> Worker<S> {
    pub fn new(
        local: LocalSimConfig,
        sampler: S,
        counters: Arc<SampleCounters>,
        tallies: Arc<WorkerTallies>,
        gate: Arc<StartGate>,
    ) -> Self {
        Worker {
            local,
            sampler,
            counters,
            tallies,
            gate,
        }
    }

    /// Thread body: sample until the target is reached.
    pub fn run(mut self) {
        let tid = self.local.tid;
        if !self.gate.wait() {
            debug!(tid, "Start cancelled");
            return;
        }

        while !self.counters.is_done() {
            let (x, y) = self.sampler.next_pair();
            match self.counters.record(is_inside(x, y)) {
                Recorded::Counted => self.tallies.bump(tid),
                Recorded::Final => {
                    self.tallies.bump(tid);
                    debug!(tid, target = self.counters.target(), "Reached sample target");
                    break;
                }
                // someone else reached the target first
                Recorded::Discarded => break,
            }
        }

        trace!(tid, samples = self.tallies.get(tid), "Worker finished");
    }
}
