//! Sources of random coordinate pairs
//!
//! `ThreadSampler` gives each worker its own generator (no contention).
//! `SharedSampler` hands every worker a handle to one generator behind a
//! mutex, which serializes the workers once per pair.

use crate::sim_config::global_config::{GlobalSimConfig, SamplerMode};
use crate::sim_config::local_config::LocalSimConfig;
use crate::util::concurrent_primitives::lock;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::{Arc, Mutex};

/// Yields independent coordinate pairs, each uniform over [0, 1).
pub trait RandomSampler: Send {
    fn next_pair(&mut self) -> (f64, f64);
}

impl<S: RandomSampler + ?Sized> RandomSampler for Box<S> {
    fn next_pair(&mut self) -> (f64, f64) {
        (**self).next_pair()
    }
}

/// Generator owned by a single worker.
#[derive(Debug)]
pub struct ThreadSampler {
    rng: StdRng,
}

impl ThreadSampler {
    pub fn new(seed: u64) -> Self {
        ThreadSampler {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl RandomSampler for ThreadSampler {
    fn next_pair(&mut self) -> (f64, f64) {
        (self.rng.random(), self.rng.random())
    }
}

/// Handle to a generator shared by all workers.
#[derive(Debug, Clone)]
pub struct SharedSampler {
    rng: Arc<Mutex<StdRng>>,
}

impl SharedSampler {
    pub fn new(seed: u64) -> Self {
        SharedSampler {
            rng: Arc::new(Mutex::new(StdRng::seed_from_u64(seed))),
        }
    }
}

impl RandomSampler for SharedSampler {
    fn next_pair(&mut self) -> (f64, f64) {
        // both coordinates under one acquisition
        let mut rng = lock(&self.rng);
        (rng.random(), rng.random())
    }
}

/// Builds the sampler for each worker according to the configured mode.
#[derive(Debug)]
pub enum SamplerFactory {
    PerWorker,
    Shared(SharedSampler),
}

impl SamplerFactory {
    pub fn new(config: &GlobalSimConfig) -> Self {
        match config.sampler {
            SamplerMode::PerWorker => SamplerFactory::PerWorker,
            SamplerMode::Shared => SamplerFactory::Shared(SharedSampler::new(config.seed)),
        }
    }

    pub fn for_worker(&self, local: &LocalSimConfig) -> Box<dyn RandomSampler> {
        match self {
            SamplerFactory::PerWorker => Box::new(ThreadSampler::new(local.seed)),
            SamplerFactory::Shared(shared) => Box::new(shared.clone()),
        }
    }
}
