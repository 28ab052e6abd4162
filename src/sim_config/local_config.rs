/// What one worker thread knows about itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalSimConfig {
    pub tid: usize, // worker index, 0..workers
    pub seed: u64,  // seed for this worker's own generator
}

impl LocalSimConfig {
    pub fn new(tid: usize, seed: u64) -> Self {
        LocalSimConfig { tid, seed }
    }

    /// Thread name used when spawning this worker.
    pub fn thread_name(&self) -> String {
        format!("worker-{}", self.tid)
    }
}
