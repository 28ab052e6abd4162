use crate::error::ReportError;
use crate::simulation::counters::{Estimate, SampleCounters, Wakeup, WorkerTallies};
use std::io::Write;
use std::sync::Arc;
use tracing::debug;

/// The thread that turns report triggers into output lines.
pub struct Reporter<W> {
    counters: Arc<SampleCounters>,
    tallies: Arc<WorkerTallies>,
    out: W,
}

impl<W: Write> Reporter<W> {
    pub fn new(counters: Arc<SampleCounters>, tallies: Arc<WorkerTallies>, out: W) -> Self {
        Reporter {
            counters,
            tallies,
            out,
        }
    }

    /// Thread body. Returns every estimate written, in output order.
    ///
    /// One line per interval trigger while the run is going, then exactly
    /// one final line. Each line shows the counters as read on wake, which
    /// may already be past the value that fired it.
    pub fn run(mut self) -> Result<Vec<Estimate>, ReportError> {
        let mut emitted = Vec::new();
        let mut consumed = 0;
        loop {
            match self.counters.wait_for_trigger(&mut consumed) {
                Wakeup::Report { estimate, is_final } => {
                    // the counters' lock is already released here
                    writeln!(self.out, "{estimate}")?;
                    self.out.flush()?;
                    self.log_spread(&estimate);
                    emitted.push(estimate);
                    if is_final {
                        break;
                    }
                }
                Wakeup::Finished => break,
            }
        }
        Ok(emitted)
    }

    fn log_spread(&self, estimate: &Estimate) {
        let per_worker = self.tallies.values();
        let min = per_worker.iter().copied().min().unwrap_or(0);
        let max = per_worker.iter().copied().max().unwrap_or(0);
        debug!(
            total = estimate.total,
            inside = estimate.inside,
            min_per_worker = min,
            max_per_worker = max,
            "Reported"
        );
    }
}
