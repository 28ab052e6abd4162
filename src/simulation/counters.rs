//! Shared sample counters and the report-trigger protocol
//!
//! All mutation goes through one mutex so that a sample's two increments, the
//! termination check and the trigger decision form a single critical section.
//! The reporter sleeps on the paired condition variable. Interval triggers are
//! consumed one at a time while the run is going; once the target is reached
//! whatever is still pending becomes one final report.

use crate::util::concurrent_primitives::{lock, Padded};
use portable_atomic::{AtomicBool, AtomicU64, Ordering};
use std::fmt;
use std::sync::{Condvar, Mutex, PoisonError};

/// Point-in-time view of the two counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Estimate {
    pub total: u64,
    pub inside: u64,
}

impl Estimate {
    /// `4 * inside / total`, or 0.0 before any sample was counted.
    pub fn approximation(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.inside as f64 / self.total as f64 * 4.0
    }
}

impl fmt::Display for Estimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "The current approximation of pi is {:.6}.",
            self.approximation()
        )
    }
}

/// What happened to a sample handed to [`SampleCounters::record`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recorded {
    /// Counted; the run goes on.
    Counted,
    /// Counted, and it was the sample that reached the target.
    Final,
    /// The target had already been reached; the sample was dropped.
    Discarded,
}

/// What the reporter woke up to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wakeup {
    /// Trigger consumed; `estimate` was read under the lock.
    Report { estimate: Estimate, is_final: bool },
    /// Nothing left to report.
    Finished,
}

#[derive(Debug, Default)]
struct CounterState {
    total: u64,
    inside: u64,
    done: bool,
    aborted: bool,
    // number of report triggers issued so far
    triggers: u64,
}

/// Process-wide counters shared by every worker and the reporter.
#[derive(Debug)]
pub struct SampleCounters {
    state: Mutex<CounterState>,
    trigger: Condvar,
    // lock-free mirror of `state.done` for the workers' loop check
    done: AtomicBool,
    target: u64,
    interval: u64,
}

impl SampleCounters {
    pub fn new(target: u64, interval: u64) -> Self {
        SampleCounters {
            state: Mutex::new(CounterState::default()),
            trigger: Condvar::new(),
            done: AtomicBool::new(false),
            target,
            interval,
        }
    }

    pub fn target(&self) -> u64 {
        self.target
    }

    /// Cheap check for the worker loop. `record` re-checks under the lock.
    pub fn is_done(&self) -> bool {
        self.done.load(Ordering::Acquire)
    }

    /// Count one sample.
    pub fn record(&self, inside: bool) -> Recorded {
        let mut state = lock(&self.state);
        if state.done {
            return Recorded::Discarded;
        }

        state.total += 1;
        if inside {
            state.inside += 1;
        }

        if state.total == self.target {
            state.done = true;
            state.triggers += 1;
            self.done.store(true, Ordering::Release);
            self.trigger.notify_all();
            Recorded::Final
        } else if state.total % self.interval == 0 {
            state.triggers += 1;
            self.trigger.notify_all();
            Recorded::Counted
        } else {
            Recorded::Counted
        }
    }

    /// Stop the run without reaching the target. Workers stop counting and the
    /// reporter returns `Finished` on its next wake.
    pub fn abort(&self) {
        let mut state = lock(&self.state);
        state.done = true;
        state.aborted = true;
        self.done.store(true, Ordering::Release);
        self.trigger.notify_all();
    }

    /// Block until a trigger beyond the first `consumed` ones exists, then
    /// snapshot the counters.
    ///
    /// Before the target is reached triggers are consumed one per call. Once
    /// `done` is set every pending trigger collapses into a single final
    /// report, so a reporter that fell behind emits the final value once.
    ///
    /// The lock is released while sleeping and the predicate re-checked on
    /// every wake, so spurious wakeups and triggers fired before the reporter
    /// started waiting are both handled.
    pub fn wait_for_trigger(&self, consumed: &mut u64) -> Wakeup {
        let state = self
            .trigger
            .wait_while(lock(&self.state), |s| {
                s.triggers <= *consumed && !s.done && !s.aborted
            })
            .unwrap_or_else(PoisonError::into_inner);

        if state.aborted || state.triggers <= *consumed {
            return Wakeup::Finished;
        }

        let estimate = Estimate {
            total: state.total,
            inside: state.inside,
        };
        if state.done {
            *consumed = state.triggers;
            Wakeup::Report {
                estimate,
                is_final: true,
            }
        } else {
            *consumed += 1;
            Wakeup::Report {
                estimate,
                is_final: false,
            }
        }
    }

    /// Consistent snapshot of both counters.
    pub fn snapshot(&self) -> Estimate {
        let state = lock(&self.state);
        Estimate {
            total: state.total,
            inside: state.inside,
        }
    }
}

/// Per-worker count of samples contributed, one cache line per worker.
#[derive(Debug)]
pub struct WorkerTallies {
    slots: Vec<Padded<AtomicU64>>,
}

impl WorkerTallies {
    pub fn new(workers: usize) -> Self {
        WorkerTallies {
            slots: (0..workers).map(|_| Padded::new(AtomicU64::new(0))).collect(),
        }
    }

    /// Only worker `tid` writes its slot.
    pub fn bump(&self, tid: usize) {
        self.slots[tid].fetch_add(1, Ordering::Relaxed);
    }

    pub fn get(&self, tid: usize) -> u64 {
        self.slots[tid].load(Ordering::Relaxed)
    }

    pub fn values(&self) -> Vec<u64> {
        self.slots.iter().map(|s| s.load(Ordering::Relaxed)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_approximation_and_line() {
        let estimate = Estimate { total: 4, inside: 3 };
        assert_eq!(estimate.approximation(), 3.0);
        assert_eq!(
            estimate.to_string(),
            "The current approximation of pi is 3.000000."
        );
        assert_eq!(Estimate::default().approximation(), 0.0);
    }

    #[test]
    fn test_record_counts_inside_and_total() {
        let counters = SampleCounters::new(10, 100);
        assert_eq!(counters.record(true), Recorded::Counted);
        assert_eq!(counters.record(false), Recorded::Counted);
        assert_eq!(counters.record(true), Recorded::Counted);
        assert_eq!(counters.snapshot(), Estimate { total: 3, inside: 2 });
        assert!(!counters.is_done());
    }

    #[test]
    fn test_target_sets_done_once_and_discards_after() {
        let counters = SampleCounters::new(3, 100);
        counters.record(true);
        counters.record(true);
        assert_eq!(counters.record(false), Recorded::Final);
        assert!(counters.is_done());
        assert_eq!(counters.record(true), Recorded::Discarded);
        assert_eq!(counters.record(false), Recorded::Discarded);
        assert_eq!(counters.snapshot(), Estimate { total: 3, inside: 2 });
    }

    #[test]
    fn test_interval_triggers_are_consumed_in_order() {
        let counters = SampleCounters::new(25, 10);
        for _ in 0..20 {
            counters.record(true);
        }

        // 10 and 20 are pending while the run is still going
        let mut consumed = 0;
        for _ in 0..2 {
            match counters.wait_for_trigger(&mut consumed) {
                Wakeup::Report { is_final, .. } => assert!(!is_final),
                Wakeup::Finished => panic!("trigger {consumed} missing"),
            }
        }
        assert_eq!(consumed, 2);

        for _ in 0..5 {
            counters.record(true);
        }
        assert_eq!(
            counters.wait_for_trigger(&mut consumed),
            Wakeup::Report {
                estimate: Estimate { total: 25, inside: 25 },
                is_final: true,
            }
        );
        assert_eq!(counters.wait_for_trigger(&mut consumed), Wakeup::Finished);
    }

    #[test]
    fn test_pending_triggers_collapse_after_done() {
        let counters = SampleCounters::new(55, 10);
        for _ in 0..55 {
            counters.record(true);
        }

        // five interval triggers plus the terminal one, all unread
        let mut consumed = 0;
        assert_eq!(
            counters.wait_for_trigger(&mut consumed),
            Wakeup::Report {
                estimate: Estimate { total: 55, inside: 55 },
                is_final: true,
            }
        );
        assert_eq!(consumed, 6);
        assert_eq!(counters.wait_for_trigger(&mut consumed), Wakeup::Finished);
    }

    #[test]
    fn test_aligned_target_triggers_once() {
        let counters = SampleCounters::new(20, 10);
        let mut consumed = 0;
        for _ in 0..10 {
            counters.record(false);
        }
        assert!(matches!(
            counters.wait_for_trigger(&mut consumed),
            Wakeup::Report { is_final: false, .. }
        ));
        for _ in 0..10 {
            counters.record(false);
        }
        assert!(matches!(
            counters.wait_for_trigger(&mut consumed),
            Wakeup::Report { is_final: true, .. }
        ));
        assert_eq!(consumed, 2);
        assert_eq!(counters.wait_for_trigger(&mut consumed), Wakeup::Finished);
    }

    #[test]
    fn test_target_below_interval_still_triggers() {
        let counters = SampleCounters::new(5, 1_000_000);
        for _ in 0..5 {
            counters.record(true);
        }
        assert!(matches!(
            counters.wait_for_trigger(&mut 0),
            Wakeup::Report { is_final: true, .. }
        ));
    }

    #[test]
    fn test_abort_wakes_waiting_reporter() {
        let counters = Arc::new(SampleCounters::new(1_000, 10));
        let waiter = {
            let counters = Arc::clone(&counters);
            thread::spawn(move || counters.wait_for_trigger(&mut 0))
        };
        counters.abort();
        assert_eq!(waiter.join().unwrap(), Wakeup::Finished);
        assert_eq!(counters.record(true), Recorded::Discarded);
    }

    #[test]
    fn test_concurrent_record_hits_target_exactly() {
        let target = 50_000;
        let counters = Arc::new(SampleCounters::new(target, 1_000));
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let counters = Arc::clone(&counters);
                thread::spawn(move || {
                    let mut finals = 0;
                    loop {
                        match counters.record(i % 2 == 0) {
                            Recorded::Counted => {}
                            Recorded::Final => finals += 1,
                            Recorded::Discarded => break,
                        }
                    }
                    finals
                })
            })
            .collect();

        let mut last = Estimate::default();
        while !counters.is_done() {
            let now = counters.snapshot();
            assert!(now.inside <= now.total);
            assert!(now.total >= last.total && now.inside >= last.inside);
            last = now;
        }

        let finals: u32 = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(finals, 1);
        assert_eq!(counters.snapshot().total, target);
    }

    #[test]
    fn test_tallies_are_per_worker() {
        let tallies = WorkerTallies::new(3);
        tallies.bump(0);
        tallies.bump(2);
        tallies.bump(2);
        assert_eq!(tallies.get(1), 0);
        assert_eq!(tallies.values(), vec![1, 0, 2]);
    }
}
