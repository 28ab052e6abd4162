use std::ops::Deref;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

// Matches the destructive interference size on current x86_64 / aarch64 parts.
pub const CACHE_LINE_SIZE: usize = 128;

/// Aligns `T` to its own cache line so per-thread slots stored next to each
/// other in a `Vec` never share a line.
#[repr(C, align(128))]
#[derive(Debug, Default)]
pub struct Padded<T> {
    data: T,
}

impl<T> Padded<T> {
    pub fn new(value: T) -> Self {
        Self { data: value }
    }
}

impl<T> Deref for Padded<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.data
    }
}

/// Lock a mutex, taking the guard back from a poisoned lock.
///
/// Every critical section in this crate leaves its data consistent before it
/// can panic, so a poisoned lock still guards valid state.
pub fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GateState {
    Closed,
    Open,
    Cancelled,
}

/// One-shot start gate for a group of threads.
///
/// Plays the role of a start barrier, but the releasing side does not need to
/// know how many threads were actually created, so a partially failed launch
/// can still release (cancel) the ones that did start.
#[derive(Debug)]
pub struct StartGate {
    state: Mutex<GateState>,
    released: Condvar,
}

impl StartGate {
    pub fn new() -> Self {
        StartGate {
            state: Mutex::new(GateState::Closed),
            released: Condvar::new(),
        }
    }

    /// Let every waiting thread through.
    pub fn open(&self) {
        self.release(GateState::Open);
    }

    /// Release every waiting thread with a "do not start" answer.
    pub fn cancel(&self) {
        self.release(GateState::Cancelled);
    }

    fn release(&self, to: GateState) {
        let mut state = lock(&self.state);
        // first release wins
        if *state == GateState::Closed {
            *state = to;
        }
        self.released.notify_all();
    }

    /// Block until the gate is released. Returns `true` if it was opened,
    /// `false` if it was cancelled.
    pub fn wait(&self) -> bool {
        let state = self
            .released
            .wait_while(lock(&self.state), |s| *s == GateState::Closed)
            .unwrap_or_else(PoisonError::into_inner);
        *state == GateState::Open
    }
}

impl Default for StartGate {
    fn default() -> Self {
        Self::new()
    }
}
