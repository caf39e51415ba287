//! Completion barrier: counts outstanding workers and blocks the runner until
//! the count reaches zero.

use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
struct Counts {
    outstanding: usize,
    /// Total `done` calls that matched an outstanding worker.
    signals: usize,
}

/// Counter of outstanding workers. Safe to share across threads behind an `Arc`.
#[derive(Debug, Default)]
pub struct CompletionBarrier {
    counts: Mutex<Counts>,
    zero: Condvar,
}

impl CompletionBarrier {
    pub fn new() -> Self {
        Self::default()
    }

    // A worker panicking never holds this lock, but don't let poisoning
    // wedge the runner either.
    fn lock(&self) -> MutexGuard<'_, Counts> {
        self.counts.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register one worker. Call before the worker starts.
    pub fn add(&self) {
        self.lock().outstanding += 1;
    }

    /// Mark one worker finished. Extra calls past zero are ignored and logged.
    pub fn done(&self) {
        let mut counts = self.lock();
        if counts.outstanding == 0 {
            tracing::error!("completion barrier signalled with nothing outstanding");
            return;
        }
        counts.outstanding -= 1;
        counts.signals += 1;
        if counts.outstanding == 0 {
            self.zero.notify_all();
        }
    }

    /// Register one worker and return a guard that signals completion when dropped.
    pub fn enter(self: &Arc<Self>) -> CompletionGuard {
        self.add();
        CompletionGuard {
            barrier: Arc::clone(self),
        }
    }

    pub fn outstanding(&self) -> usize {
        self.lock().outstanding
    }

    /// Number of completion signals recorded so far.
    pub fn signals(&self) -> usize {
        self.lock().signals
    }

    /// Block until no workers are outstanding. Returns immediately if none were added.
    pub fn wait(&self) {
        let mut counts = self.lock();
        while counts.outstanding > 0 {
            counts = self
                .zero
                .wait(counts)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }
}

/// Signals the barrier exactly once when dropped, including during unwinding.
#[must_use = "dropping the guard immediately signals completion"]
pub struct CompletionGuard {
    barrier: Arc<CompletionBarrier>,
}

impl Drop for CompletionGuard {
    fn drop(&mut self) {
        self.barrier.done();
    }
}
