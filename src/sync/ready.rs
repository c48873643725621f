//! Drained-channel notification for the assembler.

use parking_lot::{Condvar, MutexGuard};
use std::sync::atomic::{AtomicU64, Ordering};

/// Signal raised by the producer whose delivery drains a channel.
///
/// The assembler is the only thread that ever waits here. It waits with the
/// mutex of whichever channel it is gathering, one channel at a time, which
/// is the single-waiter usage `parking_lot::Condvar` permits across mutexes.
#[derive(Debug, Default)]
pub struct ReadySignal {
    cond: Condvar,
    notifications: AtomicU64,
}

impl ReadySignal {
    /// Creates a ready signal nobody is waiting on.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wakes the assembler if it is waiting.
    ///
    /// Called with the drained channel's guard held, so a gather that checked
    /// the predicate under the same guard cannot miss it.
    pub(crate) fn notify(&self) {
        self.notifications.fetch_add(1, Ordering::Relaxed);
        self.cond.notify_one();
    }

    /// Blocks on the signal, releasing `guard` while asleep.
    ///
    /// Callers re-check their predicate after every return.
    pub(crate) fn wait<T>(&self, guard: &mut MutexGuard<'_, T>) {
        self.cond.wait(guard);
    }

    /// Total number of times a producer raised the signal.
    #[must_use]
    pub fn notifications(&self) -> u64 {
        self.notifications.load(Ordering::Relaxed)
    }
}
