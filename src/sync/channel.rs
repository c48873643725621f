//! Per-kind atom channel.

use super::{CompletionBarrier, ReadySignal};
use crate::observability::RendezvousMetrics;
use crate::tracing_compat::trace;
use crate::types::{CycleTicket, ResourceKind};
use parking_lot::{Condvar, Mutex};

/// Outcome of one successful delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delivery {
    /// Value of the required count just before this delivery decremented it.
    ///
    /// For a demand of `n` the deliveries fill slots `n, n-1, ..., 1`.
    pub slot: usize,
    /// Cycle the delivery contributed to.
    pub ticket: CycleTicket,
}

impl Delivery {
    /// Returns true if this delivery drained the channel.
    #[must_use]
    pub const fn drained(&self) -> bool {
        self.slot == 1
    }
}

#[derive(Debug, Default)]
struct ChannelState {
    /// Units still wanted for the current cycle.
    remaining: usize,
    /// Number of `demand` calls so far.
    demands: u64,
}

/// Required-unit count for one resource kind, plus the condition producers of
/// that kind wait on.
///
/// `remaining` is only touched with the channel mutex held. It is set by
/// [`demand`](Self::demand) and decremented once per [`deliver`](Self::deliver);
/// a producer only decrements after observing it non-zero, so it never
/// underflows.
#[derive(Debug)]
pub struct AtomChannel {
    kind: ResourceKind,
    state: Mutex<ChannelState>,
    demand: Condvar,
}

impl AtomChannel {
    /// Creates a channel with nothing demanded.
    #[must_use]
    pub fn new(kind: ResourceKind) -> Self {
        Self {
            kind,
            state: Mutex::new(ChannelState::default()),
            demand: Condvar::new(),
        }
    }

    /// Kind of unit this channel carries.
    #[must_use]
    pub const fn kind(&self) -> ResourceKind {
        self.kind
    }

    /// Units still wanted for the current cycle.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.state.lock().remaining
    }

    /// Number of demands issued on this channel.
    #[must_use]
    pub fn demands_issued(&self) -> u64 {
        self.state.lock().demands
    }

    /// Announces that `amount` units are wanted and wakes up to `amount`
    /// waiting producers.
    ///
    /// Producers that are still busy producing will find the demand when
    /// they next check the channel, so waking fewer than `amount` is not a
    /// lost demand. Returns how many sleeping producers were actually woken.
    ///
    /// `amount` must not exceed the number of producers of this kind; that is
    /// checked when the configuration is validated.
    pub fn demand(&self, amount: usize) -> usize {
        let mut state = self.state.lock();
        debug_assert_eq!(
            state.remaining, 0,
            "{} demand issued before the previous demand drained",
            self.kind
        );
        state.remaining = amount;
        state.demands += 1;
        let woken = (0..amount).filter(|_| self.demand.notify_one()).count();
        drop(state);
        trace!(kind = %self.kind, amount, woken, "demand issued");
        woken
    }

    /// Waits until a unit is wanted, then delivers one.
    ///
    /// Blocks on the channel's demand condition while nothing is required,
    /// re-checking after each wake. The delivery that brings the count to zero
    /// raises `ready` exactly once. The cycle ticket is taken from `barrier`
    /// and the delivery is counted in `metrics` before the guard is released,
    /// so a gather that sees the channel drained also sees every count.
    pub fn deliver(
        &self,
        ready: &ReadySignal,
        barrier: &CompletionBarrier,
        metrics: &RendezvousMetrics,
    ) -> Delivery {
        let mut state = self.state.lock();
        while state.remaining == 0 {
            self.demand.wait(&mut state);
        }
        let slot = state.remaining;
        state.remaining -= 1;
        let ticket = barrier.ticket();
        metrics.record_delivery(self.kind);
        if state.remaining == 0 {
            ready.notify();
        }
        drop(state);
        Delivery { slot, ticket }
    }

    /// Blocks until every demanded unit of this kind has been delivered.
    ///
    /// Returns at once if nothing is outstanding, including after a demand of
    /// zero. Only the assembler calls this.
    pub fn await_drained(&self, ready: &ReadySignal) {
        let mut state = self.state.lock();
        while state.remaining != 0 {
            ready.wait(&mut state);
        }
    }
}
