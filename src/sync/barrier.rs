//! Completion barrier and cycle counter.
//!
//! The counter is only ever increased, by the assembler, while the barrier
//! lock is held. Producers read it lock-free when they take a ticket, which
//! keeps them from touching the barrier lock while they still hold a channel
//! guard.
//!
//! # Ticket ordering
//!
//! A producer takes its ticket while holding its channel guard, after finding
//! `remaining > 0`. The assembler wrote that `remaining` inside `demand`,
//! which it issued after finalizing the previous cycle, so the unlock/lock
//! hand-off on the channel mutex orders the previous increment before the
//! ticket read. The next increment cannot happen yet: it needs every channel
//! to drain, and this channel cannot drain until the producer releases its
//! guard. The ticket is therefore exactly the number of cycles completed
//! before the one being delivered into.

use crate::observability::RendezvousMetrics;
use crate::types::CycleTicket;
use parking_lot::{Condvar, Mutex};
use std::sync::atomic::{AtomicU64, Ordering};

/// Broadcast barrier releasing every producer of a finalized cycle.
#[derive(Debug, Default)]
pub struct CompletionBarrier {
    completed: AtomicU64,
    lock: Mutex<()>,
    finished: Condvar,
}

impl CompletionBarrier {
    /// Creates a barrier with no completed cycles.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cycles finalized so far.
    #[must_use]
    pub fn completed(&self) -> u64 {
        self.completed.load(Ordering::Acquire)
    }

    /// Captures the cycle a delivery is contributing to.
    ///
    /// Must be called while the delivering producer still holds its channel
    /// guard.
    #[must_use]
    pub(crate) fn ticket(&self) -> CycleTicket {
        CycleTicket::from_completed(self.completed())
    }

    /// Blocks until the cycle named by `ticket` has been finalized.
    ///
    /// Returns the counter value observed on release, which is always greater
    /// than the ticket's snapshot. A broadcast for an earlier cycle does not
    /// release the caller; a counter that has already moved past the ticket
    /// returns without waiting.
    pub fn await_completion(&self, ticket: CycleTicket) -> u64 {
        let mut guard = self.lock.lock();
        loop {
            let completed = self.completed();
            if ticket.is_released_by(completed) {
                return completed;
            }
            self.finished.wait(&mut guard);
        }
    }

    /// Advances the counter by one and releases every waiting producer.
    ///
    /// The cycle is counted in `metrics` before the broadcast. Returns the new
    /// number of completed cycles. Only the assembler calls this.
    pub fn finalize_cycle(&self, metrics: &RendezvousMetrics) -> u64 {
        let guard = self.lock.lock();
        let completed = self.completed.fetch_add(1, Ordering::AcqRel) + 1;
        metrics.record_cycle();
        self.finished.notify_all();
        drop(guard);
        completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::mpsc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn finalize_advances_by_one() {
        let barrier = CompletionBarrier::new();
        let metrics = RendezvousMetrics::new();
        assert_eq!(barrier.completed(), 0);
        assert_eq!(barrier.finalize_cycle(&metrics), 1);
        assert_eq!(barrier.finalize_cycle(&metrics), 2);
        assert_eq!(barrier.completed(), 2);
        assert_eq!(metrics.cycles_completed(), 2);
    }

    #[test]
    fn already_advanced_ticket_returns_immediately() {
        let barrier = CompletionBarrier::new();
        let metrics = RendezvousMetrics::new();
        let ticket = barrier.ticket();
        barrier.finalize_cycle(&metrics);
        barrier.finalize_cycle(&metrics);
        assert_eq!(barrier.await_completion(ticket), 2);
    }

    #[test]
    fn waiter_released_only_after_its_cycle() {
        let barrier = Arc::new(CompletionBarrier::new());
        let metrics = RendezvousMetrics::new();
        barrier.finalize_cycle(&metrics);

        // Ticket for cycle 2: one cycle already completed.
        let ticket = barrier.ticket();
        assert_eq!(ticket.cycle(), 2);

        let (tx, rx) = mpsc::channel();
        let waiter = {
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                let observed = barrier.await_completion(ticket);
                tx.send(observed).expect("send observed");
            })
        };

        assert!(
            rx.recv_timeout(Duration::from_millis(50)).is_err(),
            "waiter must not leave before its cycle is finalized"
        );

        assert_eq!(barrier.finalize_cycle(&metrics), 2);
        let observed = rx.recv_timeout(Duration::from_secs(5)).expect("released");
        assert!(ticket.is_released_by(observed));
        waiter.join().expect("waiter thread");
    }

    #[test]
    fn broadcast_releases_every_waiter() {
        let barrier = Arc::new(CompletionBarrier::new());
        let metrics = RendezvousMetrics::new();
        let ticket = barrier.ticket();
        let (tx, rx) = mpsc::channel();

        let waiters: Vec<_> = (0..4)
            .map(|_| {
                let barrier = Arc::clone(&barrier);
                let tx = tx.clone();
                thread::spawn(move || tx.send(barrier.await_completion(ticket)))
            })
            .collect();
        drop(tx);

        barrier.finalize_cycle(&metrics);
        let released: Vec<u64> = rx.iter().collect();
        assert_eq!(released, vec![1; 4]);
        for waiter in waiters {
            waiter.join().expect("waiter thread").expect("send");
        }
    }

    #[test]
    fn released_waiter_sees_cycle_counted() {
        let barrier = Arc::new(CompletionBarrier::new());
        let metrics = Arc::new(RendezvousMetrics::new());
        let ticket = barrier.ticket();

        let waiters: Vec<_> = (0..3)
            .map(|_| {
                let barrier = Arc::clone(&barrier);
                let metrics = Arc::clone(&metrics);
                thread::spawn(move || {
                    let observed = barrier.await_completion(ticket);
                    (observed, metrics.cycles_completed())
                })
            })
            .collect();

        barrier.finalize_cycle(&metrics);
        for waiter in waiters {
            let (observed, counted) = waiter.join().expect("waiter thread");
            assert_eq!(observed, 1);
            assert!(counted >= observed, "released before the cycle was counted");
        }
    }
}
