//! The producer loop.
//!
//! ```text
//! Producing ──► AwaitingDemand ──► Delivering ──► AwaitingCompletion ──┐
//!     ▲                                                                │
//!     └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A producer has no terminal state: [`Producer::run`] never returns.

use crate::coordinator::Rendezvous;
use crate::latency::LatencySource;
use crate::narration::{NarrationEvent, NarrationSink};
use crate::sync::Delivery;
use crate::types::{ProducerId, ResourceKind};
use std::convert::Infallible;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Where a producer is in its cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProducerState {
    /// Simulating production; touches no shared state.
    Producing,
    /// Holding a unit, waiting for the channel to demand one.
    AwaitingDemand,
    /// Unit accepted; reporting the delivery.
    Delivering,
    /// Waiting for the cycle it delivered into to be finalized.
    AwaitingCompletion,
}

/// What one pass through the producer loop did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProducerPass {
    /// Time spent producing.
    pub latency: Duration,
    /// The delivery made.
    pub delivery: Delivery,
    /// Completed-cycle count observed when leaving the barrier.
    pub released_at: u64,
}

/// One producer thread's loop.
pub struct Producer {
    id: ProducerId,
    state: ProducerState,
    rendezvous: Arc<Rendezvous>,
    latency: Arc<dyn LatencySource>,
    narration: Arc<dyn NarrationSink>,
}

impl std::fmt::Debug for Producer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Producer")
            .field("id", &self.id)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl Producer {
    /// Creates a producer; nothing runs until [`run`](Self::run) or
    /// [`run_once`](Self::run_once).
    #[must_use]
    pub fn new(
        id: ProducerId,
        rendezvous: Arc<Rendezvous>,
        latency: Arc<dyn LatencySource>,
        narration: Arc<dyn NarrationSink>,
    ) -> Self {
        Self {
            id,
            state: ProducerState::Producing,
            rendezvous,
            latency,
            narration,
        }
    }

    /// This producer's identity.
    #[must_use]
    pub const fn id(&self) -> ProducerId {
        self.id
    }

    /// Kind of unit this producer generates.
    #[must_use]
    pub const fn kind(&self) -> ResourceKind {
        self.id.kind()
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> ProducerState {
        self.state
    }

    /// Produces one unit, delivers it, and waits for its cycle to finish.
    pub fn run_once(&mut self) -> ProducerPass {
        let producer = self.id;

        self.state = ProducerState::Producing;
        self.narration
            .record(&NarrationEvent::ProductionStarted { producer });
        let latency = self.latency.next_delay(producer);
        if !latency.is_zero() {
            thread::sleep(latency);
        }
        self.narration
            .record(&NarrationEvent::ProductionFinished { producer });

        self.state = ProducerState::AwaitingDemand;
        let delivery = self.rendezvous.deliver(self.kind());

        self.state = ProducerState::Delivering;
        self.narration.record(&NarrationEvent::Delivered {
            producer,
            slot: delivery.slot,
            ticket: delivery.ticket,
        });

        self.state = ProducerState::AwaitingCompletion;
        let released_at = self
            .rendezvous
            .await_completion(self.kind(), delivery.ticket);
        debug_assert!(delivery.ticket.is_released_by(released_at));
        self.narration.record(&NarrationEvent::Released {
            producer,
            ticket: delivery.ticket,
            observed: released_at,
        });

        self.state = ProducerState::Producing;
        ProducerPass {
            latency,
            delivery,
            released_at,
        }
    }

    /// Runs the loop for the rest of the process.
    pub fn run(mut self) -> Infallible {
        loop {
            self.run_once();
        }
    }
}
