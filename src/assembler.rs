//! The assembler loop.
//!
//! ```text
//! Idle ──► Demanding ──► Gathering ──► Finalizing ──► Idle
//! ```
//!
//! Finalizing is the single linearization point of a cycle. The completion
//! is narrated first, outside every lock, then the counter advance and the
//! completion metric happen under the barrier lock ahead of the broadcast.
//! No producer of a cycle can report its release before the cycle itself is
//! reported complete.

use crate::coordinator::Rendezvous;
use crate::narration::{NarrationEvent, NarrationSink};
use crate::types::{KindMap, ResourceKind};
use std::convert::Infallible;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Where the assembler is in its cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssemblerState {
    /// Between cycles.
    Idle,
    /// Issuing demand on every channel.
    Demanding,
    /// Waiting for every channel to drain.
    Gathering,
    /// Advancing the counter and releasing producers.
    Finalizing,
}

/// Summary of one completed cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleReport {
    /// Cycles completed, including this one.
    pub completed: u64,
    /// Sleeping producers each demand woke.
    pub woken: KindMap<usize>,
    /// Wall time from first demand to finalize.
    pub elapsed: Duration,
}

/// The single thread that drives cycles.
pub struct Assembler {
    state: AssemblerState,
    rendezvous: Arc<Rendezvous>,
    narration: Arc<dyn NarrationSink>,
}

impl std::fmt::Debug for Assembler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Assembler")
            .field("state", &self.state)
            .field("completed", &self.rendezvous.completed())
            .finish_non_exhaustive()
    }
}

impl Assembler {
    /// Creates an idle assembler.
    ///
    /// Exactly one assembler may drive a given [`Rendezvous`].
    #[must_use]
    pub fn new(rendezvous: Arc<Rendezvous>, narration: Arc<dyn NarrationSink>) -> Self {
        Self {
            state: AssemblerState::Idle,
            rendezvous,
            narration,
        }
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> AssemblerState {
        self.state
    }

    /// The coordinator being driven.
    #[must_use]
    pub const fn rendezvous(&self) -> &Arc<Rendezvous> {
        &self.rendezvous
    }

    /// Runs one full cycle and returns its report.
    pub fn run_cycle(&mut self) -> CycleReport {
        let started = Instant::now();
        let rendezvous = &self.rendezvous;
        let cycle = rendezvous.completed() + 1;

        self.state = AssemblerState::Demanding;
        self.narration
            .record(&NarrationEvent::AssemblyStarted { cycle });
        let woken = KindMap::from_fn(|kind| rendezvous.demand(kind));

        self.state = AssemblerState::Gathering;
        for kind in ResourceKind::ALL {
            rendezvous.gather(kind);
        }

        self.state = AssemblerState::Finalizing;
        self.narration
            .record(&NarrationEvent::CycleCompleted { completed: cycle });
        let completed = rendezvous.finalize_cycle();
        debug_assert_eq!(completed, cycle, "a second assembler drove this rendezvous");

        self.state = AssemblerState::Idle;
        CycleReport {
            completed,
            woken,
            elapsed: started.elapsed(),
        }
    }

    /// Runs `cycles` cycles and returns the completed-cycle count.
    pub fn run_cycles(&mut self, cycles: u64) -> u64 {
        let mut completed = self.rendezvous.completed();
        for _ in 0..cycles {
            completed = self.run_cycle().completed;
        }
        completed
    }

    /// Runs cycles for the rest of the process.
    pub fn run(mut self) -> Infallible {
        loop {
            self.run_cycle();
        }
    }
}
