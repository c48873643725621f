//! The rendezvous coordinator.
//!
//! [`Rendezvous`] owns one [`AtomChannel`] per kind, the shared
//! [`ReadySignal`], the [`CompletionBarrier`] and the metrics. Producers and
//! the assembler share it through an `Arc` and only ever reach a channel by
//! its [`ResourceKind`].

use crate::observability::RendezvousMetrics;
use crate::sync::{AtomChannel, CompletionBarrier, Delivery, ReadySignal};
use crate::tracing_compat::debug;
use crate::types::{CycleTicket, KindMap, Recipe, ResourceKind};

/// Shared coordination state for one recipe.
#[derive(Debug)]
pub struct Rendezvous {
    recipe: Recipe,
    channels: KindMap<AtomChannel>,
    ready: ReadySignal,
    barrier: CompletionBarrier,
    metrics: RendezvousMetrics,
}

impl Rendezvous {
    /// Creates a coordinator for `recipe` with nothing demanded.
    #[must_use]
    pub fn new(recipe: Recipe) -> Self {
        Self {
            recipe,
            channels: KindMap::from_fn(AtomChannel::new),
            ready: ReadySignal::new(),
            barrier: CompletionBarrier::new(),
            metrics: RendezvousMetrics::new(),
        }
    }

    /// The recipe every cycle follows.
    #[must_use]
    pub const fn recipe(&self) -> &Recipe {
        &self.recipe
    }

    /// The channel for `kind`.
    #[must_use]
    pub const fn channel(&self, kind: ResourceKind) -> &AtomChannel {
        self.channels.get(kind)
    }

    /// The ready signal the assembler gathers on.
    #[must_use]
    pub const fn ready(&self) -> &ReadySignal {
        &self.ready
    }

    /// The completion barrier.
    #[must_use]
    pub const fn barrier(&self) -> &CompletionBarrier {
        &self.barrier
    }

    /// Rendezvous counters.
    #[must_use]
    pub const fn metrics(&self) -> &RendezvousMetrics {
        &self.metrics
    }

    /// Cycles finalized so far.
    #[must_use]
    pub fn completed(&self) -> u64 {
        self.barrier.completed()
    }

    /// Producer side: blocks until `kind` is demanded, then delivers one unit.
    ///
    /// The delivery is counted before the channel can report itself drained.
    pub fn deliver(&self, kind: ResourceKind) -> Delivery {
        self.channel(kind)
            .deliver(&self.ready, &self.barrier, &self.metrics)
    }

    /// Producer side: blocks until the cycle named by `ticket` is finalized.
    ///
    /// `kind` is only used for accounting.
    pub fn await_completion(&self, kind: ResourceKind, ticket: CycleTicket) -> u64 {
        let observed = self.barrier.await_completion(ticket);
        self.metrics.record_release(kind);
        observed
    }

    /// Assembler side: demands the recipe amount of `kind`.
    ///
    /// Returns how many sleeping producers were woken.
    pub fn demand(&self, kind: ResourceKind) -> usize {
        let amount = self.recipe.amount(kind);
        let woken = self.channel(kind).demand(amount);
        self.metrics.record_demand(kind, amount, woken);
        woken
    }

    /// Assembler side: blocks until every demanded unit of `kind` arrived.
    pub fn gather(&self, kind: ResourceKind) {
        self.channel(kind).await_drained(&self.ready);
    }

    /// Assembler side: closes the current cycle and releases its producers.
    ///
    /// Returns the number of cycles completed, including this one. The cycle
    /// metric is updated before any producer is released.
    pub fn finalize_cycle(&self) -> u64 {
        let completed = self.barrier.finalize_cycle(&self.metrics);
        debug!(completed, recipe = %self.recipe, "cycle finalized");
        completed
    }
}
