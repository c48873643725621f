//! Rendezvous counters.
//!
//! All counters are lock-free so that recording never adds a lock to the
//! coordinator's locking discipline. They are updated outside coordinator
//! critical sections and are therefore eventually consistent with the
//! coordinator state.

use crate::types::{KindMap, ResourceKind};
use core::fmt;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// A monotonically increasing, shareable counter.
#[derive(Debug)]
pub struct Counter {
    name: &'static str,
    value: AtomicU64,
}

impl Counter {
    /// Creates a counter at zero.
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            value: AtomicU64::new(0),
        }
    }

    /// Returns the counter name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the current value.
    #[must_use]
    pub fn value(&self) -> u64 {
        self.value.load(Ordering::Relaxed)
    }

    /// Increments the counter by the given amount.
    pub fn increment(&self, amount: u64) {
        self.value.fetch_add(amount, Ordering::Relaxed);
    }

    /// Increments the counter by 1.
    pub fn inc(&self) {
        self.increment(1);
    }
}

impl fmt::Display for Counter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.value())
    }
}

fn per_kind(name: &'static str) -> KindMap<Counter> {
    KindMap::from_fn(|_| Counter::new(name))
}

/// Counters describing a running rendezvous.
#[derive(Debug)]
pub struct RendezvousMetrics {
    cycles_completed: Counter,
    units_demanded: KindMap<Counter>,
    producers_woken: KindMap<Counter>,
    units_delivered: KindMap<Counter>,
    producers_released: KindMap<Counter>,
}

impl Default for RendezvousMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl RendezvousMetrics {
    /// Creates zeroed metrics.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cycles_completed: Counter::new("cycles_completed"),
            units_demanded: per_kind("units_demanded"),
            producers_woken: per_kind("producers_woken"),
            units_delivered: per_kind("units_delivered"),
            producers_released: per_kind("producers_released"),
        }
    }

    /// Records a demand of `amount` units that woke `woken` sleeping producers.
    pub fn record_demand(&self, kind: ResourceKind, amount: usize, woken: usize) {
        self.units_demanded[kind].increment(amount as u64);
        self.producers_woken[kind].increment(woken as u64);
    }

    /// Records one delivery.
    pub fn record_delivery(&self, kind: ResourceKind) {
        self.units_delivered[kind].inc();
    }

    /// Records one producer leaving the completion barrier.
    pub fn record_release(&self, kind: ResourceKind) {
        self.producers_released[kind].inc();
    }

    /// Records one finalized cycle.
    pub fn record_cycle(&self) {
        self.cycles_completed.inc();
    }

    /// Cycles finalized so far.
    #[must_use]
    pub fn cycles_completed(&self) -> u64 {
        self.cycles_completed.value()
    }

    /// Units of `kind` delivered so far.
    #[must_use]
    pub fn units_delivered(&self, kind: ResourceKind) -> u64 {
        self.units_delivered[kind].value()
    }

    /// Takes a point-in-time copy of every counter.
    #[must_use]
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            cycles_completed: self.cycles_completed.value(),
            units_demanded: KindMap::from_fn(|kind| self.units_demanded[kind].value()),
            producers_woken: KindMap::from_fn(|kind| self.producers_woken[kind].value()),
            units_delivered: KindMap::from_fn(|kind| self.units_delivered[kind].value()),
            producers_released: KindMap::from_fn(|kind| self.producers_released[kind].value()),
        }
    }
}

/// Serializable copy of [`RendezvousMetrics`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    /// Cycles finalized.
    pub cycles_completed: u64,
    /// Units demanded per kind.
    pub units_demanded: KindMap<u64>,
    /// Sleeping producers woken by demands, per kind.
    pub producers_woken: KindMap<u64>,
    /// Units delivered per kind.
    pub units_delivered: KindMap<u64>,
    /// Producers released from the completion barrier, per kind.
    pub producers_released: KindMap<u64>,
}

impl fmt::Display for MetricsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cycles_completed={}", self.cycles_completed)?;
        for kind in ResourceKind::ALL {
            write!(
                f,
                " {kind}.demanded={} {kind}.woken={} {kind}.delivered={} {kind}.released={}",
                self.units_demanded[kind],
                self.producers_woken[kind],
                self.units_delivered[kind],
                self.producers_released[kind],
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counter_basic() {
        let counter = Counter::new("deliveries");
        counter.inc();
        counter.increment(4);
        assert_eq!(counter.value(), 5);
        assert_eq!(counter.to_string(), "deliveries=5");
    }

    #[test]
    fn snapshot_tracks_per_kind() {
        let metrics = RendezvousMetrics::new();
        metrics.record_demand(ResourceKind::Hydrogen, 2, 1);
        metrics.record_demand(ResourceKind::Oxygen, 1, 1);
        metrics.record_delivery(ResourceKind::Hydrogen);
        metrics.record_delivery(ResourceKind::Hydrogen);
        metrics.record_delivery(ResourceKind::Oxygen);
        metrics.record_release(ResourceKind::Oxygen);
        metrics.record_cycle();

        let snap = metrics.snapshot();
        assert_eq!(snap.cycles_completed, 1);
        assert_eq!(snap.units_demanded, KindMap::new(2, 1));
        assert_eq!(snap.producers_woken, KindMap::new(1, 1));
        assert_eq!(snap.units_delivered, KindMap::new(2, 1));
        assert_eq!(snap.producers_released, KindMap::new(0, 1));
        assert_eq!(metrics.units_delivered(ResourceKind::Hydrogen), 2);
    }

    #[test]
    fn snapshot_json_roundtrip_shape() {
        let metrics = RendezvousMetrics::new();
        metrics.record_cycle();
        let json = serde_json::to_value(metrics.snapshot()).expect("serialize");
        assert_eq!(json["cycles_completed"], 1);
        assert_eq!(json["units_delivered"]["hydrogen"], 0);
    }

    #[test]
    fn snapshot_display_lists_kinds() {
        let text = RendezvousMetrics::new().snapshot().to_string();
        assert!(text.starts_with("cycles_completed=0"));
        assert!(text.contains("hydrogen.delivered=0"));
        assert!(text.contains("oxygen.released=0"));
    }
}
