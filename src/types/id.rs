//! Identifier types for producers and cycles.

use super::kind::ResourceKind;
use core::fmt;
use serde::{Deserialize, Serialize};

/// Identity of a producer thread: its kind and its index within that kind.
///
/// Displayed the way narration tags it, e.g. `H#003`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProducerId {
    kind: ResourceKind,
    index: usize,
}

impl ProducerId {
    /// Creates a producer identity.
    #[inline]
    #[must_use]
    pub const fn new(kind: ResourceKind, index: usize) -> Self {
        Self { kind, index }
    }

    /// Returns the kind this producer generates.
    #[inline]
    #[must_use]
    pub const fn kind(self) -> ResourceKind {
        self.kind
    }

    /// Returns the zero-based index within the producer's kind.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.index
    }
}

impl fmt::Display for ProducerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{:03}", self.kind.symbol(), self.index)
    }
}

/// The cycle counter value a producer observed when it delivered.
///
/// A ticket with value `n` means `n` cycles had completed, so the delivery
/// belongs to cycle `n + 1`, and the producer may move on once the counter
/// exceeds `n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CycleTicket(u64);

impl CycleTicket {
    /// Wraps a raw counter snapshot.
    #[inline]
    #[must_use]
    pub const fn from_completed(completed: u64) -> Self {
        Self(completed)
    }

    /// Number of cycles that had completed when the ticket was taken.
    #[inline]
    #[must_use]
    pub const fn completed_before(self) -> u64 {
        self.0
    }

    /// One-based number of the cycle the delivery contributed to.
    #[inline]
    #[must_use]
    pub const fn cycle(self) -> u64 {
        self.0 + 1
    }

    /// Returns true once `completed` cycles include the ticket's cycle.
    #[inline]
    #[must_use]
    pub const fn is_released_by(self, completed: u64) -> bool {
        completed > self.0
    }
}

impl fmt::Display for CycleTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cycle {}", self.cycle())
    }
}
