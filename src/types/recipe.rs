//! Per-cycle required amounts.

use super::kind::{KindMap, ResourceKind};
use core::fmt;
use serde::{Deserialize, Serialize};

/// How many units of each kind one cycle consumes.
///
/// Fixed at startup and read-only afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Recipe(KindMap<usize>);

impl Recipe {
    /// Two hydrogen units and one oxygen unit.
    pub const WATER: Self = Self(KindMap::new(2, 1));

    /// Creates a recipe from per-kind amounts.
    #[must_use]
    pub const fn new(hydrogen: usize, oxygen: usize) -> Self {
        Self(KindMap::new(hydrogen, oxygen))
    }

    /// Returns the amount of `kind` required per cycle.
    #[must_use]
    pub const fn amount(&self, kind: ResourceKind) -> usize {
        *self.0.get(kind)
    }

    /// Returns the per-kind amounts.
    #[must_use]
    pub const fn amounts(&self) -> &KindMap<usize> {
        &self.0
    }

    /// Returns the total number of units one cycle consumes.
    #[must_use]
    pub fn total(&self) -> usize {
        self.0.iter().map(|(_, amount)| *amount).sum()
    }

    /// Returns true when no kind is required at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Iterates `(kind, amount)` pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (ResourceKind, usize)> + '_ {
        self.0.iter().map(|(kind, amount)| (kind, *amount))
    }

    /// Returns the molecular formula, e.g. `H2O` for [`Recipe::WATER`].
    #[must_use]
    pub fn formula(&self) -> String {
        let mut out = String::new();
        for (kind, amount) in self.iter() {
            match amount {
                0 => {}
                1 => out.push(kind.symbol()),
                n => {
                    out.push(kind.symbol());
                    out.push_str(&n.to_string());
                }
            }
        }
        out
    }
}

impl Default for Recipe {
    fn default() -> Self {
        Self::WATER
    }
}

impl From<KindMap<usize>> for Recipe {
    fn from(amounts: KindMap<usize>) -> Self {
        Self(amounts)
    }
}

impl fmt::Display for Recipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.formula())
    }
}
