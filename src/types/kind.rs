//! Resource kinds and the typed per-kind map.
//!
//! Every piece of per-kind state (channels, recipe amounts, producer counts,
//! metrics) lives in a [`KindMap`] indexed by [`ResourceKind`], so there is no
//! raw integer that could select the wrong kind's lock.

use core::fmt;
use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// The kind of unit a producer generates.
///
/// Assigned when a producer thread is created and never changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    /// Hydrogen atoms.
    Hydrogen,
    /// Oxygen atoms.
    Oxygen,
}

impl ResourceKind {
    /// Every kind, in canonical order.
    pub const ALL: [Self; 2] = [Self::Hydrogen, Self::Oxygen];

    /// Returns the chemical symbol used in narration tags.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::Hydrogen => 'H',
            Self::Oxygen => 'O',
        }
    }

    /// Returns the lowercase kind name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hydrogen => "hydrogen",
            Self::Oxygen => "oxygen",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One value per [`ResourceKind`].
///
/// Deserializing rejects keys that name no kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KindMap<T> {
    /// Value for [`ResourceKind::Hydrogen`].
    pub hydrogen: T,
    /// Value for [`ResourceKind::Oxygen`].
    pub oxygen: T,
}

impl<T> KindMap<T> {
    /// Creates a map from explicit per-kind values.
    #[must_use]
    pub const fn new(hydrogen: T, oxygen: T) -> Self {
        Self { hydrogen, oxygen }
    }

    /// Builds a map by evaluating `f` once per kind, in canonical order.
    pub fn from_fn(mut f: impl FnMut(ResourceKind) -> T) -> Self {
        let hydrogen = f(ResourceKind::Hydrogen);
        let oxygen = f(ResourceKind::Oxygen);
        Self { hydrogen, oxygen }
    }

    /// Returns the value for `kind`.
    #[must_use]
    pub const fn get(&self, kind: ResourceKind) -> &T {
        match kind {
            ResourceKind::Hydrogen => &self.hydrogen,
            ResourceKind::Oxygen => &self.oxygen,
        }
    }

    /// Returns the value for `kind` mutably.
    pub fn get_mut(&mut self, kind: ResourceKind) -> &mut T {
        match kind {
            ResourceKind::Hydrogen => &mut self.hydrogen,
            ResourceKind::Oxygen => &mut self.oxygen,
        }
    }

    /// Iterates `(kind, value)` pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (ResourceKind, &T)> {
        ResourceKind::ALL.into_iter().map(move |kind| (kind, self.get(kind)))
    }

    /// Transforms every value, keeping the kind association.
    pub fn map<U>(self, mut f: impl FnMut(ResourceKind, T) -> U) -> KindMap<U> {
        KindMap {
            hydrogen: f(ResourceKind::Hydrogen, self.hydrogen),
            oxygen: f(ResourceKind::Oxygen, self.oxygen),
        }
    }
}

impl<T> Index<ResourceKind> for KindMap<T> {
    type Output = T;

    fn index(&self, kind: ResourceKind) -> &T {
        self.get(kind)
    }
}

impl<T> IndexMut<ResourceKind> for KindMap<T> {
    fn index_mut(&mut self, kind: ResourceKind) -> &mut T {
        self.get_mut(kind)
    }
}
