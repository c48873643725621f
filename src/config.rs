//! Startup configuration.
//!
//! Everything here is fixed once the supervisor starts: the recipe, the
//! producer population per kind, the latency range and the latency seed.
//!
//! With the `config-file` feature a configuration can be loaded from TOML:
//!
//! ```toml
//! seed = 7
//!
//! [recipe]
//! hydrogen = 2
//! oxygen = 1
//!
//! [producers]
//! hydrogen = 10
//! oxygen = 10
//!
//! [latency]
//! min_ms = 5000
//! max_ms = 9000
//! ```

use crate::error::{Error, Result};
use crate::types::{KindMap, Recipe, ResourceKind};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default producers per kind.
pub const DEFAULT_PRODUCERS: usize = 10;
/// Default minimum production latency in milliseconds.
pub const DEFAULT_MIN_LATENCY_MS: u64 = 5_000;
/// Default maximum production latency in milliseconds.
pub const DEFAULT_MAX_LATENCY_MS: u64 = 9_000;

/// Inclusive range of simulated production latency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LatencyConfig {
    /// Shortest production time, in milliseconds.
    pub min_ms: u64,
    /// Longest production time, in milliseconds.
    pub max_ms: u64,
}

impl LatencyConfig {
    /// A range of exactly `ms` milliseconds.
    #[must_use]
    pub const fn fixed(ms: u64) -> Self {
        Self {
            min_ms: ms,
            max_ms: ms,
        }
    }

    /// No production latency at all.
    #[must_use]
    pub const fn zero() -> Self {
        Self::fixed(0)
    }

    /// Minimum as a [`Duration`].
    #[must_use]
    pub const fn min(&self) -> Duration {
        Duration::from_millis(self.min_ms)
    }

    /// Maximum as a [`Duration`].
    #[must_use]
    pub const fn max(&self) -> Duration {
        Duration::from_millis(self.max_ms)
    }

    /// Returns true when every production is instantaneous.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.max_ms == 0
    }
}

impl Default for LatencyConfig {
    fn default() -> Self {
        Self {
            min_ms: DEFAULT_MIN_LATENCY_MS,
            max_ms: DEFAULT_MAX_LATENCY_MS,
        }
    }
}

/// Configuration of a rendezvous.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RendezvousConfig {
    /// Units of each kind consumed per cycle.
    pub recipe: Recipe,
    /// Producer threads per kind.
    pub producers: KindMap<usize>,
    /// Simulated production latency.
    pub latency: LatencyConfig,
    /// Latency seed; drawn from OS entropy when absent.
    pub seed: Option<u64>,
}

impl Default for RendezvousConfig {
    fn default() -> Self {
        Self {
            recipe: Recipe::WATER,
            producers: KindMap::new(DEFAULT_PRODUCERS, DEFAULT_PRODUCERS),
            latency: LatencyConfig::default(),
            seed: None,
        }
    }
}

impl RendezvousConfig {
    /// Creates the default configuration: water, ten producers per kind,
    /// five to nine seconds per atom.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the recipe.
    #[must_use]
    pub const fn with_recipe(mut self, recipe: Recipe) -> Self {
        self.recipe = recipe;
        self
    }

    /// Sets the number of producers of `kind`.
    #[must_use]
    pub fn with_producers(mut self, kind: ResourceKind, count: usize) -> Self {
        self.producers[kind] = count;
        self
    }

    /// Sets the latency range.
    #[must_use]
    pub const fn with_latency(mut self, latency: LatencyConfig) -> Self {
        self.latency = latency;
        self
    }

    /// Sets the latency seed.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Total number of producer threads.
    #[must_use]
    pub fn total_producers(&self) -> usize {
        self.producers.iter().map(|(_, count)| *count).sum()
    }

    /// Checks that every cycle can complete.
    ///
    /// A recipe that needs more units of a kind than there are producers of
    /// that kind would block the assembler forever, and an empty recipe would
    /// spin it without ever waiting.
    pub fn validate(&self) -> Result<()> {
        if self.recipe.is_empty() {
            return Err(Error::EmptyRecipe);
        }
        for (kind, required) in self.recipe.iter() {
            let producers = self.producers[kind];
            if producers < required {
                return Err(Error::InsufficientProducers {
                    kind,
                    required,
                    producers,
                });
            }
        }
        if self.latency.min_ms > self.latency.max_ms {
            return Err(Error::InvalidLatency {
                min: self.latency.min(),
                max: self.latency.max(),
            });
        }
        Ok(())
    }

    /// Parses a TOML document. Missing keys keep their defaults.
    #[cfg(feature = "config-file")]
    pub fn from_toml_str(toml: &str) -> Result<Self> {
        Ok(toml::from_str(toml)?)
    }

    /// Reads and parses a TOML configuration file.
    #[cfg(feature = "config-file")]
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }
}
