//! Simulated production latency.
//!
//! Latency only decides how long a producer sleeps before offering its unit;
//! it has no bearing on coordinator correctness.

use crate::config::LatencyConfig;
use crate::types::ProducerId;
use crate::util::DetRng;
use parking_lot::Mutex;
use std::time::Duration;

/// Source of per-production delays.
pub trait LatencySource: Send + Sync {
    /// How long `producer`'s next unit takes to produce.
    fn next_delay(&self, producer: ProducerId) -> Duration;
}

/// Constant latency, including none at all.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FixedLatency(pub Duration);

impl FixedLatency {
    /// Instantaneous production.
    pub const ZERO: Self = Self(Duration::ZERO);
}

impl LatencySource for FixedLatency {
    fn next_delay(&self, _producer: ProducerId) -> Duration {
        self.0
    }
}

/// Uniformly distributed latency over an inclusive millisecond range.
#[derive(Debug)]
pub struct UniformLatency {
    min_ms: u64,
    max_ms: u64,
    rng: Mutex<DetRng>,
}

impl UniformLatency {
    /// Creates a generator over `range`, seeded with `seed`.
    #[must_use]
    pub fn new(range: LatencyConfig, seed: u64) -> Self {
        debug_assert!(range.min_ms <= range.max_ms);
        Self {
            min_ms: range.min_ms,
            max_ms: range.max_ms,
            rng: Mutex::new(DetRng::new(seed)),
        }
    }

    /// The configured range.
    #[must_use]
    pub const fn range(&self) -> LatencyConfig {
        LatencyConfig {
            min_ms: self.min_ms,
            max_ms: self.max_ms,
        }
    }
}

impl LatencySource for UniformLatency {
    fn next_delay(&self, _producer: ProducerId) -> Duration {
        let ms = self.rng.lock().next_in_range(self.min_ms, self.max_ms);
        Duration::from_millis(ms)
    }
}
