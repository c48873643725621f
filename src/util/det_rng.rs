//! Deterministic pseudo-random number generator.
//!
//! A splitmix64 stream: tiny, seedable and reproducible, which is all the
//! latency simulation needs. Not suitable for anything security related.

/// Seedable splitmix64 generator.
#[derive(Debug, Clone)]
pub struct DetRng {
    state: u64,
}

impl DetRng {
    const GAMMA: u64 = 0x9e37_79b9_7f4a_7c15;

    /// Creates a generator from a seed.
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Returns the next `u64` in the stream.
    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(Self::GAMMA);
        mix_seed(self.state)
    }

    /// Returns a value in `lo..=hi`.
    ///
    /// Uses Lemire's widening multiply; the bias is at most `span / 2^64`,
    /// which is irrelevant at millisecond spans.
    #[allow(clippy::cast_possible_truncation)]
    pub fn next_in_range(&mut self, lo: u64, hi: u64) -> u64 {
        debug_assert!(lo <= hi, "empty range {lo}..={hi}");
        let span = hi - lo;
        if span == u64::MAX {
            return self.next_u64();
        }
        let scaled = (u128::from(self.next_u64()) * u128::from(span + 1)) >> 64;
        lo + scaled as u64
    }
}

/// splitmix64 finalizer.
#[must_use]
pub const fn mix_seed(mut seed: u64) -> u64 {
    seed ^= seed >> 30;
    seed = seed.wrapping_mul(0xbf58_476d_1ce4_e5b9);
    seed ^= seed >> 27;
    seed = seed.wrapping_mul(0x94d0_49bb_1331_11eb);
    seed ^= seed >> 31;
    seed
}
