//! Seed sources for the latency generator.
//!
//! A configured seed reproduces a run's latency sequence; without one the
//! seed comes from the operating system.

use crate::error::{Error, Result};

/// Where a latency seed came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOrigin {
    /// Supplied by configuration.
    Configured,
    /// Drawn from OS entropy.
    Os,
}

impl SeedOrigin {
    /// Stable identifier for logging.
    #[must_use]
    pub const fn source_id(self) -> &'static str {
        match self {
            Self::Configured => "configured",
            Self::Os => "os",
        }
    }
}

/// Draws a seed from OS entropy.
pub fn os_seed() -> Result<u64> {
    let mut buf = [0u8; 8];
    getrandom::fill(&mut buf).map_err(Error::Entropy)?;
    Ok(u64::from_le_bytes(buf))
}

/// Uses `configured` when present, otherwise draws from the OS.
pub fn resolve_seed(configured: Option<u64>) -> Result<(u64, SeedOrigin)> {
    match configured {
        Some(seed) => Ok((seed, SeedOrigin::Configured)),
        None => Ok((os_seed()?, SeedOrigin::Os)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configured_seed_wins() {
        let (seed, origin) = resolve_seed(Some(99)).expect("configured");
        assert_eq!(seed, 99);
        assert_eq!(origin, SeedOrigin::Configured);
        assert_eq!(origin.source_id(), "configured");
    }

    #[test]
    fn os_seed_is_available() {
        let (_, origin) = resolve_seed(None).expect("os entropy");
        assert_eq!(origin, SeedOrigin::Os);
    }
}
