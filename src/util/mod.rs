//! Internal utilities.
//!
//! Kept dependency-free apart from OS entropy, so latency sequences are
//! reproducible from a seed.

pub mod det_rng;
pub mod entropy;

pub use det_rng::DetRng;
pub use entropy::{SeedOrigin, os_seed, resolve_seed};
