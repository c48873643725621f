//! Stoichio: a stoichiometric rendezvous coordinator.
//!
//! # Overview
//!
//! Many independent producer threads each generate units of one
//! [`ResourceKind`]. A single assembler thread consumes those units in the
//! exact proportions of a [`Recipe`], cycle after cycle. The default recipe
//! is water: two hydrogen units and one oxygen unit per molecule.
//!
//! # Core Guarantees
//!
//! - **Exact consumption**: every completed cycle consumed exactly the recipe amount of each kind
//! - **Minimal wakeups**: a demand for `n` units wakes `n` producers, and the assembler is
//!   signalled once per drained kind
//! - **No stale release**: a producer leaves the completion barrier only after the cycle it
//!   delivered into has been finalized
//! - **Deadlock freedom**: no thread ever holds two coordinator locks, or waits on one entity
//!   while holding another's lock
//!
//! # Module Structure
//!
//! - [`types`]: Resource kinds, per-kind maps, recipes, producer and cycle identifiers
//! - [`sync`]: The three synchronization entities (atom channel, ready signal, completion barrier)
//! - [`coordinator`]: [`Rendezvous`], the owner of every per-kind channel and the barrier
//! - [`producer`]: The producer loop state machine
//! - [`assembler`]: The assembler loop state machine
//! - [`supervisor`]: Startup and ownership of long-lived threads
//! - [`config`]: Startup configuration and validation
//! - [`latency`]: Pluggable production latency generators
//! - [`narration`]: Observational event sinks (console, tracing, recording)
//! - [`observability`]: Lock-free counters and snapshots
//! - [`error`](mod@error): Error types and the fatal-exit routine
//! - [`util`]: Deterministic RNG and entropy helpers
//! - [`tracing_compat`]: Optional tracing integration (requires `tracing-integration` feature)

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::doc_markdown)]

pub mod assembler;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod latency;
pub mod narration;
pub mod observability;
pub mod producer;
pub mod supervisor;
pub mod sync;
pub mod tracing_compat;
pub mod types;
pub mod util;

pub use assembler::{Assembler, AssemblerState, CycleReport};
pub use config::{LatencyConfig, RendezvousConfig};
pub use coordinator::Rendezvous;
pub use error::{Error, Result};
pub use latency::{FixedLatency, LatencySource, UniformLatency};
pub use narration::{
    ConsoleNarrator, NarrationEvent, NarrationSink, RecordingNarrator, SilentNarrator,
    TracingNarrator,
};
pub use observability::{MetricsSnapshot, RendezvousMetrics};
pub use producer::{Producer, ProducerPass, ProducerState};
pub use supervisor::Supervisor;
pub use sync::{AtomChannel, CompletionBarrier, Delivery, ReadySignal};
pub use types::{CycleTicket, KindMap, ProducerId, Recipe, ResourceKind};
