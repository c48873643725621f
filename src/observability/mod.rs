//! Observability for the rendezvous.
//!
//! Structured logging goes through [`crate::tracing_compat`]; this module
//! holds the counters.

pub mod metrics;

pub use metrics::{Counter, MetricsSnapshot, RendezvousMetrics};
