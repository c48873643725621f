//! Shared helpers for integration tests.

#![allow(dead_code, unused_macros)]

use std::sync::Arc;
use std::sync::Once;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use stoichio::{
    FixedLatency, LatencySource, NarrationSink, Producer, ProducerId, Rendezvous, ResourceKind,
};

static INIT_LOGGING: Once = Once::new();

/// Installs a test-writer `fmt` subscriber, filtered by `RUST_LOG`
/// (default `stoichio=debug`), once per test binary.
pub fn init_test_logging() {
    INIT_LOGGING.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("stoichio=debug"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_thread_names(true)
            .try_init();
    });
}

/// Generous upper bound for anything a test waits on.
pub const TEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Spawns `count` detached producers of `kind`, numbered from zero.
///
/// The threads never exit; the test process reaps them.
pub fn spawn_producers(
    rendezvous: &Arc<Rendezvous>,
    kind: ResourceKind,
    count: usize,
    latency: Arc<dyn LatencySource>,
    narration: Arc<dyn NarrationSink>,
) -> Vec<JoinHandle<()>> {
    (0..count)
        .map(|index| {
            let producer = Producer::new(
                ProducerId::new(kind, index),
                Arc::clone(rendezvous),
                Arc::clone(&latency),
                Arc::clone(&narration),
            );
            thread::Builder::new()
                .name(format!("test-producer-{}", producer.id()))
                .spawn(move || {
                    let _ = producer.run();
                })
                .expect("spawn producer")
        })
        .collect()
}

/// Zero-latency source for tests that only exercise coordination.
pub fn no_latency() -> Arc<dyn LatencySource> {
    Arc::new(FixedLatency::ZERO)
}

#[macro_export]
macro_rules! test_phase {
    ($name:expr) => {
        tracing::info!(phase = %$name, "==== test phase ====");
    };
}

#[macro_export]
macro_rules! test_section {
    ($name:expr) => {
        tracing::info!(section = %$name, "---- section ----");
    };
}

#[macro_export]
macro_rules! assert_with_log {
    ($cond:expr, $msg:expr, $expected:expr, $actual:expr) => {{
        let expected = &$expected;
        let actual = &$actual;
        tracing::debug!(assertion = %$msg, ?expected, ?actual, "checking");
        assert!($cond, "{}: expected {:?}, got {:?}", $msg, expected, actual);
    }};
}

#[macro_export]
macro_rules! test_complete {
    ($name:expr $(, $key:ident = $value:expr)* $(,)?) => {
        tracing::info!(test = %$name, $($key = ?$value,)* "==== test complete ====");
    };
}
