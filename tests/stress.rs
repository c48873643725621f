//! Stress: randomized recipes and populations with real (tiny) latency.
//!
//! `STOICHIO_STRESS_SEED` pins the fastrand seed for reproduction.

mod common;

use common::{TEST_TIMEOUT, spawn_producers};
use std::sync::Arc;
use std::sync::mpsc;
use std::thread;
use stoichio::{
    Assembler, LatencyConfig, LatencySource, Recipe, RecordingNarrator, Rendezvous, ResourceKind,
    SilentNarrator, UniformLatency,
};

fn stress_seed() -> u64 {
    std::env::var("STOICHIO_STRESS_SEED")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| fastrand::u64(..))
}

/// Runs the assembler on its own thread so a deadlock fails the test
/// instead of hanging it.
fn run_bounded(rendezvous: &Arc<Rendezvous>, cycles: u64) -> u64 {
    let (tx, rx) = mpsc::channel();
    let rendezvous = Arc::clone(rendezvous);
    thread::Builder::new()
        .name("test-assembler".into())
        .spawn(move || {
            let mut assembler = Assembler::new(rendezvous, Arc::new(SilentNarrator));
            let _ = tx.send(assembler.run_cycles(cycles));
        })
        .expect("spawn assembler");
    rx.recv_timeout(TEST_TIMEOUT * 3)
        .expect("assembler made progress")
}

#[test]
fn stress_random_populations_make_progress() {
    common::init_test_logging();
    test_phase!("Randomized populations");

    let seed = stress_seed();
    let mut rng = fastrand::Rng::with_seed(seed);
    tracing::info!(seed, "stress seed");

    for round in 0..4 {
        let recipe = Recipe::new(rng.usize(0..=3), rng.usize(1..=3));
        let producers = |required: usize, rng: &mut fastrand::Rng| required + rng.usize(0..=3);
        let h = producers(recipe.amount(ResourceKind::Hydrogen), &mut rng);
        let o = producers(recipe.amount(ResourceKind::Oxygen), &mut rng);
        let cycles = rng.u64(20..=60);
        test_section!(format!("round {round}: recipe {recipe}, producers H={h} O={o}"));

        let rendezvous = Arc::new(Rendezvous::new(recipe));
        let latency: Arc<dyn LatencySource> = Arc::new(UniformLatency::new(
            LatencyConfig { min_ms: 0, max_ms: 2 },
            rng.u64(..),
        ));
        let log = Arc::new(RecordingNarrator::new());
        spawn_producers(&rendezvous, ResourceKind::Hydrogen, h, Arc::clone(&latency), log.clone());
        spawn_producers(&rendezvous, ResourceKind::Oxygen, o, latency, log.clone());

        let completed = run_bounded(&rendezvous, cycles);
        assert_with_log!(
            completed == cycles,
            "every cycle completed",
            cycles,
            completed
        );

        let metrics = rendezvous.metrics().snapshot();
        for kind in ResourceKind::ALL {
            let expected = recipe.amount(kind) as u64 * cycles;
            assert_with_log!(
                metrics.units_delivered[kind] == expected,
                format!("seed {seed} round {round}: {kind} deliveries"),
                expected,
                metrics.units_delivered[kind]
            );
            assert_eq!(metrics.units_demanded[kind], expected);
            assert!(metrics.producers_woken[kind] <= expected);
            assert_eq!(rendezvous.channel(kind).remaining(), 0);
        }
    }

    test_complete!("stress_random_populations_make_progress", seed = seed);
}

#[test]
fn stress_exactly_recipe_many_producers() {
    common::init_test_logging();
    test_phase!("Minimal population");

    let recipe = Recipe::new(4, 2);
    let rendezvous = Arc::new(Rendezvous::new(recipe));
    let log = Arc::new(RecordingNarrator::new());
    spawn_producers(&rendezvous, ResourceKind::Hydrogen, 4, common::no_latency(), log.clone());
    spawn_producers(&rendezvous, ResourceKind::Oxygen, 2, common::no_latency(), log);

    assert_eq!(run_bounded(&rendezvous, 200), 200);
    assert_eq!(rendezvous.metrics().cycles_completed(), 200);

    test_complete!("stress_exactly_recipe_many_producers", cycles = 200);
}

#[test]
fn stress_every_cycle_counts_exactly_the_recipe() {
    common::init_test_logging();
    test_phase!("Per-cycle accounting under zero latency");

    const CYCLES: u64 = 10_000;
    let recipe = Recipe::WATER;
    let rendezvous = Arc::new(Rendezvous::new(recipe));
    let log = Arc::new(SilentNarrator);
    spawn_producers(&rendezvous, ResourceKind::Hydrogen, 3, common::no_latency(), log.clone());
    spawn_producers(&rendezvous, ResourceKind::Oxygen, 2, common::no_latency(), log.clone());

    let mut assembler = Assembler::new(Arc::clone(&rendezvous), log);
    let mut lagged = 0u64;
    for _ in 0..CYCLES {
        let report = assembler.run_cycle();
        let metrics = rendezvous.metrics().snapshot();
        let c = report.completed;
        let exact = metrics.cycles_completed == c
            && ResourceKind::ALL
                .into_iter()
                .all(|kind| metrics.units_delivered[kind] == recipe.amount(kind) as u64 * c);
        if !exact {
            lagged += 1;
            tracing::error!(cycle = c, ?metrics, "counters behind the cycle");
        }
    }
    assert_with_log!(lagged == 0, "cycles with lagging counters", 0u64, lagged);
    assert_eq!(rendezvous.completed(), CYCLES);

    test_complete!("stress_every_cycle_counts_exactly_the_recipe", cycles = CYCLES);
}
