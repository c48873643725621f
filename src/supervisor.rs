//! Startup and ownership of long-lived threads.
//!
//! The [`Supervisor`] validates the configuration, builds the shared
//! [`Rendezvous`], spawns one named thread per producer and then runs the
//! assembler on the calling thread. Producer threads run for the life of the
//! process; their handles are held here and never joined. A cancellation
//! token would be threaded through this type if shutdown is ever supported.

use crate::assembler::Assembler;
use crate::config::RendezvousConfig;
use crate::coordinator::Rendezvous;
use crate::error::{Error, Result};
use crate::latency::{FixedLatency, LatencySource, UniformLatency};
use crate::narration::{NarrationSink, SilentNarrator};
use crate::producer::Producer;
use crate::tracing_compat::{debug, info};
use crate::types::{ProducerId, ResourceKind};
use crate::util::resolve_seed;
use std::convert::Infallible;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Owner of every thread taking part in a rendezvous.
pub struct Supervisor {
    config: RendezvousConfig,
    rendezvous: Arc<Rendezvous>,
    latency: Arc<dyn LatencySource>,
    narration: Arc<dyn NarrationSink>,
    producers: Vec<(ProducerId, JoinHandle<Infallible>)>,
}

impl std::fmt::Debug for Supervisor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Supervisor")
            .field("config", &self.config)
            .field("producers", &self.producers.len())
            .finish_non_exhaustive()
    }
}

impl Supervisor {
    /// Validates `config` and prepares the rendezvous without starting any
    /// thread.
    ///
    /// Latency is drawn uniformly from the configured range, seeded from the
    /// configuration or from OS entropy; a zero range uses
    /// [`FixedLatency::ZERO`]. Narration is silent until
    /// [`with_narration`](Self::with_narration) says otherwise.
    pub fn new(config: RendezvousConfig) -> Result<Self> {
        config.validate()?;
        let latency: Arc<dyn LatencySource> = if config.latency.is_zero() {
            Arc::new(FixedLatency::ZERO)
        } else {
            let (seed, origin) = resolve_seed(config.seed)?;
            debug!(seed, origin = origin.source_id(), "latency seed resolved");
            Arc::new(UniformLatency::new(config.latency, seed))
        };
        Ok(Self {
            rendezvous: Arc::new(Rendezvous::new(config.recipe)),
            config,
            latency,
            narration: Arc::new(SilentNarrator),
            producers: Vec::new(),
        })
    }

    /// Replaces the latency source.
    #[must_use]
    pub fn with_latency(mut self, latency: Arc<dyn LatencySource>) -> Self {
        self.latency = latency;
        self
    }

    /// Replaces the narration sink.
    #[must_use]
    pub fn with_narration(mut self, narration: Arc<dyn NarrationSink>) -> Self {
        self.narration = narration;
        self
    }

    /// The validated configuration.
    #[must_use]
    pub const fn config(&self) -> &RendezvousConfig {
        &self.config
    }

    /// The shared coordinator.
    #[must_use]
    pub const fn rendezvous(&self) -> &Arc<Rendezvous> {
        &self.rendezvous
    }

    /// Identities of the producer threads started so far.
    pub fn producers(&self) -> impl Iterator<Item = ProducerId> + '_ {
        self.producers.iter().map(|(id, _)| *id)
    }

    /// Number of producer threads started so far.
    #[must_use]
    pub fn producer_count(&self) -> usize {
        self.producers.len()
    }

    /// Spawns every configured producer thread.
    ///
    /// Returns how many were started. Calling this more than once is a no-op
    /// after the first success.
    pub fn start_producers(&mut self) -> Result<usize> {
        if !self.producers.is_empty() {
            return Ok(self.producers.len());
        }
        for kind in ResourceKind::ALL {
            let count = self.config.producers[kind];
            for index in 0..count {
                let id = ProducerId::new(kind, index);
                let handle = self.spawn_producer(id)?;
                self.producers.push((id, handle));
            }
            debug!(kind = %kind, count, "producers started");
        }
        info!(
            producers = self.producers.len(),
            recipe = %self.config.recipe,
            "rendezvous started"
        );
        Ok(self.producers.len())
    }

    fn spawn_producer(&self, id: ProducerId) -> Result<JoinHandle<Infallible>> {
        let producer = Producer::new(
            id,
            Arc::clone(&self.rendezvous),
            Arc::clone(&self.latency),
            Arc::clone(&self.narration),
        );
        let thread = format!("producer-{id}");
        thread::Builder::new()
            .name(thread.clone())
            .spawn(move || producer.run())
            .map_err(|source| Error::Spawn { thread, source })
    }

    /// Creates the assembler for this rendezvous.
    ///
    /// Only one assembler may be driven at a time.
    #[must_use]
    pub fn assembler(&self) -> Assembler {
        Assembler::new(Arc::clone(&self.rendezvous), Arc::clone(&self.narration))
    }

    /// Starts the producers and runs the assembler on this thread forever.
    ///
    /// Only returns if startup fails.
    pub fn run(mut self) -> Result<Infallible> {
        self.start_producers()?;
        Ok(self.assembler().run())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LatencyConfig;
    use crate::types::Recipe;

    #[test]
    fn new_rejects_invalid_config() {
        let config = RendezvousConfig::new().with_producers(ResourceKind::Oxygen, 0);
        let err = Supervisor::new(config).expect_err("no oxygen producers");
        assert!(err.is_config_error());
    }

    #[test]
    fn start_producers_names_every_thread() {
        let config = RendezvousConfig::new()
            .with_recipe(Recipe::WATER)
            .with_producers(ResourceKind::Hydrogen, 3)
            .with_producers(ResourceKind::Oxygen, 2)
            .with_latency(LatencyConfig::zero());
        let mut supervisor = Supervisor::new(config).expect("valid config");
        assert_eq!(supervisor.start_producers().expect("spawn"), 5);
        assert_eq!(supervisor.start_producers().expect("idempotent"), 5);

        let ids: Vec<String> = supervisor.producers().map(|id| id.to_string()).collect();
        assert_eq!(ids, vec!["H#000", "H#001", "H#002", "O#000", "O#001"]);
        assert_eq!(supervisor.producer_count(), 5);

        let mut assembler = supervisor.assembler();
        assert_eq!(assembler.run_cycles(3), 3);
    }

    #[test]
    fn seeded_latency_config_builds() {
        let config = RendezvousConfig::new()
            .with_latency(LatencyConfig { min_ms: 1, max_ms: 2 })
            .with_seed(5);
        let supervisor = Supervisor::new(config).expect("valid config");
        assert_eq!(supervisor.config().seed, Some(5));
        assert_eq!(supervisor.rendezvous().completed(), 0);
    }
}
