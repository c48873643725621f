//! Observational event sinks.
//!
//! Producers and the assembler report what they are doing through a
//! [`NarrationSink`]. Sinks are called outside every coordinator lock and must
//! not be needed for correctness; a sink that is slow only slows the thread
//! that is narrating.

use crate::tracing_compat::{debug, info, trace};
use crate::types::{CycleTicket, ProducerId, Recipe};
use parking_lot::{Condvar, Mutex};
use serde::Serialize;
use std::io::{self, Write};
use std::time::{Duration, Instant};

/// Something a producer or the assembler did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum NarrationEvent {
    /// A producer began producing a unit.
    ProductionStarted {
        /// Who is producing.
        producer: ProducerId,
    },
    /// A producer finished producing and will offer its unit.
    ProductionFinished {
        /// Who produced.
        producer: ProducerId,
    },
    /// A producer's unit was accepted into a cycle.
    Delivered {
        /// Who delivered.
        producer: ProducerId,
        /// Slot filled, counting down from the recipe amount.
        slot: usize,
        /// Cycle the unit went into.
        ticket: CycleTicket,
    },
    /// A producer left the completion barrier.
    Released {
        /// Who was released.
        producer: ProducerId,
        /// Cycle it had delivered into.
        ticket: CycleTicket,
        /// Completed-cycle count it observed on release.
        observed: u64,
    },
    /// The assembler issued demand for a new cycle.
    AssemblyStarted {
        /// One-based number of the cycle being assembled.
        cycle: u64,
    },
    /// The assembler finalized a cycle.
    CycleCompleted {
        /// Cycles completed so far, including this one.
        completed: u64,
    },
}

/// Append-only consumer of narration events.
pub trait NarrationSink: Send + Sync {
    /// Records one event.
    fn record(&self, event: &NarrationEvent);
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentNarrator;

impl NarrationSink for SilentNarrator {
    fn record(&self, _event: &NarrationEvent) {}
}

/// Line-per-event console narration.
///
/// Producer lines are tagged `[H#003]`; assembler lines are tagged with the
/// recipe's formula, e.g. `<~H2O~>`.
pub struct ConsoleNarrator {
    assembler_tag: String,
    product: String,
    out: Mutex<Box<dyn Write + Send>>,
}

impl std::fmt::Debug for ConsoleNarrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsoleNarrator")
            .field("assembler_tag", &self.assembler_tag)
            .finish_non_exhaustive()
    }
}

impl ConsoleNarrator {
    /// Narrates to standard output.
    #[must_use]
    pub fn stdout(recipe: &Recipe) -> Self {
        Self::with_writer(recipe, Box::new(io::stdout()))
    }

    /// Narrates to an arbitrary writer.
    #[must_use]
    pub fn with_writer(recipe: &Recipe, out: Box<dyn Write + Send>) -> Self {
        let formula = recipe.formula();
        let product = if *recipe == Recipe::WATER {
            "Water".to_string()
        } else {
            formula.clone()
        };
        Self {
            assembler_tag: format!("<~{formula}~>"),
            product,
            out: Mutex::new(out),
        }
    }

    /// Formats one event as a console line (without the newline).
    #[must_use]
    pub fn render(&self, event: &NarrationEvent) -> String {
        match event {
            NarrationEvent::ProductionStarted { producer } => {
                format!("[{producer}] is producing a new atom...")
            }
            NarrationEvent::ProductionFinished { producer } => {
                format!("[{producer}] produced a new atom!")
            }
            NarrationEvent::Delivered { producer, slot, .. } => {
                format!("[{producer}] will deliver atom #{slot}")
            }
            NarrationEvent::Released {
                producer, ticket, ..
            } => format!("[{producer}] atom used in molecule #{}", ticket.cycle()),
            NarrationEvent::AssemblyStarted { .. } => {
                format!("{} Creating new molecule...", self.assembler_tag)
            }
            NarrationEvent::CycleCompleted { completed } => format!(
                "{} {} created! Molecules created so far: {completed}",
                self.assembler_tag, self.product
            ),
        }
    }
}

impl NarrationSink for ConsoleNarrator {
    fn record(&self, event: &NarrationEvent) {
        let line = self.render(event);
        let mut out = self.out.lock();
        // A closed stdout must not take a producer down with it.
        let _ = writeln!(out, "{line}");
    }
}

/// Narration as structured `tracing` events.
///
/// Production steps are `trace`, deliveries and releases `debug`, cycle
/// boundaries `info`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNarrator;

impl NarrationSink for TracingNarrator {
    fn record(&self, event: &NarrationEvent) {
        match event {
            NarrationEvent::ProductionStarted { producer } => {
                trace!(producer = %producer, "production started");
            }
            NarrationEvent::ProductionFinished { producer } => {
                trace!(producer = %producer, "production finished");
            }
            NarrationEvent::Delivered {
                producer,
                slot,
                ticket,
            } => {
                debug!(producer = %producer, slot, cycle = ticket.cycle(), "delivered");
            }
            NarrationEvent::Released {
                producer,
                ticket,
                observed,
            } => {
                debug!(producer = %producer, cycle = ticket.cycle(), observed, "released");
            }
            NarrationEvent::AssemblyStarted { cycle } => {
                info!(cycle, "assembly started");
            }
            NarrationEvent::CycleCompleted { completed } => {
                info!(completed, "cycle completed");
            }
        }
    }
}

/// In-memory narration log, for tests and diagnostics.
#[derive(Debug, Default)]
pub struct RecordingNarrator {
    events: Mutex<Vec<NarrationEvent>>,
    changed: Condvar,
}

impl RecordingNarrator {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copies out every event recorded so far.
    #[must_use]
    pub fn events(&self) -> Vec<NarrationEvent> {
        self.events.lock().clone()
    }

    /// Number of events recorded so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    /// Returns true if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }

    /// Blocks until `predicate` holds over the log or `timeout` elapses.
    ///
    /// Returns whether the predicate held.
    pub fn wait_until<F>(&self, mut predicate: F, timeout: Duration) -> bool
    where
        F: FnMut(&[NarrationEvent]) -> bool,
    {
        let deadline = Instant::now() + timeout;
        let mut events = self.events.lock();
        while !predicate(&events) {
            if self.changed.wait_until(&mut events, deadline).timed_out() {
                return predicate(&events);
            }
        }
        true
    }
}

impl NarrationSink for RecordingNarrator {
    fn record(&self, event: &NarrationEvent) {
        self.events.lock().push(event.clone());
        self.changed.notify_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ResourceKind;
    use std::sync::Arc;
    use std::thread;

    fn h3() -> ProducerId {
        ProducerId::new(ResourceKind::Hydrogen, 3)
    }

    #[test]
    fn console_lines_match_plant_format() {
        let console = ConsoleNarrator::with_writer(&Recipe::WATER, Box::new(io::sink()));
        assert_eq!(
            console.render(&NarrationEvent::ProductionStarted { producer: h3() }),
            "[H#003] is producing a new atom..."
        );
        assert_eq!(
            console.render(&NarrationEvent::Delivered {
                producer: h3(),
                slot: 2,
                ticket: CycleTicket::from_completed(0),
            }),
            "[H#003] will deliver atom #2"
        );
        assert_eq!(
            console.render(&NarrationEvent::AssemblyStarted { cycle: 1 }),
            "<~H2O~> Creating new molecule..."
        );
        assert_eq!(
            console.render(&NarrationEvent::CycleCompleted { completed: 4 }),
            "<~H2O~> Water created! Molecules created so far: 4"
        );
    }

    #[test]
    fn console_names_other_products_by_formula() {
        let console = ConsoleNarrator::with_writer(&Recipe::new(2, 2), Box::new(io::sink()));
        assert_eq!(
            console.render(&NarrationEvent::CycleCompleted { completed: 1 }),
            "<~H2O2~> H2O2 created! Molecules created so far: 1"
        );
    }

    #[test]
    fn events_serialize_tagged() {
        let json = serde_json::to_string(&NarrationEvent::CycleCompleted { completed: 2 })
            .expect("serialize");
        assert_eq!(json, r#"{"event":"cycle_completed","completed":2}"#);
    }

    #[test]
    fn recording_wait_until_sees_later_events() {
        let log = Arc::new(RecordingNarrator::new());
        let writer = {
            let log = Arc::clone(&log);
            thread::spawn(move || {
                for completed in 1..=3 {
                    log.record(&NarrationEvent::CycleCompleted { completed });
                }
            })
        };
        assert!(log.wait_until(|events| events.len() == 3, Duration::from_secs(5)));
        writer.join().expect("writer thread");
        assert_eq!(log.len(), 3);
    }

    #[test]
    fn recording_wait_until_times_out() {
        let log = RecordingNarrator::new();
        assert!(!log.wait_until(|events| !events.is_empty(), Duration::from_millis(10)));
        assert!(log.is_empty());
    }
}
