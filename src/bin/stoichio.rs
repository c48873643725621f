//! stoichio: run a hydrogen/oxygen rendezvous from the command line.
//!
//! ```bash
//! # The original program: ten producers per kind, 5-9 s per atom, forever
//! stoichio
//!
//! # Fast run that stops after 20 molecules and prints the counters
//! stoichio --min-latency-ms 0 --max-latency-ms 5 --cycles 20 --narration silent
//!
//! # Start from a file, override one value
//! stoichio --config water.toml --oxygen-producers 4
//! ```

use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use stoichio::error::fatal;
use stoichio::{
    ConsoleNarrator, LatencyConfig, NarrationSink, Recipe, RendezvousConfig, ResourceKind,
    SilentNarrator, Supervisor, TracingNarrator,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "stoichio",
    version,
    about = "Stoichiometric rendezvous of atom producers and a molecule assembler"
)]
struct Cli {
    /// TOML configuration file; flags override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Hydrogen producer threads
    #[arg(long)]
    hydrogen_producers: Option<usize>,

    /// Oxygen producer threads
    #[arg(long)]
    oxygen_producers: Option<usize>,

    /// Hydrogen atoms consumed per molecule
    #[arg(long)]
    hydrogen_per_cycle: Option<usize>,

    /// Oxygen atoms consumed per molecule
    #[arg(long)]
    oxygen_per_cycle: Option<usize>,

    /// Shortest production time in milliseconds
    #[arg(long)]
    min_latency_ms: Option<u64>,

    /// Longest production time in milliseconds
    #[arg(long)]
    max_latency_ms: Option<u64>,

    /// Latency seed (OS entropy when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Where progress is reported
    #[arg(long, value_enum, default_value_t = Narration::Console)]
    narration: Narration,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Exit after this many molecules, printing metrics as JSON
    #[arg(long)]
    cycles: Option<u64>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Narration {
    /// The classic console lines
    Console,
    /// Structured tracing events
    Tracing,
    /// Nothing
    Silent,
}

impl Cli {
    fn load_config(&self) -> stoichio::Result<RendezvousConfig> {
        let mut config = match &self.config {
            Some(path) => RendezvousConfig::from_file(path)?,
            None => RendezvousConfig::new(),
        };
        if let Some(count) = self.hydrogen_producers {
            config.producers[ResourceKind::Hydrogen] = count;
        }
        if let Some(count) = self.oxygen_producers {
            config.producers[ResourceKind::Oxygen] = count;
        }
        config.recipe = Recipe::new(
            self.hydrogen_per_cycle
                .unwrap_or_else(|| config.recipe.amount(ResourceKind::Hydrogen)),
            self.oxygen_per_cycle
                .unwrap_or_else(|| config.recipe.amount(ResourceKind::Oxygen)),
        );
        config.latency = LatencyConfig {
            min_ms: self.min_latency_ms.unwrap_or(config.latency.min_ms),
            max_ms: self.max_latency_ms.unwrap_or(config.latency.max_ms),
        };
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        Ok(config)
    }

    fn narrator(&self, recipe: &Recipe) -> Arc<dyn NarrationSink> {
        match self.narration {
            Narration::Console => Arc::new(ConsoleNarrator::stdout(recipe)),
            Narration::Tracing => Arc::new(TracingNarrator),
            Narration::Silent => Arc::new(SilentNarrator),
        }
    }
}

fn init_logging(default: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_thread_names(true)
        .try_init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    let config = cli.load_config().unwrap_or_else(|e| fatal(&e));
    let narration = cli.narrator(&config.recipe);
    let mut supervisor = Supervisor::new(config)
        .unwrap_or_else(|e| fatal(&e))
        .with_narration(narration);

    let Some(cycles) = cli.cycles else {
        return match supervisor.run() {
            Ok(never) => match never {},
            Err(e) => fatal(&e),
        };
    };

    if let Err(e) = supervisor.start_producers() {
        fatal(&e);
    }
    supervisor.assembler().run_cycles(cycles);
    let snapshot = supervisor.rendezvous().metrics().snapshot();
    match serde_json::to_string_pretty(&snapshot) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: cannot render metrics: {e}");
            ExitCode::FAILURE
        }
    }
}
