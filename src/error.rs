//! Error types and the fatal-exit routine.
//!
//! Only startup can fail. Once every producer thread is running, the
//! coordinator is pure synchronization and has no error path.

use crate::types::ResourceKind;
use std::io;
use std::time::Duration;
use thiserror::Error;

/// Errors raised while configuring or starting the rendezvous.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// A long-lived thread could not be spawned.
    #[error("creating thread `{thread}` failed")]
    Spawn {
        /// Name of the thread that failed to start.
        thread: String,
        /// Underlying OS error.
        #[source]
        source: io::Error,
    },

    /// The recipe asks for more units of a kind than there are producers of
    /// that kind, so a cycle could never complete.
    #[error(
        "recipe requires {required} {kind} unit(s) per cycle but only {producers} {kind} producer(s) are configured"
    )]
    InsufficientProducers {
        /// Kind that is under-populated.
        kind: ResourceKind,
        /// Units of `kind` one cycle consumes.
        required: usize,
        /// Producers of `kind` configured.
        producers: usize,
    },

    /// The recipe requires no units at all.
    #[error("recipe requires no units; the assembler would never wait")]
    EmptyRecipe,

    /// The latency range is inverted.
    #[error("invalid latency range: minimum {min:?} exceeds maximum {max:?}")]
    InvalidLatency {
        /// Configured minimum.
        min: Duration,
        /// Configured maximum.
        max: Duration,
    },

    /// The operating system could not provide a latency seed.
    #[error("OS entropy unavailable: {0}")]
    Entropy(getrandom::Error),

    /// A configuration file could not be read.
    #[cfg(feature = "config-file")]
    #[error("failed to read config file `{path}`")]
    ConfigRead {
        /// Path that was read.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A configuration file is not valid TOML for [`RendezvousConfig`](crate::RendezvousConfig).
    #[cfg(feature = "config-file")]
    #[error("failed to parse config")]
    ConfigParse(#[from] toml::de::Error),
}

impl Error {
    /// Returns true for errors caused by an inconsistent configuration rather
    /// than by the environment.
    #[must_use]
    pub const fn is_config_error(&self) -> bool {
        match self {
            Self::InsufficientProducers { .. } | Self::EmptyRecipe | Self::InvalidLatency { .. } => {
                true
            }
            #[cfg(feature = "config-file")]
            Self::ConfigParse(_) => true,
            _ => false,
        }
    }
}

/// Result alias for fallible rendezvous operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Formats `err` with its source chain to stderr and terminates the process.
///
/// There is no degraded mode: a rendezvous that failed to start has nothing
/// useful left to do.
pub fn fatal(err: &Error) -> ! {
    eprintln!("error: {}", render_chain(err));
    crate::tracing_compat::error!(error = %err, "startup failed");
    std::process::exit(1)
}

/// Renders an error and every `source()` below it, joined by `: `.
#[must_use]
pub fn render_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        out.push_str(": ");
        out.push_str(&cause.to_string());
        source = cause.source();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawn_error_renders_source_chain() {
        let err = Error::Spawn {
            thread: "producer-H#001".to_string(),
            source: io::Error::new(io::ErrorKind::OutOfMemory, "no stack"),
        };
        assert_eq!(
            render_chain(&err),
            "creating thread `producer-H#001` failed: no stack"
        );
        assert!(!err.is_config_error());
    }

    #[test]
    fn insufficient_producers_message() {
        let err = Error::InsufficientProducers {
            kind: ResourceKind::Hydrogen,
            required: 2,
            producers: 1,
        };
        let msg = err.to_string();
        assert!(msg.contains("2 hydrogen unit(s)"), "{msg}");
        assert!(msg.contains("only 1 hydrogen producer(s)"), "{msg}");
        assert!(err.is_config_error());
    }
}
