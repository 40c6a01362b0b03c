//! Automaton Workbench
//!
//! Model, analyze, and inspect finite automata.
//!
//! This library provides functionality for:
//! - Editing automaton graphs (states, labelled transitions, initial/accepting flags)
//! - Classifying automata as deterministic or not, and checking completeness
//! - Deriving transition tables and a regular-expression rendering of the language
//! - Keeping independent automata in concurrently accessible sessions
//! - Reading automata from the AMDL text format or JSON snapshots

pub mod amdl;
pub mod automaton;
pub mod cli;
pub mod config;
pub mod error;
pub mod session;

pub use config::Config;
pub use error::{Error, Result};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Initialize logging with the given log level
pub fn init_logging(level: &str) {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
        assert_eq!(NAME, "automaton-workbench");
    }
}
