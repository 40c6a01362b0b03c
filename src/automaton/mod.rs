//! Automaton module - Build and analyze finite-state automata

pub mod analyzer;
pub mod graph;
pub mod regex;
pub mod snapshot;
pub mod state;
pub mod table;
pub mod transition;

// Re-export key types
pub use analyzer::{AnalysisReport, AutomatonKind};
pub use graph::{AutomatonGraph, DEFAULT_NAME};
pub use regex::RegexShape;
pub use snapshot::GraphSnapshot;
pub use state::{STATE_RADIUS, State, StateId};
pub use table::{StateRef, TableRow, TransitionTable};
pub use transition::{EPSILON, Transition, TransitionId, is_epsilon_symbol};
