//! Transition representation

use crate::automaton::StateId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Canonical epsilon symbol
pub const EPSILON: &str = "ε";

static NEXT_TRANSITION_ID: AtomicU64 = AtomicU64::new(0);

/// Process-wide unique identity of a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransitionId(u64);

impl TransitionId {
    pub fn next() -> Self {
        Self(NEXT_TRANSITION_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for TransitionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t{}", self.0)
    }
}

/// Whether a symbol denotes the empty word
pub fn is_epsilon_symbol(symbol: &str) -> bool {
    symbol.is_empty() || symbol == EPSILON || symbol == "epsilon"
}

/// A labelled transition between two states of the same graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    pub id: TransitionId,
    pub from: StateId,
    pub to: StateId,
    pub symbol: String,
}

impl Transition {
    pub fn new(from: StateId, to: StateId, symbol: impl Into<String>) -> Self {
        Self {
            id: TransitionId::next(),
            from,
            to,
            symbol: symbol.into(),
        }
    }

    pub fn is_epsilon(&self) -> bool {
        is_epsilon_symbol(&self.symbol)
    }

    pub fn is_self_loop(&self) -> bool {
        self.from == self.to
    }

    /// Get display label for the transition
    pub fn display_label(&self) -> &str {
        if self.is_epsilon() { EPSILON } else { &self.symbol }
    }
}
