//! State representation

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Radius of a state's circle in display units, used for hit-testing
pub const STATE_RADIUS: f64 = 30.0;

static NEXT_STATE_ID: AtomicU64 = AtomicU64::new(0);

/// Process-wide unique identity of a state
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateId(u64);

impl StateId {
    /// Allocate a fresh id, never handed out before in this process
    pub fn next() -> Self {
        Self(NEXT_STATE_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "s{}", self.0)
    }
}

/// A state of the automaton
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct State {
    pub id: StateId,
    pub label: String,
    pub x: f64,
    pub y: f64,
    pub initial: bool,
    pub accepting: bool,
}

impl State {
    pub fn new(label: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            id: StateId::next(),
            label: label.into(),
            x,
            y,
            initial: false,
            accepting: false,
        }
    }

    /// Whether the point lies inside this state's circle
    pub fn contains(&self, px: f64, py: f64) -> bool {
        let dx = px - self.x;
        let dy = py - self.y;
        (dx * dx + dy * dy).sqrt() <= STATE_RADIUS
    }

    /// Ordering key used wherever states are listed: label first, id breaks ties
    pub fn sort_key(&self) -> (&str, StateId) {
        (&self.label, self.id)
    }
}
