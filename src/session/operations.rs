//! Session-scoped operations
//!
//! The operation set adapters call: each one resolves the token, locks that
//! session's graph for the duration of the call, and applies a single
//! mutation or query. Removals are idempotent: removing a state or transition
//! that no longer exists succeeds without effect. Only add-transition insists
//! that its endpoints exist.

use super::{SessionStore, SessionToken};
use crate::automaton::{
    AnalysisReport, State, StateId, Transition, TransitionId, TransitionTable, analyzer,
};
use crate::Result;

impl SessionStore {
    pub fn add_state(&self, token: &SessionToken, x: f64, y: f64) -> Result<State> {
        self.with_graph(token, |graph| Ok(graph.add_state(x, y).clone()))
    }

    pub fn remove_state(&self, token: &SessionToken, state: StateId) -> Result<()> {
        self.with_graph(token, |graph| {
            if graph.remove_state(state).is_none() {
                tracing::debug!("State {} already absent from session {}", state, token);
            }
            Ok(())
        })
    }

    /// Move a state and optionally set its flags.
    ///
    /// `initial: Some(true)` clears the flag on every other state first.
    pub fn update_state(
        &self,
        token: &SessionToken,
        state: StateId,
        x: f64,
        y: f64,
        initial: Option<bool>,
        accepting: Option<bool>,
    ) -> Result<State> {
        self.with_graph(token, |graph| {
            graph
                .update_state(state, x, y, initial, accepting)
                .cloned()
        })
    }

    pub fn add_transition(
        &self,
        token: &SessionToken,
        from: StateId,
        to: StateId,
        symbol: &str,
    ) -> Result<Transition> {
        self.with_graph(token, |graph| {
            graph.add_transition(from, to, symbol).cloned()
        })
    }

    pub fn remove_transition(&self, token: &SessionToken, transition: TransitionId) -> Result<()> {
        self.with_graph(token, |graph| {
            if graph.remove_transition(transition).is_none() {
                tracing::debug!(
                    "Transition {} already absent from session {}",
                    transition,
                    token
                );
            }
            Ok(())
        })
    }

    pub fn transition_table(&self, token: &SessionToken) -> Result<TransitionTable> {
        self.with_graph(token, |graph| Ok(graph.transition_table()))
    }

    pub fn analysis(&self, token: &SessionToken) -> Result<AnalysisReport> {
        self.with_graph(token, |graph| Ok(analyzer::analyze(graph)))
    }

    /// Remove isolated non-initial states, returning how many went away
    pub fn clean(&self, token: &SessionToken) -> Result<usize> {
        self.with_graph(token, |graph| Ok(graph.clean()))
    }
}
