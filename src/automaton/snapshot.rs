//! JSON snapshot of a graph
//!
//! Snapshots are what clients send to replace a session's graph wholesale.
//! Ids in a snapshot only link transitions to states: loading allocates fresh
//! ids so a snapshot can never collide with entities already in the process.

use super::{AutomatonGraph, State, StateId, TransitionId};
use crate::Error;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub name: String,
    #[serde(default)]
    pub states: Vec<State>,
    #[serde(default)]
    pub transitions: Vec<TransitionSnapshot>,
    /// Informational; recomputed from transitions on load
    #[serde(default)]
    pub alphabet: BTreeSet<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionSnapshot {
    pub id: TransitionId,
    pub from: StateId,
    pub to: StateId,
    #[serde(default)]
    pub symbol: String,
}

impl From<&AutomatonGraph> for GraphSnapshot {
    fn from(graph: &AutomatonGraph) -> Self {
        Self {
            name: graph.name().to_string(),
            states: graph.states().into_iter().cloned().collect(),
            transitions: graph
                .transitions()
                .into_iter()
                .map(|t| TransitionSnapshot {
                    id: t.id,
                    from: t.from,
                    to: t.to,
                    symbol: t.symbol.clone(),
                })
                .collect(),
            alphabet: graph.alphabet().clone(),
        }
    }
}

impl TryFrom<GraphSnapshot> for AutomatonGraph {
    type Error = Error;

    fn try_from(snapshot: GraphSnapshot) -> Result<Self, Self::Error> {
        let mut graph = AutomatonGraph::new(snapshot.name);
        let mut ids: HashMap<StateId, StateId> = HashMap::new();

        for state in &snapshot.states {
            if ids.contains_key(&state.id) {
                return Err(Error::Snapshot(format!("duplicate state id {}", state.id)));
            }
            let fresh = graph.add_labeled_state(&state.label, state.x, state.y).id;
            graph.set_flags(fresh, state.initial, state.accepting)?;
            ids.insert(state.id, fresh);
        }

        for transition in &snapshot.transitions {
            let from = *ids
                .get(&transition.from)
                .ok_or(Error::InvalidReference(transition.from))?;
            let to = *ids
                .get(&transition.to)
                .ok_or(Error::InvalidReference(transition.to))?;
            graph.add_transition(from, to, transition.symbol.clone())?;
        }

        Ok(graph)
    }
}

impl Serialize for AutomatonGraph {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        GraphSnapshot::from(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for AutomatonGraph {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let snapshot = GraphSnapshot::deserialize(deserializer)?;
        AutomatonGraph::try_from(snapshot).map_err(serde::de::Error::custom)
    }
}
