//! Transition table derivation
//!
//! Both the analysis report and the tabular display read the same table, so
//! its ordering is fixed here: rows by state label (id breaks ties), columns
//! by symbol in lexicographic order.

use crate::automaton::{AutomatonGraph, State, StateId};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Lightweight reference to a state as it appears in the table
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct StateRef {
    pub label: String,
    pub id: StateId,
}

impl From<&State> for StateRef {
    fn from(state: &State) -> Self {
        Self {
            label: state.label.clone(),
            id: state.id,
        }
    }
}

/// One row of the table: a source state and its destinations per symbol
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableRow {
    pub state: StateRef,
    pub initial: bool,
    pub accepting: bool,
    pub cells: BTreeMap<String, BTreeSet<StateRef>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransitionTable {
    pub symbols: Vec<String>,
    pub rows: Vec<TableRow>,
}

impl TransitionTable {
    /// Destinations reached from `state` on exactly `symbol`
    pub fn destinations(&self, state: StateId, symbol: &str) -> Option<&BTreeSet<StateRef>> {
        self.rows
            .iter()
            .find(|row| row.state.id == state)
            .and_then(|row| row.cells.get(symbol))
    }
}

/// Build the state x symbol -> destination-set table of a graph
pub fn build_table(graph: &AutomatonGraph) -> TransitionTable {
    let symbols: Vec<String> = graph.alphabet().iter().cloned().collect();

    let rows = graph
        .states()
        .into_iter()
        .map(|state| {
            let mut cells: BTreeMap<String, BTreeSet<StateRef>> = symbols
                .iter()
                .map(|symbol| (symbol.clone(), BTreeSet::new()))
                .collect();

            for transition in graph.transitions_from(state.id) {
                if let (Some(cell), Some(target)) =
                    (cells.get_mut(&transition.symbol), graph.state(transition.to))
                {
                    cell.insert(StateRef::from(target));
                }
            }

            TableRow {
                state: StateRef::from(state),
                initial: state.initial,
                accepting: state.accepting,
                cells,
            }
        })
        .collect();

    TransitionTable { symbols, rows }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_table() {
        let table = build_table(&AutomatonGraph::new("empty"));
        assert!(table.symbols.is_empty());
        assert!(table.rows.is_empty());
    }

    #[test]
    fn test_table_cells() {
        let mut graph = AutomatonGraph::new("nfa");
        let q0 = graph.add_state(0.0, 0.0).id;
        let q1 = graph.add_state(100.0, 0.0).id;
        let q2 = graph.add_state(200.0, 0.0).id;
        graph.add_transition(q0, q1, "b").unwrap();
        graph.add_transition(q0, q2, "b").unwrap();
        graph.add_transition(q0, q0, "a").unwrap();
        graph.add_transition(q1, q2, "ε").unwrap();

        let table = graph.transition_table();
        assert_eq!(table.symbols, vec!["a", "b"]);

        let labels = |id, symbol| -> Vec<String> {
            table
                .destinations(id, symbol)
                .unwrap()
                .iter()
                .map(|s| s.label.clone())
                .collect()
        };
        assert_eq!(labels(q0, "a"), vec!["q0"]);
        assert_eq!(labels(q0, "b"), vec!["q1", "q2"]);
        assert!(labels(q1, "a").is_empty());
        assert!(labels(q2, "b").is_empty());
        // epsilon moves have no column
        assert!(table.destinations(q1, "ε").is_none());
    }

    #[test]
    fn test_row_order_is_stable() {
        let mut graph = AutomatonGraph::new("order");
        for _ in 0..12 {
            graph.add_state(0.0, 0.0);
        }
        let first = build_table(&graph);
        let labels: Vec<&str> = first.rows.iter().map(|r| r.state.label.as_str()).collect();
        let mut sorted = labels.clone();
        sorted.sort();
        assert_eq!(labels, sorted);
        assert_eq!(first, build_table(&graph));
    }
}
