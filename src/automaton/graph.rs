use crate::automaton::table::{self, TransitionTable};
use crate::automaton::{State, StateId, Transition, TransitionId};
use crate::{Error, Result};
use petgraph::Direction;
use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableGraph};
use std::collections::{BTreeSet, HashMap, HashSet};

/// Name given to graphs built without an explicit one
pub const DEFAULT_NAME: &str = "Automate";

/// A finite-state automaton under construction.
///
/// States and transitions live in a `StableGraph` arena so that removing one
/// entity never shifts the indices of the others. Public identities
/// ([`StateId`], [`TransitionId`]) are resolved to arena indices through the
/// two lookup tables, which stay in sync with the arena on every mutation.
#[derive(Debug, Clone)]
pub struct AutomatonGraph {
    /// Nodes are states, edges are the labelled transitions between them.
    graph: StableGraph<State, Transition>,

    /// Lookup from state identity to its arena slot.
    state_index: HashMap<StateId, NodeIndex>,

    /// Lookup from transition identity to its arena slot.
    transition_index: HashMap<TransitionId, EdgeIndex>,

    /// Distinct non-epsilon symbols carried by the current transitions.
    alphabet: BTreeSet<String>,

    name: String,
}

impl Default for AutomatonGraph {
    fn default() -> Self {
        Self::new(DEFAULT_NAME)
    }
}

impl AutomatonGraph {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            graph: StableGraph::new(),
            state_index: HashMap::new(),
            transition_index: HashMap::new(),
            alphabet: BTreeSet::new(),
            name: name.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Adds a state at the given position with an auto-generated label.
    pub fn add_state(&mut self, x: f64, y: f64) -> &State {
        let label = self.generate_state_label();
        self.insert_state(State::new(label, x, y))
    }

    /// Adds a state carrying a caller-chosen label, as importers need.
    pub fn add_labeled_state(&mut self, label: impl Into<String>, x: f64, y: f64) -> &State {
        self.insert_state(State::new(label, x, y))
    }

    fn insert_state(&mut self, state: State) -> &State {
        let id = state.id;
        tracing::debug!("Adding state {} ({})", state.label, id);
        let node_index = self.graph.add_node(state);
        self.state_index.insert(id, node_index);
        &self.graph[node_index]
    }

    /// Removes a state together with every transition touching it.
    ///
    /// Returns `None` when the state is not part of this graph.
    pub fn remove_state(&mut self, id: StateId) -> Option<State> {
        let node_index = self.state_index.remove(&id)?;

        let incident: HashSet<TransitionId> = self
            .graph
            .edges_directed(node_index, Direction::Outgoing)
            .chain(self.graph.edges_directed(node_index, Direction::Incoming))
            .map(|edge| edge.weight().id)
            .collect();
        for transition_id in &incident {
            self.transition_index.remove(transition_id);
        }

        // Incident edges go with the node
        let removed = self.graph.remove_node(node_index);
        self.recompute_alphabet();

        tracing::debug!(
            "Removed state {} and {} incident transition(s)",
            id,
            incident.len()
        );
        removed
    }

    /// Moves a state and optionally changes its flags.
    ///
    /// Setting `initial` to `true` first clears the flag on every state, so
    /// the updated state is the only one this call marks initial.
    pub fn update_state(
        &mut self,
        id: StateId,
        x: f64,
        y: f64,
        initial: Option<bool>,
        accepting: Option<bool>,
    ) -> Result<&State> {
        let node_index = *self
            .state_index
            .get(&id)
            .ok_or_else(|| Error::state_not_found(id))?;

        if initial == Some(true) {
            for state in self.graph.node_weights_mut() {
                state.initial = false;
            }
        }

        let state = &mut self.graph[node_index];
        state.x = x;
        state.y = y;
        if let Some(initial) = initial {
            state.initial = initial;
        }
        if let Some(accepting) = accepting {
            state.accepting = accepting;
        }
        Ok(&self.graph[node_index])
    }

    /// Sets the flags verbatim, without touching other states.
    pub(crate) fn set_flags(&mut self, id: StateId, initial: bool, accepting: bool) -> Result<()> {
        let node_index = *self
            .state_index
            .get(&id)
            .ok_or_else(|| Error::state_not_found(id))?;
        let state = &mut self.graph[node_index];
        state.initial = initial;
        state.accepting = accepting;
        Ok(())
    }

    /// Adds a transition between two states of this graph.
    pub fn add_transition(
        &mut self,
        from: StateId,
        to: StateId,
        symbol: impl Into<String>,
    ) -> Result<&Transition> {
        let from_index = *self
            .state_index
            .get(&from)
            .ok_or(Error::InvalidReference(from))?;
        let to_index = *self
            .state_index
            .get(&to)
            .ok_or(Error::InvalidReference(to))?;

        let transition = Transition::new(from, to, symbol);
        if !transition.is_epsilon() && !self.alphabet.contains(&transition.symbol) {
            self.alphabet.insert(transition.symbol.clone());
        }

        tracing::debug!(
            "Adding transition {} -> {} on {:?}",
            from,
            to,
            transition.symbol
        );
        let id = transition.id;
        let edge_index = self.graph.add_edge(from_index, to_index, transition);
        self.transition_index.insert(id, edge_index);
        Ok(&self.graph[edge_index])
    }

    /// Removes a transition, returning `None` when it is not part of this graph.
    pub fn remove_transition(&mut self, id: TransitionId) -> Option<Transition> {
        let edge_index = self.transition_index.remove(&id)?;
        let removed = self.graph.remove_edge(edge_index);
        self.recompute_alphabet();
        tracing::debug!("Removed transition {}", id);
        removed
    }

    fn recompute_alphabet(&mut self) {
        self.alphabet = self
            .graph
            .edge_weights()
            .filter(|t| !t.is_epsilon())
            .map(|t| t.symbol.clone())
            .collect();
    }

    /// Get a state by its ID
    pub fn state(&self, id: StateId) -> Option<&State> {
        self.state_index
            .get(&id)
            .and_then(|&idx| self.graph.node_weight(idx))
    }

    pub fn contains_state(&self, id: StateId) -> bool {
        self.state_index.contains_key(&id)
    }

    /// Get a transition by its ID
    pub fn transition(&self, id: TransitionId) -> Option<&Transition> {
        self.transition_index
            .get(&id)
            .and_then(|&idx| self.graph.edge_weight(idx))
    }

    /// All states, ordered by label then id
    pub fn states(&self) -> Vec<&State> {
        let mut states: Vec<&State> = self.graph.node_weights().collect();
        states.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
        states
    }

    /// All transitions in creation order
    pub fn transitions(&self) -> Vec<&Transition> {
        let mut transitions: Vec<&Transition> = self.graph.edge_weights().collect();
        transitions.sort_by_key(|t| t.id);
        transitions
    }

    pub fn state_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn transition_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Distinct non-epsilon symbols, in lexicographic order
    pub fn alphabet(&self) -> &BTreeSet<String> {
        &self.alphabet
    }

    /// Get outgoing transitions from a state
    pub fn transitions_from(&self, id: StateId) -> Vec<&Transition> {
        self.transitions_directed(id, Direction::Outgoing)
    }

    /// Get incoming transitions to a state
    pub fn transitions_to(&self, id: StateId) -> Vec<&Transition> {
        self.transitions_directed(id, Direction::Incoming)
    }

    fn transitions_directed(&self, id: StateId, direction: Direction) -> Vec<&Transition> {
        let Some(&node_index) = self.state_index.get(&id) else {
            return Vec::new();
        };
        let mut transitions: Vec<&Transition> = self
            .graph
            .edges_directed(node_index, direction)
            .map(|edge| edge.weight())
            .collect();
        transitions.sort_by_key(|t| t.id);
        transitions
    }

    /// Every state flagged initial, ordered by label then id
    pub fn initial_states(&self) -> Vec<&State> {
        self.states().into_iter().filter(|s| s.initial).collect()
    }

    /// The initial state, or the first one by label when several are flagged
    pub fn initial_state(&self) -> Option<&State> {
        self.initial_states().into_iter().next()
    }

    pub fn accepting_states(&self) -> Vec<&State> {
        self.states().into_iter().filter(|s| s.accepting).collect()
    }

    /// Hit-test: the state whose circle contains the point.
    ///
    /// Overlapping circles resolve to the lowest state id.
    pub fn state_at(&self, x: f64, y: f64) -> Option<&State> {
        self.graph
            .node_weights()
            .filter(|s| s.contains(x, y))
            .min_by_key(|s| s.id)
    }

    /// Smallest `q<n>` label not carried by any state
    pub fn generate_state_label(&self) -> String {
        let used: HashSet<&str> = self.graph.node_weights().map(|s| s.label.as_str()).collect();
        (0usize..)
            .map(|n| format!("q{}", n))
            .find(|label| !used.contains(label.as_str()))
            .unwrap_or_default()
    }

    /// State x symbol -> destinations table
    pub fn transition_table(&self) -> TransitionTable {
        table::build_table(self)
    }

    /// Removes every non-initial state without any incident transition.
    ///
    /// Returns the number of removed states.
    pub fn clean(&mut self) -> usize {
        let isolated: Vec<StateId> = self
            .graph
            .node_indices()
            .filter(|&idx| self.graph.neighbors_undirected(idx).next().is_none())
            .filter_map(|idx| self.graph.node_weight(idx))
            .filter(|s| !s.initial)
            .map(|s| s.id)
            .collect();

        for id in &isolated {
            self.remove_state(*id);
        }
        tracing::debug!("Cleaned {} isolated state(s)", isolated.len());
        isolated.len()
    }

    /// Export to DOT format for Graphviz
    pub fn to_dot(&self) -> String {
        let mut dot = "digraph Automaton {\n".to_string();
        dot.push_str("  rankdir=LR;\n");
        dot.push_str(&format!("  label=\"{}\";\n", escape_dot(&self.name)));
        dot.push_str("  node [shape=circle];\n\n");

        for state in self.states() {
            let shape = if state.accepting {
                "doublecircle"
            } else {
                "circle"
            };
            dot.push_str(&format!(
                "  \"{}\" [label=\"{}\", shape={}];\n",
                state.id,
                escape_dot(&state.label),
                shape
            ));
        }

        let initial = self.initial_states();
        if !initial.is_empty() {
            dot.push('\n');
        }
        for state in initial {
            dot.push_str(&format!(
                "  \"start_{id}\" [shape=point, style=invis];\n  \"start_{id}\" -> \"{id}\";\n",
                id = state.id
            ));
        }

        dot.push('\n');

        for transition in self.transitions() {
            dot.push_str(&format!(
                "  \"{}\" -> \"{}\" [label=\"{}\"];\n",
                transition.from,
                transition.to,
                escape_dot(transition.display_label())
            ));
        }

        dot.push_str("}\n");
        dot
    }
}

fn escape_dot(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}
