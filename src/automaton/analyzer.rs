//! Automaton analyzer
//!
//! Derives determinism, completeness and a best-effort language summary from
//! the current state of a graph. Nothing is cached: every call reads the graph
//! as it is.

use super::{AutomatonGraph, regex};
use serde::Serialize;
use std::collections::{BTreeSet, HashSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(into = "String")]
pub enum AutomatonKind {
    /// Deterministic finite automaton
    Afd,
    /// Nondeterministic finite automaton
    Afn,
}

impl AutomatonKind {
    pub fn from_determinism(deterministic: bool) -> Self {
        if deterministic {
            AutomatonKind::Afd
        } else {
            AutomatonKind::Afn
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            AutomatonKind::Afd => "AFD (Automate Fini Déterministe)",
            AutomatonKind::Afn => "AFN (Automate Fini Non-Déterministe)",
        }
    }
}

impl From<AutomatonKind> for String {
    fn from(kind: AutomatonKind) -> Self {
        kind.display_name().to_string()
    }
}

/// Analysis report of one automaton
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: AutomatonKind,
    pub is_deterministic: bool,
    pub is_complete: bool,
    pub states_count: usize,
    pub transitions_count: usize,
    pub alphabet: BTreeSet<String>,
    pub initial_state: Option<String>,
    pub accepting_states: BTreeSet<String>,
    pub regex: String,
    pub language_description: String,
}

/// Analyze a graph and collect every derived fact into a report
pub fn analyze(graph: &AutomatonGraph) -> AnalysisReport {
    let is_deterministic = is_deterministic(graph);

    AnalysisReport {
        name: graph.name().to_string(),
        kind: AutomatonKind::from_determinism(is_deterministic),
        is_deterministic,
        is_complete: is_complete(graph),
        states_count: graph.state_count(),
        transitions_count: graph.transition_count(),
        alphabet: graph.alphabet().clone(),
        initial_state: graph.initial_state().map(|s| s.label.clone()),
        accepting_states: graph
            .accepting_states()
            .into_iter()
            .map(|s| s.label.clone())
            .collect(),
        regex: regex::synthesize(graph),
        language_description: language_description(graph),
    }
}

/// Exactly one initial state, no epsilon moves, no symbol repeated on the
/// outgoing transitions of any state. An empty graph is deterministic.
pub fn is_deterministic(graph: &AutomatonGraph) -> bool {
    if graph.is_empty() {
        return true;
    }

    if graph.initial_states().len() != 1 {
        return false;
    }

    if graph.transitions().iter().any(|t| t.is_epsilon()) {
        return false;
    }

    graph.states().iter().all(|state| {
        let outgoing = graph.transitions_from(state.id);
        let distinct: HashSet<&str> = outgoing.iter().map(|t| t.symbol.as_str()).collect();
        distinct.len() == outgoing.len()
    })
}

/// Deterministic, non-empty alphabet, and every state has a move on every symbol
pub fn is_complete(graph: &AutomatonGraph) -> bool {
    if !is_deterministic(graph) || graph.alphabet().is_empty() {
        return false;
    }

    graph.states().iter().all(|state| {
        let symbols: HashSet<&str> = graph
            .transitions_from(state.id)
            .iter()
            .map(|t| t.symbol.as_str())
            .collect();
        graph
            .alphabet()
            .iter()
            .all(|symbol| symbols.contains(symbol.as_str()))
    })
}

/// Textual summary of the recognized language, not an exact characterization
pub fn language_description(graph: &AutomatonGraph) -> String {
    if graph.is_empty() {
        return "Langage vide (∅)".to_string();
    }

    if graph.initial_state().is_none() {
        return "Pas d'état initial défini".to_string();
    }

    if graph.accepting_states().is_empty() {
        return "Langage vide (aucun état acceptant)".to_string();
    }

    let alphabet = if graph.alphabet().is_empty() {
        "∅".to_string()
    } else {
        format!("{{{}}}", join(graph.alphabet()))
    };
    format!("L(A) = {{ mots sur {} reconnus par cet automate }}", alphabet)
}

pub(crate) fn join(symbols: &BTreeSet<String>) -> String {
    symbols.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automaton::StateId;

    fn two_states() -> (AutomatonGraph, StateId, StateId) {
        let mut graph = AutomatonGraph::new("test");
        let q0 = graph.add_state(0.0, 0.0).id;
        let q1 = graph.add_state(100.0, 0.0).id;
        graph.set_flags(q0, true, false).unwrap();
        graph.set_flags(q1, false, true).unwrap();
        (graph, q0, q1)
    }

    #[test]
    fn test_empty_graph_is_deterministic() {
        let graph = AutomatonGraph::new("empty");
        assert!(is_deterministic(&graph));
        assert!(!is_complete(&graph));
        assert_eq!(language_description(&graph), "Langage vide (∅)");
    }

    #[test]
    fn test_initial_state_count() {
        let (mut graph, q0, q1) = two_states();
        assert!(is_deterministic(&graph));

        graph.set_flags(q1, true, true).unwrap();
        assert!(!is_deterministic(&graph));

        graph.set_flags(q0, false, false).unwrap();
        graph.set_flags(q1, false, true).unwrap();
        assert!(!is_deterministic(&graph));
    }

    #[test]
    fn test_epsilon_breaks_determinism() {
        let (mut graph, q0, q1) = two_states();
        graph.add_transition(q0, q1, "epsilon").unwrap();
        assert!(!is_deterministic(&graph));
        assert_eq!(analyze(&graph).kind, AutomatonKind::Afn);
    }

    #[test]
    fn test_duplicate_symbol_breaks_determinism() {
        let (mut graph, q0, q1) = two_states();
        graph.add_transition(q0, q1, "a").unwrap();
        assert!(is_deterministic(&graph));
        graph.add_transition(q0, q0, "a").unwrap();
        assert!(!is_deterministic(&graph));
    }

    #[test]
    fn test_completeness() {
        let (mut graph, q0, q1) = two_states();
        graph.add_transition(q0, q1, "a").unwrap();
        graph.add_transition(q0, q0, "b").unwrap();
        graph.add_transition(q1, q1, "a").unwrap();
        assert!(is_deterministic(&graph));
        assert!(!is_complete(&graph));

        graph.add_transition(q1, q0, "b").unwrap();
        assert!(is_complete(&graph));
    }

    #[test]
    fn test_no_alphabet_is_not_complete() {
        let (graph, _, _) = two_states();
        assert!(is_deterministic(&graph));
        assert!(!is_complete(&graph));
    }

    #[test]
    fn test_language_description() {
        let mut graph = AutomatonGraph::new("test");
        let q0 = graph.add_state(0.0, 0.0).id;
        assert_eq!(language_description(&graph), "Pas d'état initial défini");

        graph.set_flags(q0, true, false).unwrap();
        assert_eq!(
            language_description(&graph),
            "Langage vide (aucun état acceptant)"
        );

        graph.set_flags(q0, true, true).unwrap();
        assert_eq!(
            language_description(&graph),
            "L(A) = { mots sur ∅ reconnus par cet automate }"
        );

        graph.add_transition(q0, q0, "b").unwrap();
        graph.add_transition(q0, q0, "a").unwrap();
        assert_eq!(
            language_description(&graph),
            "L(A) = { mots sur {a, b} reconnus par cet automate }"
        );
    }

    #[test]
    fn test_analyze_report() {
        let (mut graph, q0, q1) = two_states();
        graph.add_transition(q0, q1, "a").unwrap();

        let report = analyze(&graph);
        assert_eq!(report.name, "test");
        assert_eq!(report.kind, AutomatonKind::Afd);
        assert!(report.is_deterministic);
        assert!(!report.is_complete);
        assert_eq!(report.states_count, 2);
        assert_eq!(report.transitions_count, 1);
        assert_eq!(report.initial_state.as_deref(), Some("q0"));
        assert!(report.accepting_states.contains("q1"));
        assert_eq!(report.regex, "a");

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["type"], "AFD (Automate Fini Déterministe)");
        assert_eq!(json["isDeterministic"], true);
        assert_eq!(json["statesCount"], 2);
        assert_eq!(json["initialState"], "q0");
    }
}
