//! Approximate regular expression of an automaton
//!
//! This is a heuristic, not a state-elimination reduction. A fixed chain of
//! shape matchers runs in order and the first one that recognizes the graph
//! wins; anything no matcher recognizes gets a textual description of its
//! alphabet instead of a regular expression.

use super::analyzer::join;
use super::{AutomatonGraph, State};
use std::collections::{BTreeSet, HashSet};
use std::fmt;

/// Why a graph denotes the empty language
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyReason {
    NoStates,
    NoInitialState,
    NoAcceptingState,
}

/// Recognized structure of a graph, rendered with `Display`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegexShape {
    /// The empty language
    Empty(EmptyReason),

    /// Single initial and accepting state without loops: only the empty word
    EmptyWord,

    /// Single initial and accepting state looping on these symbols
    Star(BTreeSet<String>),

    /// Chain of single transitions ending in an accepting state, which may
    /// loop on `loops`
    Path {
        prefix: String,
        loops: BTreeSet<String>,
    },

    /// Fallback, not a valid regular expression
    Description {
        alphabet: BTreeSet<String>,
        starred: bool,
    },
}

impl fmt::Display for RegexShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegexShape::Empty(EmptyReason::NoStates) => write!(f, "∅"),
            RegexShape::Empty(EmptyReason::NoInitialState) => {
                write!(f, "∅ (pas d'état initial)")
            }
            RegexShape::Empty(EmptyReason::NoAcceptingState) => {
                write!(f, "∅ (aucun état acceptant)")
            }
            RegexShape::EmptyWord => write!(f, "ε"),
            RegexShape::Star(symbols) => write!(f, "{}*", union(symbols)),
            RegexShape::Path { prefix, loops } => {
                write!(f, "{}", prefix)?;
                if !loops.is_empty() {
                    write!(f, "{}*", union(loops))?;
                }
                Ok(())
            }
            RegexShape::Description { alphabet, starred } => {
                match alphabet.len() {
                    0 => write!(f, "ε")?,
                    1 => {
                        let symbol = alphabet.iter().next().map(String::as_str).unwrap_or("");
                        write!(f, "(langage sur '{}')", symbol)?;
                    }
                    _ => write!(f, "(langage sur {{{}}})", join(alphabet))?,
                }
                if *starred {
                    write!(f, "*")?;
                }
                Ok(())
            }
        }
    }
}

/// `a` for a single symbol, `(a+b)` otherwise
fn union(symbols: &BTreeSet<String>) -> String {
    if symbols.len() == 1 {
        symbols.iter().next().cloned().unwrap_or_default()
    } else {
        format!(
            "({})",
            symbols.iter().map(String::as_str).collect::<Vec<_>>().join("+")
        )
    }
}

type Matcher = fn(&AutomatonGraph) -> Option<RegexShape>;

/// Matchers in priority order
const MATCHERS: [(&str, Matcher); 3] = [
    ("empty", match_empty),
    ("single_state", match_single_state),
    ("linear_path", match_linear_path),
];

/// Classify a graph into the first shape whose matcher accepts it
pub fn classify(graph: &AutomatonGraph) -> RegexShape {
    MATCHERS
        .iter()
        .find_map(|(name, matcher)| {
            let shape = matcher(graph)?;
            tracing::trace!("Regex shape matched by {}", name);
            Some(shape)
        })
        .unwrap_or_else(|| describe(graph))
}

/// Approximate regular expression for a graph
pub fn synthesize(graph: &AutomatonGraph) -> String {
    classify(graph).to_string()
}

fn match_empty(graph: &AutomatonGraph) -> Option<RegexShape> {
    let reason = if graph.is_empty() {
        EmptyReason::NoStates
    } else if graph.initial_state().is_none() {
        EmptyReason::NoInitialState
    } else if graph.accepting_states().is_empty() {
        EmptyReason::NoAcceptingState
    } else {
        return None;
    };
    Some(RegexShape::Empty(reason))
}

fn match_single_state(graph: &AutomatonGraph) -> Option<RegexShape> {
    let initial = graph.initial_state()?;
    if graph.state_count() != 1 || !initial.accepting {
        return None;
    }

    let loops = self_loop_symbols(graph, initial);
    if loops.is_empty() {
        Some(RegexShape::EmptyWord)
    } else {
        Some(RegexShape::Star(loops))
    }
}

fn match_linear_path(graph: &AutomatonGraph) -> Option<RegexShape> {
    let mut current = graph.initial_state()?;
    let mut visited = HashSet::new();
    let mut prefix = String::new();

    while !current.accepting {
        if !visited.insert(current.id) {
            return None;
        }

        let outgoing = graph.transitions_from(current.id);
        let [next] = outgoing.as_slice() else {
            return None;
        };
        if next.is_self_loop() {
            return None;
        }

        prefix.push_str(&next.symbol);
        current = graph.state(next.to)?;
    }

    Some(RegexShape::Path {
        prefix,
        loops: self_loop_symbols(graph, current),
    })
}

fn describe(graph: &AutomatonGraph) -> RegexShape {
    RegexShape::Description {
        alphabet: graph.alphabet().clone(),
        starred: graph.transitions().iter().any(|t| t.is_self_loop()),
    }
}

fn self_loop_symbols(graph: &AutomatonGraph, state: &State) -> BTreeSet<String> {
    graph
        .transitions_from(state.id)
        .into_iter()
        .filter(|t| t.is_self_loop())
        .map(|t| t.symbol.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automaton::StateId;

    fn with_states(n: usize) -> (AutomatonGraph, Vec<StateId>) {
        let mut graph = AutomatonGraph::new("test");
        let ids = (0..n)
            .map(|i| graph.add_state(i as f64 * 100.0, 0.0).id)
            .collect();
        (graph, ids)
    }

    #[test]
    fn test_empty_language_markers() {
        let mut graph = AutomatonGraph::new("test");
        assert_eq!(synthesize(&graph), "∅");

        let q0 = graph.add_state(0.0, 0.0).id;
        assert_eq!(synthesize(&graph), "∅ (pas d'état initial)");

        graph.set_flags(q0, true, false).unwrap();
        assert_eq!(classify(&graph), RegexShape::Empty(EmptyReason::NoAcceptingState));
        assert_eq!(synthesize(&graph), "∅ (aucun état acceptant)");
    }

    #[test]
    fn test_single_state_without_loop() {
        let (mut graph, s) = with_states(1);
        graph.set_flags(s[0], true, true).unwrap();
        assert_eq!(classify(&graph), RegexShape::EmptyWord);
        assert_eq!(synthesize(&graph), "ε");
    }

    #[test]
    fn test_single_state_loops() {
        let (mut graph, s) = with_states(1);
        graph.set_flags(s[0], true, true).unwrap();
        graph.add_transition(s[0], s[0], "a").unwrap();
        assert_eq!(synthesize(&graph), "a*");

        graph.add_transition(s[0], s[0], "c").unwrap();
        graph.add_transition(s[0], s[0], "b").unwrap();
        assert_eq!(synthesize(&graph), "(a+b+c)*");
    }

    #[test]
    fn test_linear_path() {
        let (mut graph, s) = with_states(2);
        graph.set_flags(s[0], true, false).unwrap();
        graph.set_flags(s[1], false, true).unwrap();
        graph.add_transition(s[0], s[1], "a").unwrap();
        assert_eq!(synthesize(&graph), "a");

        graph.add_transition(s[1], s[1], "b").unwrap();
        assert_eq!(synthesize(&graph), "ab*");

        graph.add_transition(s[1], s[1], "c").unwrap();
        assert_eq!(synthesize(&graph), "a(b+c)*");
    }

    #[test]
    fn test_accepting_initial_state_gives_empty_prefix() {
        let (mut graph, s) = with_states(2);
        graph.set_flags(s[0], true, true).unwrap();
        graph.add_transition(s[0], s[0], "a").unwrap();
        graph.add_transition(s[0], s[1], "b").unwrap();
        assert_eq!(
            classify(&graph),
            RegexShape::Path {
                prefix: String::new(),
                loops: ["a".to_string()].into_iter().collect(),
            }
        );
        assert_eq!(synthesize(&graph), "a*");
    }

    #[test]
    fn test_longer_path_stops_at_first_accepting() {
        let (mut graph, s) = with_states(4);
        graph.set_flags(s[0], true, false).unwrap();
        graph.set_flags(s[2], false, true).unwrap();
        graph.add_transition(s[0], s[1], "a").unwrap();
        graph.add_transition(s[1], s[2], "b").unwrap();
        // Transitions after the accepting state do not matter
        graph.add_transition(s[2], s[3], "c").unwrap();
        assert_eq!(synthesize(&graph), "ab");
    }

    #[test]
    fn test_branching_falls_back_to_description() {
        let (mut graph, s) = with_states(3);
        graph.set_flags(s[0], true, false).unwrap();
        graph.set_flags(s[2], false, true).unwrap();
        graph.add_transition(s[0], s[1], "a").unwrap();
        graph.add_transition(s[0], s[2], "b").unwrap();
        assert_eq!(
            classify(&graph),
            RegexShape::Description {
                alphabet: ["a", "b"].iter().map(|s| s.to_string()).collect(),
                starred: false,
            }
        );
        assert_eq!(synthesize(&graph), "(langage sur {a, b})");

        graph.add_transition(s[1], s[1], "a").unwrap();
        assert_eq!(synthesize(&graph), "(langage sur {a, b})*");
    }

    #[test]
    fn test_cycle_falls_back_to_description() {
        let (mut graph, s) = with_states(3);
        graph.set_flags(s[0], true, false).unwrap();
        graph.set_flags(s[2], false, true).unwrap();
        graph.add_transition(s[0], s[1], "a").unwrap();
        graph.add_transition(s[1], s[0], "a").unwrap();
        assert_eq!(synthesize(&graph), "(langage sur 'a')");
    }

    #[test]
    fn test_loop_on_intermediate_state_aborts_path() {
        let (mut graph, s) = with_states(2);
        graph.set_flags(s[0], true, false).unwrap();
        graph.set_flags(s[1], false, true).unwrap();
        graph.add_transition(s[0], s[0], "x").unwrap();
        assert_eq!(synthesize(&graph), "(langage sur 'x')*");
    }

    #[test]
    fn test_description_without_alphabet() {
        let (mut graph, s) = with_states(3);
        graph.set_flags(s[0], true, false).unwrap();
        graph.set_flags(s[2], false, true).unwrap();
        graph.add_transition(s[0], s[1], "ε").unwrap();
        graph.add_transition(s[0], s[2], "ε").unwrap();
        assert_eq!(synthesize(&graph), "ε");
    }
}
