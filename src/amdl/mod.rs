//! AMDL module - Text format for describing automata
//!
//! ```text
//! automaton "Even a's" {
//!   alphabet: a
//!   state q0 { initial: true accepting: true }
//!   state q1 {}
//!   q0 - a -> q1
//!   q1 - a -> q0
//! }
//! ```

use crate::automaton::{AutomatonGraph, StateId};
use crate::{Error, Result};
use std::collections::HashMap;
use std::path::Path;

pub mod lexer;
pub mod parser;

pub use parser::{AutomatonNode, StateNode, TransitionNode, parse};

/// Build a graph from a parsed document
///
/// States without a position are laid out on a row, 150 units apart.
pub fn build(ast: &AutomatonNode) -> Result<AutomatonGraph> {
    let mut graph = AutomatonGraph::new(&ast.name);
    let mut ids: HashMap<&str, StateId> = HashMap::new();

    for (index, node) in ast.states.iter().enumerate() {
        if ids.contains_key(node.id.as_str()) {
            return Err(Error::amdl(
                format!("State '{}' declared twice", node.id),
                node.line,
                node.column,
            ));
        }

        let (x, y) = node
            .position
            .unwrap_or((100.0 + index as f64 * 150.0, 200.0));
        let label = node.label.as_deref().unwrap_or(&node.id);
        let id = graph.add_labeled_state(label, x, y).id;
        graph.set_flags(id, node.initial, node.accepting)?;
        ids.insert(node.id.as_str(), id);
    }

    for node in &ast.transitions {
        let resolve = |name: &str| {
            ids.get(name).copied().ok_or_else(|| {
                Error::amdl(format!("State '{}' not found", name), node.line, node.column)
            })
        };
        let from = resolve(&node.from)?;
        let to = resolve(&node.to)?;
        for symbol in &node.symbols {
            graph.add_transition(from, to, symbol.as_str())?;
        }
    }

    let unused: Vec<&str> = ast
        .alphabet
        .iter()
        .filter(|symbol| !graph.alphabet().contains(*symbol))
        .map(String::as_str)
        .collect();
    if !unused.is_empty() {
        tracing::warn!(
            "Declared alphabet symbols not used by any transition: {}",
            unused.join(", ")
        );
    }

    tracing::debug!(
        "Built automaton {:?} with {} states and {} transitions",
        ast.name,
        graph.state_count(),
        graph.transition_count()
    );
    Ok(graph)
}

/// Parse and build in one step
pub fn load(source: &str) -> Result<AutomatonGraph> {
    build(&parse(source)?)
}

pub fn load_file(path: impl AsRef<Path>) -> Result<AutomatonGraph> {
    let source = std::fs::read_to_string(path)?;
    load(&source)
}
