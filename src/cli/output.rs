//! Output formatting module
//!
//! This module handles formatting analysis reports and transition tables for
//! the different output formats.

use crate::Result;
use crate::automaton::{AnalysisReport, AutomatonGraph, StateRef, TransitionTable};
use serde::Serialize;
use std::collections::BTreeSet;

/// Output any report as pretty JSON
pub fn output_json(w: &mut impl std::io::Write, value: &impl Serialize) -> Result<()> {
    serde_json::to_writer_pretty(&mut *w, value)?;
    writeln!(w)?; // Add trailing newline
    Ok(())
}

/// Output an analysis report as text
pub fn output_report(w: &mut impl std::io::Write, report: &AnalysisReport) -> Result<()> {
    writeln!(w, "Automaton Analysis - {}", report.name)?;
    writeln!(w, "{}", "=".repeat(80))?;
    writeln!(w)?;

    writeln!(w, "Summary:")?;
    writeln!(w, "  Type:          {}", report.kind.display_name())?;
    writeln!(w, "  Deterministic: {}", yes_no(report.is_deterministic))?;
    writeln!(w, "  Complete:      {}", yes_no(report.is_complete))?;
    writeln!(w, "  States:        {}", report.states_count)?;
    writeln!(w, "  Transitions:   {}", report.transitions_count)?;
    writeln!(w, "  Alphabet:      {{{}}}", join(&report.alphabet))?;
    writeln!(
        w,
        "  Initial State: {}",
        report.initial_state.as_deref().unwrap_or("-")
    )?;
    writeln!(w, "  Accepting:     {{{}}}", join(&report.accepting_states))?;
    writeln!(w)?;

    writeln!(w, "Language:")?;
    writeln!(w, "  Regex:         {}", report.regex)?;
    writeln!(w, "  {}", report.language_description)?;

    Ok(())
}

/// Output a transition table as aligned text
///
/// Initial states are marked `->`, accepting states `*`, and empty cells `-`.
pub fn output_transition_table(
    w: &mut impl std::io::Write,
    table: &TransitionTable,
) -> Result<()> {
    let header: Vec<String> = std::iter::once("State".to_string())
        .chain(table.symbols.iter().cloned())
        .collect();

    let body: Vec<Vec<String>> = table
        .rows
        .iter()
        .map(|row| {
            let marker = match (row.initial, row.accepting) {
                (true, true) => "->*",
                (true, false) => "->",
                (false, true) => "*",
                (false, false) => "",
            };
            std::iter::once(format!("{:>3} {}", marker, row.state.label))
                .chain(
                    table
                        .symbols
                        .iter()
                        .map(|symbol| cell(row.cells.get(symbol))),
                )
                .collect()
        })
        .collect();

    let widths: Vec<usize> = (0..header.len())
        .map(|col| {
            std::iter::once(&header)
                .chain(body.iter())
                .map(|line| line[col].chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();
    let total = widths.iter().sum::<usize>() + 3 * widths.len().saturating_sub(1);

    write_line(w, &header, &widths)?;
    writeln!(w, "{:-<1$}", "", total)?;
    for line in &body {
        write_line(w, line, &widths)?;
    }

    Ok(())
}

/// Output a graph as Graphviz DOT
pub fn output_dot(w: &mut impl std::io::Write, graph: &AutomatonGraph) -> Result<()> {
    write!(w, "{}", graph.to_dot())?;
    Ok(())
}

fn write_line(w: &mut impl std::io::Write, cells: &[String], widths: &[usize]) -> Result<()> {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| {
            let pad = width.saturating_sub(cell.chars().count());
            format!("{}{}", cell, " ".repeat(pad))
        })
        .collect();
    writeln!(w, "{}", padded.join(" | ").trim_end())?;
    Ok(())
}

fn cell(destinations: Option<&BTreeSet<StateRef>>) -> String {
    match destinations {
        Some(set) if !set.is_empty() => {
            let labels: Vec<&str> = set.iter().map(|s| s.label.as_str()).collect();
            format!("{{{}}}", labels.join(", "))
        }
        _ => "-".to_string(),
    }
}

fn join(items: &BTreeSet<String>) -> String {
    items.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
}

fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automaton::analyzer;

    fn create_test_graph() -> AutomatonGraph {
        let mut graph = AutomatonGraph::new("ab*");
        let q0 = graph.add_state(0.0, 0.0).id;
        let q1 = graph.add_state(100.0, 0.0).id;
        graph
            .update_state(q0, 0.0, 0.0, Some(true), None)
            .unwrap();
        graph
            .update_state(q1, 100.0, 0.0, None, Some(true))
            .unwrap();
        graph.add_transition(q0, q1, "a").unwrap();
        graph.add_transition(q1, q1, "b").unwrap();
        graph
    }

    fn render(f: impl FnOnce(&mut Vec<u8>) -> Result<()>) -> String {
        let mut buffer = Vec::new();
        f(&mut buffer).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_output_json() {
        let report = analyzer::analyze(&create_test_graph());
        let out = render(|w| output_json(w, &report));

        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["name"], "ab*");
        assert_eq!(value["type"], "AFD (Automate Fini Déterministe)");
        assert_eq!(value["isDeterministic"], true);
        assert_eq!(value["isComplete"], false);
        assert_eq!(value["statesCount"], 2);
        assert_eq!(value["regex"], "ab*");
        assert!(out.ends_with('\n'));
    }

    #[test]
    fn test_output_report() {
        let report = analyzer::analyze(&create_test_graph());
        let out = render(|w| output_report(w, &report));

        assert!(out.contains("Automaton Analysis - ab*"));
        assert!(out.contains("Type:          AFD (Automate Fini Déterministe)"));
        assert!(out.contains("Complete:      no"));
        assert!(out.contains("Alphabet:      {a, b}"));
        assert!(out.contains("Initial State: q0"));
        assert!(out.contains("Regex:         ab*"));
    }

    #[test]
    fn test_output_transition_table() {
        let table = create_test_graph().transition_table();
        let out = render(|w| output_transition_table(w, &table));
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "State  | a    | b");
        assert_eq!(lines[2], " -> q0 | {q1} | -");
        assert_eq!(lines[3], "  * q1 | -    | {q1}");
    }

    #[test]
    fn test_output_dot() {
        let out = render(|w| output_dot(w, &create_test_graph()));
        assert!(out.starts_with("digraph"));
        assert!(out.contains("doublecircle"));
    }
}
