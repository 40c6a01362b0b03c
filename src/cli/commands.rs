//! CLI command implementations
//!
//! This module contains the implementation for each CLI command. Every command
//! loads its file into a fresh session and works through the session
//! operations, the same path an interactive front end takes.

use crate::automaton::AutomatonGraph;
use crate::session::{SessionStore, SessionToken};
use crate::{Config, Result};
use std::io::Write;
use std::path::Path;

/// Load an automaton from an `.amdl` document or a `.json` snapshot
pub fn load_automaton(path: &Path) -> Result<AutomatonGraph> {
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    if is_json {
        tracing::debug!("Reading JSON snapshot {:?}", path);
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    } else {
        tracing::debug!("Reading AMDL document {:?}", path);
        crate::amdl::load_file(path)
    }
}

/// Load `path` into a new session of `store`
fn open_session(store: &SessionStore, path: &Path, config: &Config) -> Result<SessionToken> {
    let mut graph = load_automaton(path)?;
    if graph.name().is_empty() {
        graph.set_name(config.session.default_name.as_str());
    }

    let token = store.create(Some(graph.name()));
    store.replace(&token, graph);
    Ok(token)
}

/// Analyze command implementation
pub mod analyze {
    use super::*;
    use crate::cli::{OutputFormat, output};

    /// Execute the analyze command
    pub fn execute(
        w: &mut impl Write,
        file: &Path,
        format: OutputFormat,
        clean: bool,
        config: &Config,
    ) -> Result<()> {
        tracing::info!("Analyzing automaton: {:?}", file);

        let store = SessionStore::with_default_name(config.session.default_name.as_str());
        let token = open_session(&store, file, config)?;

        if clean {
            let removed = store.clean(&token)?;
            tracing::info!("Removed {} isolated state(s)", removed);
        }

        match format {
            OutputFormat::Json => output::output_json(w, &store.analysis(&token)?)?,
            OutputFormat::Table => output::output_report(w, &store.analysis(&token)?)?,
            OutputFormat::Dot => output::output_dot(w, &store.snapshot(&token)?)?,
        }

        store.delete(&token);
        Ok(())
    }
}

/// Table command implementation
pub mod table {
    use super::*;
    use crate::cli::{OutputFormat, output};

    /// Execute the table command
    pub fn execute(
        w: &mut impl Write,
        file: &Path,
        format: OutputFormat,
        config: &Config,
    ) -> Result<()> {
        crate::ensure!(
            format != OutputFormat::Dot,
            "DOT output is only available for the analyze command"
        );
        tracing::info!("Building transition table: {:?}", file);

        let store = SessionStore::with_default_name(config.session.default_name.as_str());
        let token = open_session(&store, file, config)?;
        let table = store.transition_table(&token)?;

        match format {
            OutputFormat::Json => output::output_json(w, &table)?,
            _ => output::output_transition_table(w, &table)?,
        }

        store.delete(&token);
        Ok(())
    }
}

/// Validate command implementation
pub mod validate {
    use super::*;

    /// Execute the validate command
    pub fn execute(w: &mut impl Write, file: &Path) -> Result<()> {
        tracing::info!("Validating automaton: {:?}", file);

        let graph = match load_automaton(file) {
            Ok(graph) => graph,
            Err(e) => {
                writeln!(w, "❌ Failed to load automaton: {}", e)?;
                return Err(e);
            }
        };

        let mut warnings = Vec::new();
        if graph.initial_states().is_empty() {
            warnings.push("No initial state");
        }
        if graph.initial_states().len() > 1 {
            warnings.push("More than one initial state");
        }
        if graph.accepting_states().is_empty() {
            warnings.push("No accepting state");
        }

        writeln!(w, "📋 Automaton Validation Report")?;
        writeln!(w, "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━")?;
        writeln!(w, "File: {:?}", file)?;
        writeln!(w, "Name: {}", graph.name())?;
        writeln!(w, "States: {}", graph.state_count())?;
        writeln!(w, "Transitions: {}", graph.transition_count())?;
        writeln!(w)?;

        if !warnings.is_empty() {
            writeln!(w, "⚠️  Warnings:")?;
            for warning in &warnings {
                writeln!(w, "   {}", warning)?;
            }
            writeln!(w)?;
        }

        writeln!(w, "✅ Automaton is valid!")?;
        Ok(())
    }
}
