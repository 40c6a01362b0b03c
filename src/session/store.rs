//! Session registry
//!
//! Maps opaque session tokens to one automaton each. The map itself is behind
//! a `RwLock`, and every graph sits behind its own `Mutex`, so work on
//! unrelated sessions never contends on a graph lock while two calls against
//! the same session are serialized for the duration of one operation.
//!
//! Sessions live until deleted or until the process exits; there is no
//! eviction and no capacity bound.

use crate::automaton::AutomatonGraph;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt;
use std::sync::{Arc, LazyLock, Mutex, MutexGuard, PoisonError, RwLock};

/// Name of sessions created without one
pub const DEFAULT_SESSION_NAME: &str = "Mon Automate";

/// Opaque session identifier handed out by [`SessionStore::create`]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(String);

impl SessionToken {
    fn generate() -> Self {
        Self(format!(
            "{:016x}{:016x}",
            rand::random::<u64>(),
            rand::random::<u64>()
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SessionToken {
    fn from(token: &str) -> Self {
        Self(token.to_string())
    }
}

impl From<String> for SessionToken {
    fn from(token: String) -> Self {
        Self(token)
    }
}

/// Graph handle shared between the store and in-flight operations
pub type SharedGraph = Arc<Mutex<AutomatonGraph>>;

static GLOBAL: LazyLock<SessionStore> = LazyLock::new(SessionStore::new);

pub struct SessionStore {
    sessions: RwLock<HashMap<SessionToken, SharedGraph>>,
    default_name: String,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::with_default_name(DEFAULT_SESSION_NAME)
    }

    pub fn with_default_name(default_name: impl Into<String>) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            default_name: default_name.into(),
        }
    }

    /// Process-wide store, created on first use and dropped at exit
    pub fn global() -> &'static SessionStore {
        &GLOBAL
    }

    /// Register a fresh empty graph and return its token
    pub fn create(&self, name: Option<&str>) -> SessionToken {
        let name = name.unwrap_or(self.default_name.as_str());
        let mut sessions = self.write_sessions();
        loop {
            let token = SessionToken::generate();
            if let Entry::Vacant(entry) = sessions.entry(token.clone()) {
                entry.insert(Arc::new(Mutex::new(AutomatonGraph::new(name))));
                tracing::info!("Created session {} ({})", token, name);
                return token;
            }
        }
    }

    /// Handle to the graph registered for `token`, if any
    pub fn get(&self, token: &SessionToken) -> Option<SharedGraph> {
        self.read_sessions().get(token).cloned()
    }

    /// Copy of the graph registered for `token`
    pub fn snapshot(&self, token: &SessionToken) -> Result<AutomatonGraph> {
        self.with_graph(token, |graph| Ok(graph.clone()))
    }

    /// Overwrite whatever is registered for `token`; last writer wins
    pub fn replace(&self, token: &SessionToken, graph: AutomatonGraph) {
        tracing::info!(
            "Replacing session {} with {:?} ({} states)",
            token,
            graph.name(),
            graph.state_count()
        );
        self.write_sessions()
            .insert(token.clone(), Arc::new(Mutex::new(graph)));
    }

    /// Drop the session; unknown tokens are ignored
    pub fn delete(&self, token: &SessionToken) -> bool {
        let removed = self.write_sessions().remove(token).is_some();
        if removed {
            tracing::info!("Deleted session {}", token);
        }
        removed
    }

    pub fn contains(&self, token: &SessionToken) -> bool {
        self.read_sessions().contains_key(token)
    }

    pub fn len(&self) -> usize {
        self.read_sessions().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Run `f` with exclusive access to the session's graph
    pub fn with_graph<T>(
        &self,
        token: &SessionToken,
        f: impl FnOnce(&mut AutomatonGraph) -> Result<T>,
    ) -> Result<T> {
        let shared = self
            .get(token)
            .ok_or_else(|| Error::SessionNotFound(token.clone()))?;
        let mut graph = lock_graph(&shared);
        f(&mut *graph)
    }

    fn read_sessions(
        &self,
    ) -> std::sync::RwLockReadGuard<'_, HashMap<SessionToken, SharedGraph>> {
        self.sessions.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_sessions(
        &self,
    ) -> std::sync::RwLockWriteGuard<'_, HashMap<SessionToken, SharedGraph>> {
        self.sessions.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Lock a graph; a panic in an earlier holder does not make the graph unusable
pub fn lock_graph(shared: &SharedGraph) -> MutexGuard<'_, AutomatonGraph> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_create_and_get() {
        let store = SessionStore::new();
        let named = store.create(Some("Parity"));
        let unnamed = store.create(None);

        assert_ne!(named, unnamed);
        assert_eq!(named.as_str().len(), 32);
        assert_eq!(store.len(), 2);
        assert_eq!(store.snapshot(&named).unwrap().name(), "Parity");
        assert_eq!(
            store.snapshot(&unnamed).unwrap().name(),
            DEFAULT_SESSION_NAME
        );
    }

    #[test]
    fn test_configured_default_name() {
        let store = SessionStore::with_default_name("Scratch");
        let token = store.create(None);
        assert_eq!(store.snapshot(&token).unwrap().name(), "Scratch");
    }

    #[test]
    fn test_unknown_token() {
        let store = SessionStore::new();
        let token = SessionToken::from("missing");
        assert!(store.get(&token).is_none());
        assert!(store.snapshot(&token).unwrap_err().is_not_found());
        assert!(!store.delete(&token));
    }

    #[test]
    fn test_replace_overwrites() {
        let store = SessionStore::new();
        let token = store.create(None);

        let mut graph = AutomatonGraph::new("replacement");
        graph.add_state(0.0, 0.0);
        store.replace(&token, graph);
        assert_eq!(store.snapshot(&token).unwrap().state_count(), 1);

        // Replacing an unknown token registers it
        let other = SessionToken::from("client-chosen");
        store.replace(&other, AutomatonGraph::new("other"));
        assert!(store.contains(&other));
    }

    #[test]
    fn test_delete() {
        let store = SessionStore::new();
        let token = store.create(None);
        assert!(store.delete(&token));
        assert!(!store.contains(&token));
        assert!(store.is_empty());
    }

    #[test]
    fn test_concurrent_sessions() {
        let store = &SessionStore::new();
        let tokens: Vec<SessionToken> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    scope.spawn(move || (0..25).map(|_| store.create(None)).collect::<Vec<_>>())
                })
                .collect();
            handles
                .into_iter()
                .flat_map(|h| h.join().unwrap())
                .collect()
        });

        let distinct: HashSet<&SessionToken> = tokens.iter().collect();
        assert_eq!(distinct.len(), 200);
        assert_eq!(store.len(), 200);

        std::thread::scope(|scope| {
            for chunk in tokens.chunks(50) {
                scope.spawn(move || {
                    for token in chunk {
                        store.delete(token);
                    }
                });
            }
        });
        assert!(store.is_empty());
    }

    #[test]
    fn test_global_store() {
        let token = SessionStore::global().create(Some("global"));
        assert!(SessionStore::global().contains(&token));
        SessionStore::global().delete(&token);
    }
}
