//! Session module - Per-client automata held for the lifetime of the process

pub mod operations;
pub mod store;

pub use store::{DEFAULT_SESSION_NAME, SessionStore, SessionToken, SharedGraph, lock_graph};
