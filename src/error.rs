//! This module defines all error types used throughout the application.

use crate::automaton::StateId;
use crate::session::SessionToken;
use std::fmt;
use std::io;
use thiserror::Error;

/// Entity referenced inside a session's graph
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entity {
    State(StateId),
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entity::State(id) => write!(f, "state {}", id),
        }
    }
}

/// Main error type for the application
#[derive(Error, Debug)]
pub enum Error {
    /// IO errors (file not found, permission denied, etc.)
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Token does not resolve to a graph
    #[error("Session not found: {0}")]
    SessionNotFound(SessionToken),

    /// State or transition id unknown within a valid session
    #[error("Not found: {0}")]
    EntityNotFound(Entity),

    /// Transition endpoint that is not a state of the target graph
    #[error("Invalid transition endpoint: state {0} is not part of this automaton")]
    InvalidReference(StateId),

    /// AMDL syntax or semantic errors
    #[error("Line {line}, Column {column}: {message}")]
    Amdl {
        line: usize,
        column: usize,
        message: String,
    },

    /// Invalid JSON snapshot content
    #[error("Snapshot error: {0}")]
    Snapshot(String),

    /// JSON (de)serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error with custom message
    #[error("{0}")]
    Custom(String),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a custom error with a message
    pub fn custom(msg: impl Into<String>) -> Self {
        Self::Custom(msg.into())
    }

    /// Create an AMDL error at a source position
    pub fn amdl(msg: impl Into<String>, line: usize, column: usize) -> Self {
        Self::Amdl {
            line,
            column,
            message: msg.into(),
        }
    }

    pub fn state_not_found(id: StateId) -> Self {
        Self::EntityNotFound(Entity::State(id))
    }

    /// Non-fatal lookup failures that adapters report as "not found"
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::SessionNotFound(_) | Error::EntityNotFound(_))
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

// Helper macros for creating errors

/// Create a custom error with formatting
#[macro_export]
macro_rules! custom_error {
    ($($arg:tt)*) => {
        $crate::error::Error::Custom(format!($($arg)*))
    };
}

/// Bail with a custom error message
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::custom_error!($($arg)*))
    };
}

/// Ensure a condition is true or return error
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $($arg:tt)*) => {
        if !($cond) {
            $crate::bail!($($arg)*);
        }
    };
}
