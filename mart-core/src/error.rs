//! Error types for the Memory Mart core library.

use thiserror::Error;

use crate::types::GamePhase;

/// Top-level error type for all core game operations.
#[derive(Error, Debug)]
pub enum MartError {
    /// The requested action is not legal in the current phase.
    #[error("Cannot {action} while in {from:?}")]
    InvalidTransition {
        /// Phase the session was in.
        from: GamePhase,
        /// What the caller tried to do.
        action: &'static str,
    },

    /// No item with this id exists in the current pool.
    #[error("Unknown item: {0}")]
    UnknownItem(String),

    /// A slot index past the end of the answer row.
    #[error("Slot {index} out of range (slots: {len})")]
    SlotOutOfRange {
        /// Requested slot.
        index: usize,
        /// Number of slots in this round.
        len: usize,
    },

    /// Results were requested before every slot was filled.
    #[error("{empty} slot(s) still empty")]
    IncompleteAnswers {
        /// How many slots are still empty.
        empty: usize,
    },

    /// The scenario cannot be played (no items, duplicate ids).
    #[error("Invalid scenario: {0}")]
    InvalidScenario(String),

    /// Hints are not available right now.
    #[error("Hint unavailable: {0}")]
    HintUnavailable(&'static str),

    /// Serialization or deserialization failure.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for MartError {
    fn from(err: serde_json::Error) -> Self {
        MartError::Serialization(err.to_string())
    }
}

/// Convenience Result type alias.
pub type Result<T> = std::result::Result<T, MartError>;
