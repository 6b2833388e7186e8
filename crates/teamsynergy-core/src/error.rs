// Error types for roster management and strategy lookup.

use thiserror::Error;

use crate::team::roster::ROSTER_SIZE;

/// Recoverable failures surfaced by the team manager and strategy catalog.
#[derive(Debug, Error)]
pub enum TeamError {
    #[error("slot index {index} is out of range (0-{max})", max = ROSTER_SIZE - 1)]
    InvalidSlot { index: usize },

    #[error("member {id} is already on the roster")]
    DuplicateMember { id: u32 },

    #[error("roster is full")]
    RosterFull,

    #[error("saved team not found: {id}")]
    TeamNotFound { id: String },

    #[error("strategy not found: {name}")]
    StrategyNotFound { name: String },

    /// The key-value store rejected a read or write, or stored state could
    /// not be (de)serialized.
    #[error("persistence failure: {0:#}")]
    PersistenceFailure(anyhow::Error),
}

pub type Result<T> = std::result::Result<T, TeamError>;
