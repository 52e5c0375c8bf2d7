//! Spatial-subsystem error type.

use thiserror::Error;

use crowd_core::{AgentId, Point};

/// Errors produced by `crowd-spatial`.
#[derive(Debug, Error)]
pub enum SpatialError {
    #[error("invalid grid configuration: {0}")]
    InvalidConfig(&'static str),

    #[error("{0} is already indexed")]
    AlreadyIndexed(AgentId),

    #[error("{0} is not indexed")]
    NotIndexed(AgentId),

    #[error("{agent} has non-finite position {position}")]
    NonFinitePosition { agent: AgentId, position: Point },

    /// The caller's notion of where the agent was does not match the cell
    /// the index recorded.  Some position change skipped the re-bucket.
    #[error("index out of sync for {agent}: expected cell {expected:?}, recorded {recorded:?}")]
    Desync {
        agent:    AgentId,
        expected: (usize, usize),
        recorded: (usize, usize),
    },

    #[error("index holds {indexed} agents but only {live} are live")]
    Orphaned { indexed: usize, live: usize },

    #[error("index out of sync for {agent}: indexed at {indexed}, actual position {actual}")]
    StalePosition {
        agent:   AgentId,
        indexed: Point,
        actual:  Point,
    },
}

pub type SpatialResult<T> = Result<T, SpatialError>;
