use thiserror::Error;

use crowd_agent::{AgentError, GroupDimension};
use crowd_core::{AgentId, CoreError, GroupId};

#[derive(Debug, Error)]
pub enum GroupError {
    /// Every live agent is assigned a group on registration, so this is an
    /// invariant violation, never a normal "no group" answer.
    #[error("{agent} has no membership in dimension `{dimension}`")]
    NoMembership { agent: AgentId, dimension: GroupDimension },

    #[error("{group} is not active in dimension `{dimension}`")]
    MissingGroup { dimension: GroupDimension, group: GroupId },

    #[error("{group} has no meaning in dimension `{dimension}`")]
    UnknownGroup { dimension: GroupDimension, group: GroupId },

    #[error("unknown group dimension `{0}`")]
    UnknownDimension(String),

    #[error("group configuration error: {0}")]
    Config(#[from] CoreError),

    #[error("registry error: {0}")]
    Registry(#[from] AgentError),
}

pub type GroupResult<T> = Result<T, GroupError>;
