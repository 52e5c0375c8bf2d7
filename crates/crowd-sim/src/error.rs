use thiserror::Error;

use crowd_agent::{AgentError, GroupDimension};
use crowd_core::CoreError;
use crowd_groups::GroupError;
use crowd_schedule::ScheduleError;
use crowd_spatial::SpatialError;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error("group dimension `{0}` registered twice")]
    DuplicateDimension(GroupDimension),

    #[error("scheduler holds {scheduled} agents but {live} are live")]
    ScheduleDesync { scheduled: usize, live: usize },

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Agent(#[from] AgentError),

    #[error(transparent)]
    Spatial(#[from] SpatialError),

    #[error(transparent)]
    Schedule(#[from] ScheduleError),

    #[error(transparent)]
    Group(#[from] GroupError),
}

pub type SimResult<T> = Result<T, SimError>;
