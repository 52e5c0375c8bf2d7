use thiserror::Error;

use crowd_core::{AgentId, SimTime};
use crowd_spatial::SpatialError;

#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("step model returned invalid duration {duration} for {agent}")]
    InvalidStepDuration { agent: AgentId, duration: SimTime },

    #[error("scheduled {0} is not in the registry")]
    Dangling(AgentId),

    #[error("{0} is already scheduled")]
    AlreadyScheduled(AgentId),

    #[error("{0} has no scheduler entry")]
    NotScheduled(AgentId),

    #[error("{agent} has non-finite next step time {time}")]
    InvalidTime { agent: AgentId, time: SimTime },

    #[error("spatial index error: {0}")]
    Spatial(#[from] SpatialError),
}

pub type ScheduleResult<T> = Result<T, ScheduleError>;
