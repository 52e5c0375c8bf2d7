use thiserror::Error;

use crowd_core::AgentId;

/// Boxed error returned by a listener callback.
pub type BoxedListenerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors produced by the registry.  All of them abort the current tick.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("duplicate agent id {0}")]
    DuplicateId(AgentId),

    #[error("agent {0} not found")]
    NotFound(AgentId),

    #[error("listener `{listener}` failed for {agent}: {source}")]
    Listener {
        listener: &'static str,
        agent:    AgentId,
        #[source]
        source:   BoxedListenerError,
    },

    #[error("listener #{index} is already borrowed; registry mutated from inside a notification")]
    ReentrantNotification { index: usize },
}

pub type AgentResult<T> = Result<T, AgentError>;
