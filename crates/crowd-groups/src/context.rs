//! Per-update view handed to a [`TransitionRule`](crate::TransitionRule).

use crowd_agent::{Agent, Registry};
use crowd_core::{AgentId, GroupId, Point, SimRng, SimTime};
use crowd_spatial::SpatialGrid;

use crate::{GroupBook, GroupResult};

/// Timing of one group update.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TickInfo {
    /// Simulation time the update runs at.
    pub sim_time: SimTime,
    /// Seconds since the previous update of the same model.
    pub dt: SimTime,
}

/// Everything a rule may touch while visiting one agent.
///
/// The registry is reachable only through [`assign`][Self::assign],
/// [`unassign`][Self::unassign] and read accessors, so membership edits always go through the group book.
pub struct TransitionContext<'a, S> {
    pub tick: TickInfo,
    pub grid: &'a SpatialGrid,
    pub rng:  &'a mut SimRng,
    registry: &'a mut Registry,
    book:     &'a mut GroupBook<S>,
}

impl<'a, S> TransitionContext<'a, S> {
    pub(crate) fn new(
        tick:     TickInfo,
        registry: &'a mut Registry,
        grid:     &'a SpatialGrid,
        rng:      &'a mut SimRng,
        book:     &'a mut GroupBook<S>,
    ) -> Self {
        Self { tick, grid, rng, registry, book }
    }

    pub fn book(&self) -> &GroupBook<S> {
        &*self.book
    }

    pub fn contains(&self, agent: AgentId) -> bool {
        self.registry.contains(agent)
    }

    pub fn agent(&self, agent: AgentId) -> GroupResult<&Agent> {
        Ok(self.registry.require(agent)?)
    }

    /// Group `agent` currently belongs to in this rule's dimension.
    pub fn group_id_of(&self, agent: AgentId) -> GroupResult<GroupId> {
        self.book.group_id_of(self.registry.require(agent)?)
    }

    /// Move `agent` into group `group`; returns the new group size.
    pub fn assign(&mut self, agent: AgentId, group: GroupId) -> GroupResult<usize> {
        let record = self.registry.require_mut(agent)?;
        self.book.assign(record, group)
    }

    /// Take `agent` out of its group in this dimension, returning the group
    /// it left.  The agent stays live with no membership until reassigned.
    pub fn unassign(&mut self, agent: AgentId) -> GroupResult<Option<GroupId>> {
        let record = self.registry.require_mut(agent)?;
        self.book.unassign(record)
    }

    /// Agents and positions within `radius` of `center`, from the grid.
    pub fn neighbors(&self, center: Point, radius: f64) -> Vec<(AgentId, Point)> {
        self.grid.query_entries(center, radius)
    }
}
