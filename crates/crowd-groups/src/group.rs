//! Groups and the per-dimension group book.
//!
//! A [`GroupBook`] is the active group map of one dimension.  It is the only
//! place group membership changes, and it keeps the two sides in step:
//!
//! - the group's member set, and
//! - the `(dimension, group, size)` entry on the agent record.
//!
//! Groups are created lazily on first assignment and dropped from the map
//! as soon as their last member leaves.

use indexmap::{IndexMap, IndexSet};
use log::debug;

use crowd_agent::{Agent, GroupDimension, GroupMembership};
use crowd_core::{AgentId, GroupId};

use crate::{GroupError, GroupResult};

/// One group: id, members in join order, and dimension-specific state.
#[derive(Debug, Clone)]
pub struct Group<S> {
    id:      GroupId,
    members: IndexSet<AgentId>,
    pub state: S,
}

impl<S> Group<S> {
    fn new(id: GroupId, state: S) -> Self {
        Self { id, members: IndexSet::new(), state }
    }

    pub fn id(&self) -> GroupId {
        self.id
    }

    pub fn size(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, agent: AgentId) -> bool {
        self.members.contains(&agent)
    }

    /// Members in join order.
    pub fn members(&self) -> impl Iterator<Item = AgentId> + '_ {
        self.members.iter().copied()
    }
}

/// Active groups of one dimension.
pub struct GroupBook<S> {
    dimension: GroupDimension,
    groups:    IndexMap<GroupId, Group<S>>,
    new_state: fn(GroupId) -> S,
}

impl<S> GroupBook<S> {
    /// `new_state` builds the state of a lazily created group.
    pub fn new(dimension: GroupDimension, new_state: fn(GroupId) -> S) -> Self {
        Self { dimension, groups: IndexMap::new(), new_state }
    }

    pub fn dimension(&self) -> GroupDimension {
        self.dimension
    }

    pub fn get(&self, id: GroupId) -> Option<&Group<S>> {
        self.groups.get(&id)
    }

    pub fn contains(&self, id: GroupId) -> bool {
        self.groups.contains_key(&id)
    }

    /// Active groups in creation order.
    pub fn groups(&self) -> impl Iterator<Item = &Group<S>> + '_ {
        self.groups.values()
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// `(id, size)` of every active group, in creation order.
    pub fn sizes(&self) -> Vec<(GroupId, usize)> {
        self.groups.values().map(|g| (g.id, g.size())).collect()
    }

    /// Size of group `id`; 0 if the group is not active.
    pub fn size_of(&self, id: GroupId) -> usize {
        self.groups.get(&id).map_or(0, Group::size)
    }

    /// Sum of all group sizes.
    pub fn total_members(&self) -> usize {
        self.groups.values().map(Group::size).sum()
    }

    /// Group id recorded on `agent` for this dimension.
    ///
    /// # Errors
    ///
    /// [`GroupError::NoMembership`] if the agent was never assigned.
    pub fn group_id_of(&self, agent: &Agent) -> GroupResult<GroupId> {
        agent
            .membership(self.dimension)
            .map(|m| m.group)
            .ok_or(GroupError::NoMembership { agent: agent.id(), dimension: self.dimension })
    }

    /// The group `agent` belongs to.
    ///
    /// # Errors
    ///
    /// [`GroupError::NoMembership`] if the agent has no membership, or
    /// [`GroupError::MissingGroup`] if the recorded group is not active.
    pub fn group_of(&self, agent: &Agent) -> GroupResult<&Group<S>> {
        let id = self.group_id_of(agent)?;
        self.groups
            .get(&id)
            .ok_or(GroupError::MissingGroup { dimension: self.dimension, group: id })
    }

    /// Move `agent` into group `id`, creating it if needed.
    ///
    /// Any prior membership in this dimension is dropped first (deleting
    /// the old group if it empties).  Returns the new group size, which is
    /// also recorded on the agent.
    pub fn assign(&mut self, agent: &mut Agent, id: GroupId) -> GroupResult<usize> {
        self.unassign(agent)?;

        let dimension = self.dimension;
        let new_state = self.new_state;
        let group = self.groups.entry(id).or_insert_with(|| {
            debug!("groups[{dimension}]: created {id}");
            Group::new(id, new_state(id))
        });
        group.members.insert(agent.id());
        let size = group.size();

        agent.set_membership(GroupMembership { dimension, group: id, size_at_assignment: size });
        Ok(size)
    }

    /// Remove `agent` from its group in this dimension and clear the entry
    /// on the agent.  Returns the group it left, or `None` if it had none.
    pub fn unassign(&mut self, agent: &mut Agent) -> GroupResult<Option<GroupId>> {
        let Some(membership) = agent.membership(self.dimension).copied() else {
            return Ok(None);
        };
        self.leave(agent.id(), membership.group)?;
        agent.clear_membership(self.dimension);
        Ok(Some(membership.group))
    }

    /// Remove a departing agent from its group without touching the record,
    /// which is about to be discarded.
    pub fn release(&mut self, agent: &Agent) -> GroupResult<GroupId> {
        let id = self.group_id_of(agent)?;
        self.leave(agent.id(), id)?;
        Ok(id)
    }

    fn leave(&mut self, agent: AgentId, id: GroupId) -> GroupResult<()> {
        let dimension = self.dimension;
        let group = self
            .groups
            .get_mut(&id)
            .ok_or(GroupError::MissingGroup { dimension, group: id })?;
        group.members.shift_remove(&agent);
        if group.is_empty() {
            self.groups.shift_remove(&id);
            debug!("groups[{dimension}]: deleted empty {id}");
        }
        Ok(())
    }
}
