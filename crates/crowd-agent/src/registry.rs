//! `Registry`: the canonical, order-preserving set of live agents.
//!
//! # Notification order
//!
//! ```text
//! add(agent):    insert into live set → on_added(listener_0) → on_added(listener_1) → …
//! remove(id):    on_removed(listener_0) → on_removed(listener_1) → … → drop from live set
//! ```
//!
//! Removal notifies *before* the record is discarded so listeners can still
//! read the agent's last position and memberships while tearing down their
//! derived records.
//!
//! # Iterating while mutating
//!
//! A tick that adds or removes agents (or reassigns memberships of agents
//! other than the one it is visiting) iterates over [`Registry::snapshot`],
//! a copied id list, and dereferences each id through [`Registry::get`] /
//! [`Registry::get_mut`].  Ids removed mid-scan simply resolve to `None`.

use indexmap::IndexMap;
use log::debug;

use crowd_core::AgentId;

use crate::{Agent, AgentError, AgentResult, SharedListener};

/// The live agent set for one simulation domain.
#[derive(Default)]
pub struct Registry {
    agents:    IndexMap<AgentId, Agent>,
    listeners: Vec<SharedListener>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Listeners ─────────────────────────────────────────────────────────

    /// Subscribe `listener` to future add/remove notifications.
    ///
    /// Agents already in the registry are not replayed; register listeners
    /// before the first agent is added.
    pub fn add_listener(&mut self, listener: SharedListener) {
        self.listeners.push(listener);
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    // ── Mutation ──────────────────────────────────────────────────────────

    /// Append `agent` to the live set and notify every listener.
    ///
    /// # Errors
    ///
    /// - [`AgentError::DuplicateId`] if an agent with the same id is live.
    ///   Nothing is inserted or notified.
    /// - [`AgentError::Listener`] if a listener rejects the agent.  The agent
    ///   stays in the live set; the run must be aborted.
    pub fn add(&mut self, agent: Agent) -> AgentResult<()> {
        let id = agent.id();
        if self.agents.contains_key(&id) {
            return Err(AgentError::DuplicateId(id));
        }
        let (idx, _) = self.agents.insert_full(id, agent);
        let Some((_, agent)) = self.agents.get_index_mut(idx) else {
            return Err(AgentError::NotFound(id));
        };
        for (index, listener) in self.listeners.iter().enumerate() {
            let mut l = listener
                .try_borrow_mut()
                .map_err(|_| AgentError::ReentrantNotification { index })?;
            notify(l.name(), id, l.on_added(agent))?;
        }
        debug!("registry: added {id} at {}", agent.position);
        Ok(())
    }

    /// Remove agent `id`, notifying listeners before the record is dropped.
    ///
    /// Returns the removed record, or `Ok(None)` if `id` was not live.
    /// Relative order of the remaining agents is preserved.
    pub fn remove(&mut self, id: AgentId) -> AgentResult<Option<Agent>> {
        let Some(agent) = self.agents.get(&id) else {
            return Ok(None);
        };
        for (index, listener) in self.listeners.iter().enumerate() {
            let mut l = listener
                .try_borrow_mut()
                .map_err(|_| AgentError::ReentrantNotification { index })?;
            notify(l.name(), id, l.on_removed(agent))?;
        }
        debug!("registry: removed {id}");
        Ok(self.agents.shift_remove(&id))
    }

    // ── Access ────────────────────────────────────────────────────────────

    pub fn get(&self, id: AgentId) -> Option<&Agent> {
        self.agents.get(&id)
    }

    /// Mutable access to one record.
    ///
    /// Position changes made through this handle must be followed by a
    /// re-bucket in the spatial grid.
    pub fn get_mut(&mut self, id: AgentId) -> Option<&mut Agent> {
        self.agents.get_mut(&id)
    }

    /// Like [`get`](Self::get), but a missing id is an error.
    pub fn require(&self, id: AgentId) -> AgentResult<&Agent> {
        self.agents.get(&id).ok_or(AgentError::NotFound(id))
    }

    /// Like [`get_mut`](Self::get_mut), but a missing id is an error.
    pub fn require_mut(&mut self, id: AgentId) -> AgentResult<&mut Agent> {
        self.agents.get_mut(&id).ok_or(AgentError::NotFound(id))
    }

    pub fn contains(&self, id: AgentId) -> bool {
        self.agents.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Live agents in insertion order.  Do not mutate the registry while
    /// holding this iterator; use [`snapshot`](Self::snapshot) instead.
    pub fn elements(&self) -> impl Iterator<Item = &Agent> + '_ {
        self.agents.values()
    }

    /// Live ids in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = AgentId> + '_ {
        self.agents.keys().copied()
    }

    /// A stable copy of the live id list, safe to iterate while the
    /// registry or memberships change.
    pub fn snapshot(&self) -> Vec<AgentId> {
        self.agents.keys().copied().collect()
    }
}

/// Attach listener context to a callback failure.
fn notify(
    listener: &'static str,
    agent:    AgentId,
    result:   crate::ListenerResult,
) -> AgentResult<()> {
    result.map_err(|source| AgentError::Listener { listener, agent, source })
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("agents", &self.agents.len())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
