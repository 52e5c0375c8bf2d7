//! The agent record and its group memberships.

use std::fmt;

use crowd_core::{AgentId, GroupId, Point, SimTime};

/// Default desired walking speed in m/s.
pub const DEFAULT_DESIRED_SPEED: f64 = 1.34;

// ── GroupDimension ────────────────────────────────────────────────────────────

/// An independent axis along which the population is partitioned.  Group
/// ids are only unique within one dimension.
///
/// Serialize-only: dimension names are `'static` labels chosen in code.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct GroupDimension(pub &'static str);

impl GroupDimension {
    /// Susceptible / infected / recovered status.
    pub const EPIDEMIC: GroupDimension = GroupDimension("epidemic");
    /// Fixed-size cohorts (e.g. seating groups).
    pub const COHORT: GroupDimension = GroupDimension("cohort");

    pub fn name(self) -> &'static str {
        self.0
    }
}

impl fmt::Display for GroupDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

// ── GroupMembership ───────────────────────────────────────────────────────────

/// One `(dimension, group, size)` entry on an agent.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct GroupMembership {
    pub dimension: GroupDimension,
    pub group:     GroupId,
    /// Size of the group right after this agent joined.
    pub size_at_assignment: usize,
}

// ── Agent ─────────────────────────────────────────────────────────────────────

/// A simulated mobile entity.
///
/// Only the [`Registry`](crate::Registry) owns `Agent`s.  The id is fixed at
/// construction; everything else is mutable state.  Mutating `position`
/// outside the scheduler requires re-bucketing the agent in the spatial grid
/// before the next query.
#[derive(Clone, Debug)]
pub struct Agent {
    id: AgentId,

    /// Current position.
    pub position: Point,

    /// Logical time of the agent's next step.  `None` until the scheduler
    /// first sees the agent, which sets it to the scheduler's current time.
    pub next_step_time: Option<SimTime>,

    /// Walking speed used by step models, in m/s.
    pub desired_speed: f64,

    /// Where the agent is heading, if anywhere.  Interpreted by step models.
    pub target: Option<Point>,

    memberships: Vec<GroupMembership>,
}

impl Agent {
    pub fn new(id: AgentId, position: Point) -> Self {
        Self {
            id,
            position,
            next_step_time: None,
            desired_speed: DEFAULT_DESIRED_SPEED,
            target: None,
            memberships: Vec::new(),
        }
    }

    /// Builder-style target setter.
    pub fn with_target(mut self, target: Point) -> Self {
        self.target = Some(target);
        self
    }

    /// Builder-style speed setter.
    pub fn with_speed(mut self, desired_speed: f64) -> Self {
        self.desired_speed = desired_speed;
        self
    }

    #[inline]
    pub fn id(&self) -> AgentId {
        self.id
    }

    /// All memberships, one per dimension, in assignment order.
    pub fn memberships(&self) -> &[GroupMembership] {
        &self.memberships
    }

    /// The membership in `dimension`, if any.
    pub fn membership(&self, dimension: GroupDimension) -> Option<&GroupMembership> {
        self.memberships.iter().find(|m| m.dimension == dimension)
    }

    /// Record `membership`, replacing any prior entry in the same dimension.
    pub fn set_membership(&mut self, membership: GroupMembership) {
        match self.memberships.iter_mut().find(|m| m.dimension == membership.dimension) {
            Some(slot) => *slot = membership,
            None => self.memberships.push(membership),
        }
    }

    /// Drop the membership in `dimension`, returning it.
    pub fn clear_membership(&mut self, dimension: GroupDimension) -> Option<GroupMembership> {
        let idx = self.memberships.iter().position(|m| m.dimension == dimension)?;
        Some(self.memberships.remove(idx))
    }
}
