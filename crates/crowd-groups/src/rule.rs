//! The `TransitionRule` trait, the extension point for group dimensions.

use crowd_agent::{Agent, GroupDimension};
use crowd_core::{AgentId, GroupId, SimRng};

use crate::{GroupBook, GroupResult, TickInfo, TransitionContext};

/// Assignment and transition logic of one group dimension.
///
/// A [`GroupModel`](crate::GroupModel) owns the rule together with its
/// [`GroupBook`] and calls it:
///
/// - [`initial_group`][Self::initial_group] once when an agent registers,
/// - [`begin_update`][Self::begin_update] once per update, then
/// - [`visit`][Self::visit] for every agent of the update's snapshot, in
///   registration order.
///
/// Only `visit` may change memberships during an update, and only through
/// [`TransitionContext::assign`].
pub trait TransitionRule: 'static {
    /// Per-group aggregate state.
    type State: 'static;

    /// Dimension whose memberships this rule manages.
    const DIMENSION: GroupDimension;

    /// State of a group created lazily under `id`.
    fn group_state(id: GroupId) -> Self::State;

    /// Group a newly registered agent starts in.
    fn initial_group(
        &mut self,
        agent: &Agent,
        book:  &GroupBook<Self::State>,
        rng:   &mut SimRng,
    ) -> GroupResult<GroupId>;

    /// Called once before the agents of an update are visited.
    fn begin_update(&mut self, _tick: &TickInfo) {}

    /// Apply the transition rule to `agent`.
    fn visit(
        &mut self,
        agent: AgentId,
        ctx:   &mut TransitionContext<'_, Self::State>,
    ) -> GroupResult<()>;
}
