//! `GroupModel`, the generic group-state manager.

use log::debug;

use crowd_agent::{Agent, ElementListener, GroupDimension, ListenerResult, Registry};
use crowd_core::{GroupId, SimRng, SimTime};
use crowd_spatial::SpatialGrid;

use crate::{Group, GroupBook, GroupResult, TickInfo, TransitionContext, TransitionRule};

/// Drives a [`TransitionRule`] over the live agent set.
///
/// Register a shared handle with the [`Registry`] so newly added agents get
/// their initial group and departing agents leave theirs.
pub struct GroupModel<R: TransitionRule> {
    rule:      R,
    book:      GroupBook<R::State>,
    rng:       SimRng,
    last_time: SimTime,
}

impl<R: TransitionRule> GroupModel<R> {
    /// A model whose first update measures `dt` from time 0.  Use
    /// [`starting_at`](Self::starting_at) when the run starts elsewhere.
    pub fn new(rule: R, rng: SimRng) -> Self {
        Self { rule, book: GroupBook::new(R::DIMENSION, R::group_state), rng, last_time: 0.0 }
    }

    /// Measure the first update's `dt` from `start`.
    pub fn starting_at(mut self, start: SimTime) -> Self {
        self.last_time = start;
        self
    }

    pub fn rule(&self) -> &R {
        &self.rule
    }

    pub fn book(&self) -> &GroupBook<R::State> {
        &self.book
    }

    pub fn dimension(&self) -> GroupDimension {
        R::DIMENSION
    }

    /// The group `agent` belongs to.  Fails fast if it has none.
    pub fn group_of(&self, agent: &Agent) -> GroupResult<&Group<R::State>> {
        self.book.group_of(agent)
    }

    /// Move `agent` into `group` outside of an update.
    pub fn assign(&mut self, agent: &mut Agent, group: GroupId) -> GroupResult<usize> {
        self.book.assign(agent, group)
    }

    pub fn unassign(&mut self, agent: &mut Agent) -> GroupResult<Option<GroupId>> {
        self.book.unassign(agent)
    }

    /// Apply the rule once to every agent live at the start of the call.
    ///
    /// Iteration follows a snapshot of the registry taken up front.  The
    /// registry cannot gain or lose agents during the pass.
    pub fn update(
        &mut self,
        sim_time: SimTime,
        registry: &mut Registry,
        grid:     &SpatialGrid,
    ) -> GroupResult<()> {
        let tick = TickInfo { sim_time, dt: sim_time - self.last_time };
        self.last_time = sim_time;
        self.rule.begin_update(&tick);

        let snapshot = registry.snapshot();
        let mut ctx = TransitionContext::new(tick, registry, grid, &mut self.rng, &mut self.book);
        for agent in snapshot {
            self.rule.visit(agent, &mut ctx)?;
        }

        debug!("groups[{}] t={sim_time:.3}: sizes {:?}", R::DIMENSION, self.book.sizes());
        Ok(())
    }
}

impl<R: TransitionRule> ElementListener for GroupModel<R> {
    fn name(&self) -> &'static str {
        R::DIMENSION.name()
    }

    fn on_added(&mut self, agent: &mut Agent) -> ListenerResult {
        let group = self.rule.initial_group(agent, &self.book, &mut self.rng)?;
        self.book.assign(agent, group)?;
        Ok(())
    }

    fn on_removed(&mut self, agent: &Agent) -> ListenerResult {
        self.book.release(agent)?;
        Ok(())
    }
}

/// Object-safe driver so the simulation can hold models of different rules.
pub trait GroupUpdate {
    fn dimension(&self) -> GroupDimension;

    /// Set the time the next update measures its `dt` from.  Called once
    /// with the run's start time before the first tick.
    fn start_at(&mut self, start: SimTime);

    fn update(
        &mut self,
        sim_time: SimTime,
        registry: &mut Registry,
        grid:     &SpatialGrid,
    ) -> GroupResult<()>;

    /// `(id, size)` of every active group.
    fn group_sizes(&self) -> Vec<(GroupId, usize)>;

    /// Group id of `agent` in this model's dimension.
    fn group_id_of(&self, agent: &Agent) -> GroupResult<GroupId>;
}

impl<R: TransitionRule> GroupUpdate for GroupModel<R> {
    fn dimension(&self) -> GroupDimension {
        R::DIMENSION
    }

    fn start_at(&mut self, start: SimTime) {
        self.last_time = start;
    }

    fn update(
        &mut self,
        sim_time: SimTime,
        registry: &mut Registry,
        grid:     &SpatialGrid,
    ) -> GroupResult<()> {
        GroupModel::update(self, sim_time, registry, grid)
    }

    fn group_sizes(&self) -> Vec<(GroupId, usize)> {
        self.book.sizes()
    }

    fn group_id_of(&self, agent: &Agent) -> GroupResult<GroupId> {
        self.book.group_id_of(agent)
    }
}
