//! The `Sim` struct and its tick loop.

use std::cell::{Ref, RefCell};
use std::rc::Rc;

use log::{debug, info};

use crowd_agent::{Agent, GroupDimension, Registry};
use crowd_core::{AgentId, GroupId, SimClock, SimConfig, SimRng, SimTime, Tick, UpdateOrder};
use crowd_groups::{GroupError, GroupModelHandle};
use crowd_schedule::{EventScheduler, StepModel};
use crowd_spatial::SpatialGrid;

use crate::{SimError, SimObserver, SimResult, TickSummary};

/// The main simulation runner.
///
/// Each tick calls the two entry points in the order fixed by
/// [`SimConfig::update_order`], both at the tick's end time `t`:
///
/// - **locomotion**: [`EventScheduler::advance`] steps every agent whose
///   next step is due before `t`, in `(time, id)` order;
/// - **groups**: every group model's `update` applies its transition rule to
///   a snapshot of the live set.
///
/// Spawning and despawning go through the [`Registry`], which keeps the
/// grid, scheduler and group models in step.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim<S: StepModel> {
    /// Global configuration (tick duration, total ticks, seed, …).
    pub config: SimConfig,

    /// Simulation clock; tracks the current tick and maps it to logical time.
    pub clock: SimClock,

    pub(crate) registry:  Registry,
    pub(crate) grid:      Rc<RefCell<SpatialGrid>>,
    pub(crate) scheduler: Rc<RefCell<EventScheduler>>,
    pub(crate) groups:    Vec<GroupModelHandle>,
    pub(crate) stepper:   S,
    /// Stream for the spawning collaborator.
    pub(crate) rng:       SimRng,
}

impl<S: StepModel> Sim<S> {
    // ── Public API ────────────────────────────────────────────────────────

    /// Run the simulation from the current tick to `config.end_tick()`.
    ///
    /// Calls observer hooks at every tick boundary.  Use
    /// [`NoopObserver`][crate::NoopObserver] if you don't need callbacks.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        info!(
            "sim: running {} → {} with {} agents, {} group models",
            self.clock.current_tick,
            self.config.end_tick(),
            self.registry.len(),
            self.groups.len(),
        );
        while self.clock.current_tick < self.config.end_tick() {
            self.tick(observer)?;
        }
        observer.on_sim_end(self.clock.current_tick);
        info!("sim: finished at {} with {} agents", self.clock, self.registry.len());
        Ok(())
    }

    /// Run exactly `n` ticks from the current position (ignores `end_tick`).
    ///
    /// Useful for tests and incremental stepping.
    pub fn run_ticks<O: SimObserver>(&mut self, n: u64, observer: &mut O) -> SimResult<()> {
        for _ in 0..n {
            self.tick(observer)?;
        }
        Ok(())
    }

    /// Add `agent` to the live set.  An unset `next_step_time` becomes the
    /// scheduler's current time, so the agent steps in the next tick.
    pub fn spawn(&mut self, agent: Agent) -> SimResult<()> {
        Ok(self.registry.add(agent)?)
    }

    /// Remove agent `id`.  Returns its last state, or `None` if it was not
    /// live.
    pub fn despawn(&mut self, id: AgentId) -> SimResult<Option<Agent>> {
        Ok(self.registry.remove(id)?)
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn agent(&self, id: AgentId) -> Option<&Agent> {
        self.registry.get(id)
    }

    pub fn grid(&self) -> Ref<'_, SpatialGrid> {
        self.grid.borrow()
    }

    pub fn scheduler(&self) -> Ref<'_, EventScheduler> {
        self.scheduler.borrow()
    }

    pub fn stepper_mut(&mut self) -> &mut S {
        &mut self.stepper
    }

    /// RNG stream reserved for the spawning collaborator.
    pub fn rng(&mut self) -> &mut SimRng {
        &mut self.rng
    }

    /// Dimensions of the registered group models, in registration order.
    pub fn dimensions(&self) -> Vec<GroupDimension> {
        self.groups.iter().map(GroupModelHandle::dimension).collect()
    }

    /// `(group, size)` of every active group in `dimension`.
    pub fn group_sizes(&self, dimension: GroupDimension) -> SimResult<Vec<(GroupId, usize)>> {
        Ok(self.group_model(dimension)?.model.borrow().group_sizes())
    }

    /// Group of agent `id` in `dimension`.
    pub fn group_of(&self, id: AgentId, dimension: GroupDimension) -> SimResult<GroupId> {
        let agent = self.registry.require(id)?;
        Ok(self.group_model(dimension)?.model.borrow().group_id_of(agent)?)
    }

    /// Verify that the grid and scheduler agree with the live set.
    pub fn check_consistency(&self) -> SimResult<()> {
        self.grid.borrow().check_consistency(self.registry.elements())?;
        let scheduled = self.scheduler.borrow().len();
        if scheduled != self.registry.len() {
            return Err(SimError::ScheduleDesync { scheduled, live: self.registry.len() });
        }
        Ok(())
    }

    // ── Core tick processing ──────────────────────────────────────────────

    fn tick<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        let now = self.clock.current_tick;
        observer.on_tick_start(now);
        let summary = self.process_tick(now)?;
        observer.on_tick_end(&summary, &self.registry);
        self.clock.advance();
        Ok(())
    }

    fn process_tick(&mut self, now: Tick) -> SimResult<TickSummary> {
        let sim_time = self.clock.tick_end();
        let steps = match self.config.update_order {
            UpdateOrder::LocomotionFirst => {
                let steps = self.advance(sim_time)?;
                self.update_groups(sim_time)?;
                steps
            }
            UpdateOrder::GroupsFirst => {
                self.update_groups(sim_time)?;
                self.advance(sim_time)?
            }
        };

        let summary = TickSummary {
            tick: now,
            sim_time,
            steps,
            live: self.registry.len(),
            groups: self
                .groups
                .iter()
                .map(|g| {
                    let model = g.model.borrow();
                    (model.dimension(), model.group_sizes())
                })
                .collect(),
        };
        debug!("sim: {now} t={sim_time:.3} steps={steps} live={}", summary.live);
        Ok(summary)
    }

    fn advance(&mut self, until: SimTime) -> SimResult<usize> {
        let steps = self.scheduler.borrow_mut().advance(
            until,
            &mut self.registry,
            &mut self.grid.borrow_mut(),
            &mut self.stepper,
        )?;
        Ok(steps)
    }

    fn update_groups(&mut self, sim_time: SimTime) -> SimResult<()> {
        let grid = self.grid.borrow();
        for handle in &self.groups {
            handle.model.borrow_mut().update(sim_time, &mut self.registry, &grid)?;
        }
        Ok(())
    }

    fn group_model(&self, dimension: GroupDimension) -> SimResult<&GroupModelHandle> {
        self.groups
            .iter()
            .find(|g| g.dimension() == dimension)
            .ok_or_else(|| GroupError::UnknownDimension(dimension.name().to_owned()).into())
    }
}
