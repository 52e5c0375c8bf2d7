//! Fluent builder for constructing a [`Sim`].

use std::cell::RefCell;
use std::rc::Rc;

use log::debug;

use crowd_agent::Registry;
use crowd_core::{ModelParams, SimConfig, SimRng};
use crowd_groups::{GroupModelHandle, build_model};
use crowd_schedule::{EventScheduler, StepModel};
use crowd_spatial::{GridConfig, SpatialGrid};

use crate::{Sim, SimError, SimResult};

/// Offset of the spawn stream in [`SimRng::child`]; group model `i` uses
/// offset `i + 1`.
const SPAWN_STREAM: u64 = 0;

enum GroupSource {
    Named { name: String, params: ModelParams },
    Prebuilt(GroupModelHandle),
}

/// Fluent builder for [`Sim<S>`].
///
/// # Required inputs
///
/// - [`SimConfig`]: tick duration, total ticks, seed, update order
/// - [`GridConfig`]: domain and cell size of the spatial grid
/// - `S: StepModel`: the locomotion collaborator
///
/// # Optional inputs
///
/// | Method                   | Effect                                       |
/// |--------------------------|----------------------------------------------|
/// | `.group_model(name, p)`  | Build a known dimension from named params    |
/// | `.with_group_model(h)`   | Register a model with a custom rule          |
///
/// Listeners are registered in a fixed order: spatial grid, scheduler, then
/// group models in the order they were added.
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = SimBuilder::new(config, GridConfig::new(bounds, 2.0), StandStill { step_duration: 0.4 })
///     .group_model("epidemic", ModelParams::new().with("infectionRate", 0.1))
///     .build()?;
/// sim.spawn(Agent::new(AgentId(1), Point::new(5.0, 5.0)))?;
/// sim.run(&mut NoopObserver)?;
/// ```
pub struct SimBuilder<S: StepModel> {
    config:  SimConfig,
    grid:    GridConfig,
    stepper: S,
    groups:  Vec<GroupSource>,
}

impl<S: StepModel> SimBuilder<S> {
    pub fn new(config: SimConfig, grid: GridConfig, stepper: S) -> Self {
        Self { config, grid, stepper, groups: Vec::new() }
    }

    /// Add the group model of dimension `name`, configured from `params`.
    pub fn group_model(mut self, name: impl Into<String>, params: ModelParams) -> Self {
        self.groups.push(GroupSource::Named { name: name.into(), params });
        self
    }

    /// Add an already built group model.  It keeps its own RNG stream.
    pub fn with_group_model(mut self, handle: GroupModelHandle) -> Self {
        self.groups.push(GroupSource::Prebuilt(handle));
        self
    }

    /// Validate inputs, wire the listeners, and return a ready-to-run [`Sim`].
    pub fn build(self) -> SimResult<Sim<S>> {
        validate(&self.config)?;

        let grid = Rc::new(RefCell::new(SpatialGrid::new(self.grid)?));
        let scheduler = Rc::new(RefCell::new(EventScheduler::new(self.config.start_secs)));

        let mut registry = Registry::new();
        registry.add_listener(grid.clone());
        registry.add_listener(scheduler.clone());

        let mut groups: Vec<GroupModelHandle> = Vec::with_capacity(self.groups.len());
        for (i, source) in self.groups.into_iter().enumerate() {
            let handle = match source {
                GroupSource::Named { name, params } => {
                    let rng = SimRng::new(self.config.seed).child(i as u64 + 1);
                    build_model(&name, &params, rng)?
                }
                GroupSource::Prebuilt(handle) => handle,
            };
            let dimension = handle.dimension();
            if groups.iter().any(|g| g.dimension() == dimension) {
                return Err(SimError::DuplicateDimension(dimension));
            }
            handle.model.borrow_mut().start_at(self.config.start_secs);
            registry.add_listener(handle.listener.clone());
            debug!("sim: registered group model `{dimension}`");
            groups.push(handle);
        }

        Ok(Sim {
            clock: self.config.make_clock(),
            rng: SimRng::new(self.config.seed).child(SPAWN_STREAM),
            config: self.config,
            registry,
            grid,
            scheduler,
            groups,
            stepper: self.stepper,
        })
    }
}

fn validate(config: &SimConfig) -> SimResult<()> {
    if !config.start_secs.is_finite() {
        return Err(SimError::Config(format!("start_secs must be finite, got {}", config.start_secs)));
    }
    if !config.tick_duration_secs.is_finite() || config.tick_duration_secs <= 0.0 {
        return Err(SimError::Config(format!(
            "tick_duration_secs must be finite and > 0, got {}",
            config.tick_duration_secs
        )));
    }
    Ok(())
}
