//! The SIR epidemic rule.
//!
//! Each agent is in exactly one of three well-known groups: susceptible,
//! infected, or recovered.  Per update, every infected agent recovers with
//! probability `recoveryRate * scale`, and every susceptible agent with an
//! infected neighbour closer than `infectionMaxDistance` is infected with
//! probability `infectionRate * scale`, where `scale = dt / referenceDt`.
//! Recovered is terminal.

use log::{debug, warn};

use crowd_agent::{Agent, GroupDimension};
use crowd_core::{AgentId, GroupId, ModelParams, SimRng};

use crate::{GroupBook, GroupError, GroupResult, TickInfo, TransitionContext, TransitionRule};

/// Epidemic category.  The discriminant is the category's group id.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SirCategory {
    Infected    = 0,
    Susceptible = 1,
    Recovered   = 2,
}

impl SirCategory {
    pub const ALL: [SirCategory; 3] =
        [SirCategory::Infected, SirCategory::Susceptible, SirCategory::Recovered];

    pub fn group_id(self) -> GroupId {
        GroupId(self as u32)
    }

    pub fn from_group(id: GroupId) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.group_id() == id)
    }

    pub fn name(self) -> &'static str {
        match self {
            SirCategory::Infected    => "infected",
            SirCategory::Susceptible => "susceptible",
            SirCategory::Recovered   => "recovered",
        }
    }
}

/// Typed parameters of [`SirRule`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SirConfig {
    pub infection_rate:         f64,
    pub recovery_rate:          f64,
    pub infection_max_distance: f64,
    pub search_radius:          f64,
    pub reference_dt:           f64,
    pub infections_at_start:    u32,
    /// Spawn-time infection probability; `None` uses `infection_rate`.
    pub initial_infection_rate: Option<f64>,
}

impl Default for SirConfig {
    fn default() -> Self {
        Self {
            infection_rate:         0.01,
            recovery_rate:          0.01,
            infection_max_distance: 1.0,
            search_radius:          5.0,
            reference_dt:           0.4,
            infections_at_start:    0,
            initial_infection_rate: None,
        }
    }
}

impl SirConfig {
    pub const PARAMS: [&'static str; 7] = [
        "infectionRate",
        "recoveryRate",
        "infectionMaxDistance",
        "searchRadius",
        "referenceDt",
        "infectionsAtStart",
        "initialInfectionRate",
    ];

    /// Seal named parameters into a config.  Absent names take defaults.
    pub fn from_params(params: &ModelParams) -> GroupResult<Self> {
        params.ensure_known("sir", &Self::PARAMS)?;
        let d = Self::default();
        let config = Self {
            infection_rate:         params.rate_or("infectionRate", d.infection_rate)?,
            recovery_rate:          params.rate_or("recoveryRate", d.recovery_rate)?,
            infection_max_distance: params.positive_or("infectionMaxDistance", d.infection_max_distance)?,
            search_radius:          params.positive_or("searchRadius", d.search_radius)?,
            reference_dt:           params.positive_or("referenceDt", d.reference_dt)?,
            infections_at_start:    params.count_or("infectionsAtStart", d.infections_at_start)?,
            initial_infection_rate: match params.get("initialInfectionRate") {
                Some(_) => Some(params.rate_or("initialInfectionRate", 0.0)?),
                None => None,
            },
        };
        if config.search_radius < config.infection_max_distance {
            warn!(
                "sir: searchRadius {} is below infectionMaxDistance {}; contacts beyond the search radius are never seen",
                config.search_radius, config.infection_max_distance,
            );
        }
        Ok(config)
    }

    /// Probability that an agent past the first `infections_at_start` is
    /// infected on spawn.
    pub fn spawn_infection_rate(&self) -> f64 {
        self.initial_infection_rate.unwrap_or(self.infection_rate)
    }
}

/// Susceptible / infected / recovered transitions.
#[derive(Clone, Debug)]
pub struct SirRule {
    config:         SirConfig,
    scale:          f64,
    total_infected: u64,
}

impl SirRule {
    pub fn new(config: SirConfig) -> Self {
        Self { config, scale: 1.0, total_infected: 0 }
    }

    pub fn config(&self) -> &SirConfig {
        &self.config
    }

    /// Infections so far, including those seeded at spawn.
    pub fn total_infected(&self) -> u64 {
        self.total_infected
    }

    /// Probability scale of the current update.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    fn category(ctx: &TransitionContext<'_, ()>, agent: AgentId) -> GroupResult<SirCategory> {
        let group = ctx.group_id_of(agent)?;
        SirCategory::from_group(group)
            .ok_or(GroupError::UnknownGroup { dimension: Self::DIMENSION, group })
    }

    fn try_infect(&mut self, agent: AgentId, ctx: &mut TransitionContext<'_, ()>) -> GroupResult<()> {
        let position = ctx.agent(agent)?.position;
        for (other, at) in ctx.neighbors(position, self.config.search_radius) {
            if other == agent || Self::category(ctx, other)? != SirCategory::Infected {
                continue;
            }
            if position.distance(at) < self.config.infection_max_distance
                && ctx.rng.uniform() < self.config.infection_rate * self.scale
            {
                ctx.assign(agent, SirCategory::Infected.group_id())?;
                self.total_infected += 1;
                debug!("sir t={:.3}: {other} infected {agent}", ctx.tick.sim_time);
                break;
            }
        }
        Ok(())
    }
}

impl TransitionRule for SirRule {
    type State = ();

    const DIMENSION: GroupDimension = GroupDimension::EPIDEMIC;

    fn group_state(_id: GroupId) {}

    fn initial_group(
        &mut self,
        _agent: &Agent,
        _book:  &GroupBook<()>,
        rng:    &mut SimRng,
    ) -> GroupResult<GroupId> {
        let draw = rng.uniform();
        let category = if self.total_infected < u64::from(self.config.infections_at_start)
            || draw < self.config.spawn_infection_rate()
        {
            self.total_infected += 1;
            SirCategory::Infected
        } else {
            SirCategory::Susceptible
        };
        Ok(category.group_id())
    }

    fn begin_update(&mut self, tick: &TickInfo) {
        self.scale = if tick.dt == 0.0 { 1.0 } else { tick.dt / self.config.reference_dt };
    }

    fn visit(&mut self, agent: AgentId, ctx: &mut TransitionContext<'_, ()>) -> GroupResult<()> {
        match Self::category(ctx, agent)? {
            SirCategory::Recovered => Ok(()),
            SirCategory::Infected => {
                if ctx.rng.uniform() < self.config.recovery_rate * self.scale {
                    ctx.assign(agent, SirCategory::Recovered.group_id())?;
                    debug!("sir t={:.3}: {agent} recovered", ctx.tick.sim_time);
                }
                Ok(())
            }
            SirCategory::Susceptible => self.try_infect(agent, ctx),
        }
    }
}
