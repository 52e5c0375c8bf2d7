//! `crowd-sim`: tick loop orchestrator for the crowd_kernel core.
//!
//! # Tick loop
//!
//! ```text
//! for tick in 0..config.total_ticks:
//!   t = end of tick
//!   ① Locomotion: scheduler.advance(t): every agent due before t steps,
//!                  in (time, id) order, and is re-bucketed in the grid.
//!   ② Groups    : each group model's update(t) applies its transition
//!                  rule to a snapshot of the live set.
//! ```
//!
//! `UpdateOrder::GroupsFirst` swaps ① and ②.  Agents are added and removed
//! only between ticks, through [`Sim::spawn`] and [`Sim::despawn`].
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use crowd_core::{ModelParams, Rect, SimConfig};
//! use crowd_schedule::StandStill;
//! use crowd_sim::{NoopObserver, SimBuilder};
//! use crowd_spatial::GridConfig;
//!
//! let grid = GridConfig::new(Rect::new(0.0, 0.0, 50.0, 50.0), 2.0);
//! let mut sim = SimBuilder::new(SimConfig::default(), grid, StandStill { step_duration: 0.4 })
//!     .group_model("epidemic", ModelParams::new().with("infectionsAtStart", 1.0))
//!     .build()?;
//! sim.run(&mut NoopObserver)?;
//! ```

pub mod builder;
pub mod error;
pub mod observer;
pub mod sim;


pub use builder::SimBuilder;
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, SimObserver, TickSummary};
pub use sim::Sim;
