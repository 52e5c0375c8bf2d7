//! `crowd-schedule`: event-driven stepping of agents.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                  |
//! |----------------|-----------------------------------------------------------|
//! | [`queue`]      | `EventQueue` (indexed binary heap), `EventKey`            |
//! | [`scheduler`]  | `EventScheduler`: per-tick `advance`, registry listener   |
//! | [`step`]       | `StepModel` trait, `StandStill`, `ConstantVelocity`       |
//! | [`error`]      | `ScheduleError`, `ScheduleResult<T>`                      |
//!
//! # Event model (summary)
//!
//! Every live agent has exactly one entry `(next_step_time, id)` in the
//! queue.  `advance(t)` pops entries strictly before `t` in ascending
//! `(time, id)` order, lets the [`StepModel`] move the agent, re-buckets it
//! in the spatial grid, and pushes it back at `time + step_duration`.
//! Agents therefore act at their own cadence, independent of the tick
//! length, and equal times are resolved by id so runs are reproducible.

pub mod error;
pub mod queue;
pub mod scheduler;
pub mod step;

#[cfg(test)]
mod tests;

pub use error::{ScheduleError, ScheduleResult};
pub use queue::{EventKey, EventQueue};
pub use scheduler::EventScheduler;
pub use step::{ConstantVelocity, StandStill, StepModel};
