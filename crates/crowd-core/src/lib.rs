//! `crowd-core`: foundational types for the `crowd_kernel` simulation core.
//!
//! This crate is a dependency of every other `crowd-*` crate.  It has no
//! `crowd-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `AgentId`, `GroupId`                                  |
//! | [`geo`]         | `Point`, `Rect`, Euclidean distance                   |
//! | [`time`]        | `Tick`, `SimTime`, `SimClock`, `SimConfig`, `UpdateOrder` |
//! | [`rng`]         | `SimRng` (seeded, splittable)                         |
//! | [`params`]      | `ModelParams`: named scalar model parameters          |
//! | [`error`]       | `CoreError`, `CoreResult`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public value types.  |

pub mod error;
pub mod geo;
pub mod ids;
pub mod params;
pub mod rng;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use geo::{Point, Rect};
pub use ids::{AgentId, GroupId};
pub use params::ModelParams;
pub use rng::SimRng;
pub use time::{SimClock, SimConfig, SimTime, Tick, UpdateOrder};
