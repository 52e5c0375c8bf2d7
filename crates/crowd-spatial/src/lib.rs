//! `crowd-spatial`: uniform-grid spatial index.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                    |
//! |-------------|-------------------------------------------------------------|
//! | [`grid`]    | `SpatialGrid` (linked-cell buckets), `GridConfig`           |
//! | [`error`]   | `SpatialError`, `SpatialResult<T>`                          |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on `GridConfig`.           |

pub mod error;
pub mod grid;


pub use error::{SpatialError, SpatialResult};
pub use grid::{GridConfig, SpatialGrid};
