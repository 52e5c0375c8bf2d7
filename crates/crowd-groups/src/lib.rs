//! `crowd-groups`: group memberships and their transition rules.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                  |
//! |---------------|-----------------------------------------------------------|
//! | [`group`]     | `Group`, `GroupBook`: active groups of one dimension      |
//! | [`rule`]      | `TransitionRule` trait                                    |
//! | [`context`]   | `TransitionContext`, `TickInfo`                           |
//! | [`model`]     | `GroupModel` (registry listener), `GroupUpdate`           |
//! | [`sir`]       | `SirRule`, `SirConfig`, `SirCategory`                     |
//! | [`cohort`]    | `CohortRule`, `CohortConfig`                              |
//! | [`catalog`]   | `build_model`, `GroupModelHandle`                         |
//! | [`error`]     | `GroupError`, `GroupResult<T>`                            |
//!
//! # Dimensions
//!
//! Each dimension is an independent partition of the live agents with its
//! own group id space.  An agent carries at most one membership per
//! dimension; a [`GroupModel`] keeps its [`GroupBook`] and those records in
//! step, creating groups on first use and deleting them when they empty.

pub mod catalog;
pub mod cohort;
pub mod context;
pub mod error;
pub mod group;
pub mod model;
pub mod rule;
pub mod sir;


pub use catalog::{build_model, dimension_by_name, GroupModelHandle, KNOWN_DIMENSIONS};
pub use cohort::{CohortConfig, CohortRule};
pub use context::{TickInfo, TransitionContext};
pub use error::{GroupError, GroupResult};
pub use group::{Group, GroupBook};
pub use model::{GroupModel, GroupUpdate};
pub use rule::TransitionRule;
pub use sir::{SirCategory, SirConfig, SirRule};
